use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::master_data::models::MasterDataKind;
use crate::shared::validation::non_blank;

/// Request DTO for creating a master data item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMasterDataDto {
    #[validate(length(min = 1, max = 100, message = "Name is required (max 100 characters)"))]
    pub name: String,

    #[validate(length(max = 50, message = "Code must not exceed 50 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::HEX_COLOR_REGEX",
        message = "Hex code must look like #RRGGBB"
    ))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex_code: Option<String>,

    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub is_active: bool,

    #[validate(range(min = 0, message = "Sort order must not be negative"))]
    pub sort_order: i32,
}

impl CreateMasterDataDto {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: None,
            hex_code: None,
            description: None,
            is_active: true,
            sort_order: 0,
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            code: non_blank(self.code),
            hex_code: non_blank(self.hex_code).map(|h| h.to_uppercase()),
            description: non_blank(self.description),
            ..self
        }
    }

    /// Field rules plus the per-kind requirement on `hex_code`
    pub fn validate_for(&self, kind: MasterDataKind) -> Result<()> {
        self.validate()?;
        if kind.requires_hex_code() && self.hex_code.is_none() {
            return Err(AppError::Validation(
                "hex_code: Colors require a hex code".to_string(),
            ));
        }
        Ok(())
    }
}

/// Request DTO for partially updating a master data item
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMasterDataDto {
    #[validate(length(min = 1, max = 100, message = "Name is required (max 100 characters)"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[validate(length(max = 50, message = "Code must not exceed 50 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[validate(regex(
        path = "*crate::shared::validation::HEX_COLOR_REGEX",
        message = "Hex code must look like #RRGGBB"
    ))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex_code: Option<String>,

    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    #[validate(range(min = 0, message = "Sort order must not be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl UpdateMasterDataDto {
    pub fn status(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            hex_code: self.hex_code.map(|h| h.trim().to_uppercase()),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.code.is_none()
            && self.hex_code.is_none()
            && self.description.is_none()
            && self.is_active.is_none()
            && self.sort_order.is_none()
    }
}
