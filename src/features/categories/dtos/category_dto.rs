use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::shared::validation::{non_blank, slugify};

/// Request DTO for creating a category
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(
        length(min = 1, max = 255, message = "Slug must be 1-255 characters"),
        regex(
            path = "*crate::shared::validation::SLUG_REGEX",
            message = "Slug must contain only lowercase letters, digits and single hyphens"
        )
    )]
    pub slug: String,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    pub is_active: bool,

    #[validate(range(min = 0, message = "Sort order must not be negative"))]
    pub sort_order: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[validate(url(message = "Image must be a valid URL"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CreateCategoryDto {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: String::new(),
            description: None,
            parent_id: None,
            is_active: true,
            sort_order: 0,
            icon: None,
            image: None,
            color: None,
        }
    }

    /// Trim form input, derive a missing slug from the name, drop blank optionals
    pub fn normalized(self) -> Self {
        let name = self.name.trim().to_string();
        let slug = match self.slug.trim() {
            "" => slugify(&name),
            slug => slug.to_string(),
        };

        Self {
            name,
            slug,
            description: non_blank(self.description),
            parent_id: non_blank(self.parent_id),
            icon: non_blank(self.icon),
            image: non_blank(self.image),
            color: non_blank(self.color),
            ..self
        }
    }
}

/// Request DTO for partially updating a category; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[validate(
        length(min = 1, max = 255, message = "Slug must be 1-255 characters"),
        regex(
            path = "*crate::shared::validation::SLUG_REGEX",
            message = "Slug must contain only lowercase letters, digits and single hyphens"
        )
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `Some(None)` moves the category to the root level (serialized as `null`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,

    #[validate(range(min = 0, message = "Sort order must not be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    #[validate(url(message = "Image must be a valid URL"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl UpdateCategoryDto {
    /// Status-only update used by the list view toggle
    pub fn status(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            name: self.name.map(|n| n.trim().to_string()),
            slug: self.slug.map(|s| s.trim().to_string()),
            parent_id: self.parent_id.map(non_blank),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.slug.is_none()
            && self.description.is_none()
            && self.parent_id.is_none()
            && self.is_active.is_none()
            && self.sort_order.is_none()
            && self.icon.is_none()
            && self.image.is_none()
            && self.color.is_none()
    }
}
