use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum MasterDataKind {
    Colors,
    Sizes,
    Materials,
    Occasions,
    Seasons,
    Patterns,
    Fabrics,
}

impl MasterDataKind {
    /// Backend collection path
    pub fn path(self) -> &'static str {
        match self {
            MasterDataKind::Colors => "colors",
            MasterDataKind::Sizes => "sizes",
            MasterDataKind::Materials => "materials",
            MasterDataKind::Occasions => "occasions",
            MasterDataKind::Seasons => "seasons",
            MasterDataKind::Patterns => "patterns",
            MasterDataKind::Fabrics => "fabrics",
        }
    }

    /// Singular display name
    pub fn label(self) -> &'static str {
        match self {
            MasterDataKind::Colors => "color",
            MasterDataKind::Sizes => "size",
            MasterDataKind::Materials => "material",
            MasterDataKind::Occasions => "occasion",
            MasterDataKind::Seasons => "season",
            MasterDataKind::Patterns => "pattern",
            MasterDataKind::Fabrics => "fabric",
        }
    }

    pub fn requires_hex_code(self) -> bool {
        self == MasterDataKind::Colors
    }
}

impl fmt::Display for MasterDataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterDataItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}
