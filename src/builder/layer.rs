use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayerKind {
    Default,
    Special,
}

impl LayerKind {
    pub fn from_name(name: &str) -> Option<LayerKind> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(LayerKind::Default),
            "special" => Some(LayerKind::Special),
            _ => None,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Default => f.write_str("DEFAULT"),
            LayerKind::Special => f.write_str("SPECIAL"),
        }
    }
}

/// One layer added through the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
}
