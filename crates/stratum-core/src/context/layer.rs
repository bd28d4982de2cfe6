use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of dataset a layer displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerType {
    Image,
    LabelImage,
    Geometry,
    PointSet,
}

impl LayerType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::LabelImage => "labelImage",
            Self::Geometry => "geometry",
            Self::PointSet => "pointSet",
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Registry-side context of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerActorContext {
    #[serde(rename = "type")]
    pub layer_type: LayerType,
}

impl LayerActorContext {
    pub const fn new(layer_type: LayerType) -> Self {
        Self { layer_type }
    }
}
