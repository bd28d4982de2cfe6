//! Image descriptors as they arrive with `ADD_IMAGE` / `ADD_LABEL_IMAGE`.
//!
//! Pixel buffers are owned by the excluded loaders; the orchestration layer
//! only needs the declared name and the pixel layout.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Scalar type of a single pixel component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    #[serde(rename = "int8_t")]
    Int8,
    #[serde(rename = "uint8_t")]
    UInt8,
    #[serde(rename = "int16_t")]
    Int16,
    #[serde(rename = "uint16_t")]
    UInt16,
    #[serde(rename = "int32_t")]
    Int32,
    #[serde(rename = "uint32_t")]
    UInt32,
    #[serde(rename = "int64_t")]
    Int64,
    #[serde(rename = "uint64_t")]
    UInt64,
    #[serde(rename = "float")]
    Float32,
    #[serde(rename = "double")]
    Float64,
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int8 => write!(f, "8-bit signed"),
            Self::UInt8 => write!(f, "8-bit unsigned"),
            Self::Int16 => write!(f, "16-bit signed"),
            Self::UInt16 => write!(f, "16-bit unsigned"),
            Self::Int32 => write!(f, "32-bit signed"),
            Self::UInt32 => write!(f, "32-bit unsigned"),
            Self::Int64 => write!(f, "64-bit signed"),
            Self::UInt64 => write!(f, "64-bit unsigned"),
            Self::Float32 => write!(f, "32-bit float"),
            Self::Float64 => write!(f, "64-bit float"),
        }
    }
}

fn default_dimension() -> u32 {
    3
}

/// Pixel layout of an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageType {
    /// Spatial dimension (2 or 3).
    #[serde(default = "default_dimension")]
    pub dimension: u32,
    /// Number of components per pixel.
    pub components: usize,
    /// Scalar type of each component.
    pub component_type: ComponentType,
    /// Pixel semantic ("Scalar", "RGB", "VariableLengthVector", ...), if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_type: Option<String>,
}

/// An image as declared by the loader.
///
/// Fields the viewer does not interpret (`size`, `spacing`, `origin`, ...)
/// are kept verbatim in `extra` so they survive a round trip to the
/// embedding page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    /// Declared name; the layer name is derived from it.
    pub name: String,
    /// Pixel layout.
    pub image_type: ImageType,
    /// Remaining descriptor fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageDescriptor {
    /// Descriptor for a 3D image with the given layout and no extra fields.
    pub fn new(name: impl Into<String>, components: usize, component_type: ComponentType) -> Self {
        Self {
            name: name.into(),
            image_type: ImageType {
                dimension: default_dimension(),
                components,
                component_type,
                pixel_type: None,
            },
            extra: Map::new(),
        }
    }

    pub fn components(&self) -> usize {
        self.image_type.components
    }

    pub fn component_type(&self) -> ComponentType {
        self.image_type.component_type
    }
}

/// Payload of `ADD_LABEL_IMAGE`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelImageDescriptor {
    pub label_image: ImageDescriptor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_parses_loader_json_and_keeps_unknown_fields() {
        let json = serde_json::json!({
            "name": "ct",
            "imageType": { "dimension": 2, "components": 3, "componentType": "uint8_t" },
            "size": [64, 64],
        });
        let image: ImageDescriptor = serde_json::from_value(json).expect("descriptor");
        assert_eq!(image.name, "ct");
        assert_eq!(image.image_type.dimension, 2);
        assert_eq!(image.components(), 3);
        assert_eq!(image.component_type(), ComponentType::UInt8);
        assert_eq!(image.extra["size"], serde_json::json!([64, 64]));
    }

    #[test]
    fn label_payload_uses_camel_case_key() {
        let json = serde_json::json!({
            "labelImage": {
                "name": "seg",
                "imageType": { "components": 1, "componentType": "uint16_t" },
            }
        });
        let label: LabelImageDescriptor = serde_json::from_value(json).expect("label");
        assert_eq!(label.label_image.name, "seg");
        assert_eq!(label.label_image.image_type.dimension, 3);
    }
}
