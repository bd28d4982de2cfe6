//! Viewer configuration.
//!
//! Each area of the rendering subsystem is configured independently so a
//! host can swap, say, the image representation kinds without touching the
//! main view.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerOptions {
    /// Slice rendering instead of volume rendering.
    pub use_2d: bool,
    /// Id of the container element the viewer renders into.
    pub container_id: ContainerId,
    pub ui: UiOptions,
    pub rendering: RenderingOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(pub String);

impl Default for ContainerId {
    fn default() -> Self {
        Self("stratum-viewer".into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiOptions {
    /// Start with the control panel collapsed.
    pub collapsed: bool,
    /// Force dark mode on or off; follows the background when unset.
    pub dark_mode: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderingOptions {
    pub main: MainOptions,
    pub layers: LayersOptions,
    pub images: ImagesOptions,
    pub widgets: WidgetsOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MainOptions {
    pub view_kind: String,
    pub source_kind: String,
    /// Render window size in pixels.
    pub size: [u32; 2],
    /// Normalized RGB.
    pub background_color: [f32; 3],
}

impl Default for MainOptions {
    fn default() -> Self {
        Self {
            view_kind: "ItkVtkView".into(),
            source_kind: "TrivialProducer".into(),
            size: [300, 300],
            background_color: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayersOptions {
    /// Prefix of layer actor ids; the layer name follows.
    pub actor_id_prefix: String,
}

impl Default for LayersOptions {
    fn default() -> Self {
        Self {
            actor_id_prefix: "layerUIActor-".into(),
        }
    }
}

impl LayersOptions {
    pub fn actor_id(&self, name: &str) -> String {
        format!("{}{name}", self.actor_id_prefix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImagesOptions {
    pub slice_kind: String,
    pub volume_kind: String,
    pub label_kind: String,
    /// Linear interpolation of voxel values.
    pub interpolation: bool,
}

impl Default for ImagesOptions {
    fn default() -> Self {
        Self {
            slice_kind: "ImageSlice".into(),
            volume_kind: "Volume".into(),
            label_kind: "LabelMap".into(),
            interpolation: true,
        }
    }
}

impl ImagesOptions {
    pub fn image_kind(&self, use_2d: bool) -> &str {
        if use_2d {
            &self.slice_kind
        } else {
            &self.volume_kind
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetsOptions {
    pub cropping_widget_kind: String,
}

impl Default for WidgetsOptions {
    fn default() -> Self {
        Self {
            cropping_widget_kind: "ImageCroppingWidget".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_options_keep_other_defaults() {
        let options: ViewerOptions = serde_json::from_str(
            r#"{"use2d":true,"rendering":{"images":{"interpolation":false}}}"#,
        )
        .unwrap();
        assert!(options.use_2d);
        assert!(!options.rendering.images.interpolation);
        assert_eq!(options.rendering.images.volume_kind, "Volume");
        assert_eq!(options.rendering.main.view_kind, "ItkVtkView");
        assert_eq!(options.container_id.0, "stratum-viewer");
    }

    #[test]
    fn layer_actor_ids_use_prefix() {
        let layers = LayersOptions::default();
        assert_eq!(layers.actor_id("ct-1"), "layerUIActor-ct-1");
    }
}
