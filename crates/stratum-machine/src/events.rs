//! Event and notification types exchanged between the viewer's machines.
//!
//! Inbound commands use the `{ "type": ..., "data": ... }` shape so the
//! embedding page can post them verbatim. Everything below the viewer
//! coordinator is plain Rust enums.

use serde::{Deserialize, Serialize};
use stratum_core::{ImageDescriptor, LabelImageDescriptor, LayerType};
use stratum_frontend_core::CaptureResult;

/// Commands accepted by the viewer coordinator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViewerEvent {
    /// Re-apply the container style.
    StyleContainer,
    /// Normalized RGB background.
    SetBackgroundColor([f32; 3]),
    TakeScreenshot,
    ToggleDarkMode,
    ToggleUiCollapsed,
    ToggleFullscreen,
    DisableFullscreen,
    ToggleInterpolation,
    ToggleCroppingPlanes,
    AddImage(ImageDescriptor),
    AddLabelImage(LabelImageDescriptor),
    /// Layer name.
    SelectLayer(String),
    /// Layer name.
    ToggleLayerVisibility(String),
}

impl ViewerEvent {
    /// Wire name of the event type.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StyleContainer => "STYLE_CONTAINER",
            Self::SetBackgroundColor(_) => "SET_BACKGROUND_COLOR",
            Self::TakeScreenshot => "TAKE_SCREENSHOT",
            Self::ToggleDarkMode => "TOGGLE_DARK_MODE",
            Self::ToggleUiCollapsed => "TOGGLE_UI_COLLAPSED",
            Self::ToggleFullscreen => "TOGGLE_FULLSCREEN",
            Self::DisableFullscreen => "DISABLE_FULLSCREEN",
            Self::ToggleInterpolation => "TOGGLE_INTERPOLATION",
            Self::ToggleCroppingPlanes => "TOGGLE_CROPPING_PLANES",
            Self::AddImage(_) => "ADD_IMAGE",
            Self::AddLabelImage(_) => "ADD_LABEL_IMAGE",
            Self::SelectLayer(_) => "SELECT_LAYER",
            Self::ToggleLayerVisibility(_) => "TOGGLE_LAYER_VISIBILITY",
        }
    }
}

/// Notifications delivered to the embedding environment.
#[derive(Debug, Clone)]
pub enum Notification {
    ImageAssigned(String),
    LabelImageAssigned(String),
    BackgroundColorChanged([f32; 3]),
    ScreenshotTaken(CaptureResult),
}

// ── UI ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ToggleDarkMode,
    ToggleUiCollapsed,
    ToggleFullscreen,
    DisableFullscreen,
    ToggleInterpolation,
    ToggleCroppingPlanes,
    /// A dataset with this declared name started loading.
    StartLoading(String),
    /// A layer finished assignment under this name.
    LayerAssigned(String),
}

/// Requests from the UI that the coordinator hands to rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiOutput {
    SetInterpolation(bool),
    SetCroppingEnabled(bool),
}

// ── Rendering ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum RenderingEvent {
    SetBackgroundColor([f32; 3]),
    TakeScreenshot,
    SetInterpolation(bool),
    SetCroppingEnabled(bool),
    RequestAnimation(String),
    CancelAnimation(String),
    Layers(LayersEvent),
}

#[derive(Debug, Clone)]
pub enum RenderingOutput {
    ImageAssigned(String),
    LabelImageAssigned(String),
    Screenshot(CaptureResult),
}

// ── Layers ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum LayersEvent {
    AddImage(ImageDescriptor),
    AddLabelImage(LabelImageDescriptor),
    SelectLayer(String),
    ToggleLayerVisibility(String),
}

/// Data accepted by the layer assignment step.
#[derive(Debug, Clone, PartialEq)]
pub enum AddedData {
    Image(ImageDescriptor),
    LabelImage(ImageDescriptor),
}

impl AddedData {
    pub fn image(&self) -> &ImageDescriptor {
        match self {
            Self::Image(image) | Self::LabelImage(image) => image,
        }
    }

    pub const fn layer_type(&self) -> LayerType {
        match self {
            Self::Image(_) => LayerType::Image,
            Self::LabelImage(_) => LayerType::LabelImage,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayersOutput {
    ImageAssigned(String),
    LabelImageAssigned(String),
    Layer(LayerSignal),
}

/// Events forwarded to a single layer actor, payload unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerEvent {
    SelectLayer(String),
    /// Another layer took the selection.
    Deselect,
    ToggleLayerVisibility(String),
}

/// What a layer actor reports back to rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSignal {
    Selected {
        name: String,
        layer_type: LayerType,
    },
    VisibilityChanged {
        name: String,
        visible: bool,
    },
}
