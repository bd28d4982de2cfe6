//! Viewer-level scene state: background, container style, UI toggles and
//! per-kind dataset stores.

pub mod color_by;
pub mod dataset;
pub mod style;

pub use color_by::{ColorBy, ColorByOption, DataArray, DataLocation, DatasetSummary};
pub use dataset::{DatasetKind, DatasetStore, RenderParams, SceneStores};
pub use style::{ContainerStyle, SceneStyle, parse_hex_color};

use serde::{Deserialize, Serialize};

/// Interface toggles owned by the UI subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiToggles {
    pub collapsed: bool,
    pub fullscreen: bool,
    pub dark_mode: bool,
    pub interpolation_enabled: bool,
    pub cropping_enabled: bool,
}

impl Default for UiToggles {
    fn default() -> Self {
        Self {
            collapsed: false,
            fullscreen: false,
            dark_mode: false,
            interpolation_enabled: true,
            cropping_enabled: false,
        }
    }
}
