//! Application configuration for the demo.

use stratum_core::scene::parse_hex_color;
use stratum_machine::ViewerOptions;

/// Default WebSocket port for the IPC bridge.
const DEFAULT_WS_PORT: u16 = 9400;

/// Runtime configuration for the Stratum demo application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// WebSocket port for viewer <-> page IPC.
    pub ws_port: u16,
    /// Slice rendering instead of volume rendering.
    pub use_2d: bool,
    /// Initial background, normalized RGB.
    pub background: Option<[f32; 3]>,
    /// Start with the UI collapsed, as an embedded viewer does.
    pub collapse_ui: bool,
    /// Stop the viewer once the first page disconnects.
    pub exit_on_disconnect: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ws_port: std::env::var("STRATUM_WS_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_WS_PORT),
            use_2d: env_flag("STRATUM_USE_2D"),
            background: std::env::var("STRATUM_BACKGROUND")
                .ok()
                .and_then(|hex| match parse_hex_color(&hex) {
                    Ok(rgb) => Some(rgb),
                    Err(e) => {
                        tracing::warn!("ignoring STRATUM_BACKGROUND: {e}");
                        None
                    }
                }),
            collapse_ui: env_flag("STRATUM_COLLAPSE_UI"),
            exit_on_disconnect: env_flag("STRATUM_EXIT_ON_DISCONNECT"),
        }
    }
}

impl AppConfig {
    pub fn viewer_options(&self) -> ViewerOptions {
        let mut options = ViewerOptions {
            use_2d: self.use_2d,
            ..ViewerOptions::default()
        };
        options.ui.collapsed = self.collapse_ui;
        if let Some(rgb) = self.background {
            options.rendering.main.background_color = rgb;
        }
        options
    }
}

/// Set and not `0`/`false`.
fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|value| !matches!(value.as_str(), "" | "0" | "false"))
}
