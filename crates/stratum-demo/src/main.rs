//! Stratum Demo: headless viewer driven by an embedding page.
//!
//! Runs the viewer machine against the recording backend and exposes it
//! over a WebSocket IPC bridge: the page posts viewer commands as JSON and
//! receives assignment, background and screenshot notifications.

mod config;
mod ipc;
mod ws_bridge;

use std::process::ExitCode;

use stratum_frontend_core::headless::HeadlessBackend;
use stratum_machine::{Notification, ViewerMachine};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::ipc::ViewerToUi;
use crate::ws_bridge::{BridgeError, WsBridge};

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(AppConfig::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("viewer failed to start: {0}")]
    Start(#[from] stratum_machine::MachineError),
}

fn run(config: AppConfig) -> Result<(), DemoError> {
    tracing::info!(?config, "starting Stratum demo");
    let mut bridge = ws_bridge::spawn_ws_server(config.ws_port, config.exit_on_disconnect)?;

    let (notify_tx, mut notify_rx) = mpsc::unbounded_channel();
    let mut viewer = ViewerMachine::new(config.viewer_options(), HeadlessBackend::new(), notify_tx);
    viewer.start()?;
    bridge.send(&initialize(&viewer))?;

    while let Some(json) = bridge.inbound_rx.blocking_recv() {
        if let Err(e) = viewer.send_json(&json) {
            tracing::warn!("command failed: {e}");
            bridge.send(&ViewerToUi::Error {
                message: e.to_string(),
            })?;
        }
        forward_notifications(&bridge, &mut notify_rx)?;
    }

    viewer.stop();
    tracing::info!("bridge closed, exiting");
    Ok(())
}

fn initialize(viewer: &ViewerMachine<HeadlessBackend>) -> ViewerToUi {
    ViewerToUi::Initialize {
        toggles: viewer.ui_toggles().unwrap_or_default(),
        background_color: viewer.scene().background_color,
        background_dark: viewer.scene().is_background_dark(),
        layers: viewer
            .layers()
            .map(|layers| layers.layer_names().to_vec())
            .unwrap_or_default(),
    }
}

fn forward_notifications(
    bridge: &WsBridge,
    notify_rx: &mut mpsc::UnboundedReceiver<Notification>,
) -> Result<(), BridgeError> {
    while let Ok(notification) = notify_rx.try_recv() {
        let msg = match ViewerToUi::from_notification(notification) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::error!("failed to encode notification: {e}");
                ViewerToUi::Error {
                    message: e.to_string(),
                }
            }
        };
        bridge.send(&msg)?;
    }
    Ok(())
}
