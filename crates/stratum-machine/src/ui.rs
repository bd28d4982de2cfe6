//! UI subsystem: panel toggles and the loading indicator.

use stratum_core::UiToggles;

use crate::actor::Actor;
use crate::error::Result;
use crate::events::{UiEvent, UiOutput};
use crate::options::UiOptions;

#[derive(Debug, Default)]
pub struct UiMachine {
    toggles: UiToggles,
    /// Datasets announced but not yet assigned.
    loading: usize,
}

impl UiMachine {
    /// Initial toggles; dark mode follows the background unless forced.
    /// `interpolation` must match the images area's initial setting.
    pub fn new(options: &UiOptions, background_dark: bool, interpolation: bool) -> Self {
        Self {
            toggles: UiToggles {
                collapsed: options.collapsed,
                dark_mode: options.dark_mode.unwrap_or(background_dark),
                interpolation_enabled: interpolation,
                ..UiToggles::default()
            },
            loading: 0,
        }
    }

    pub fn toggles(&self) -> UiToggles {
        self.toggles
    }

    pub fn is_loading(&self) -> bool {
        self.loading > 0
    }
}

impl Actor for UiMachine {
    type Event = UiEvent;
    type Output = UiOutput;

    fn handle(&mut self, event: UiEvent, outbox: &mut Vec<UiOutput>) -> Result<()> {
        let toggles = &mut self.toggles;
        match event {
            UiEvent::ToggleDarkMode => toggles.dark_mode = !toggles.dark_mode,
            UiEvent::ToggleUiCollapsed => toggles.collapsed = !toggles.collapsed,
            UiEvent::ToggleFullscreen => toggles.fullscreen = !toggles.fullscreen,
            UiEvent::DisableFullscreen => toggles.fullscreen = false,
            UiEvent::ToggleInterpolation => {
                toggles.interpolation_enabled = !toggles.interpolation_enabled;
                outbox.push(UiOutput::SetInterpolation(toggles.interpolation_enabled));
            }
            UiEvent::ToggleCroppingPlanes => {
                toggles.cropping_enabled = !toggles.cropping_enabled;
                outbox.push(UiOutput::SetCroppingEnabled(toggles.cropping_enabled));
            }
            UiEvent::StartLoading(name) => {
                tracing::debug!(%name, "loading");
                self.loading += 1;
            }
            UiEvent::LayerAssigned(name) => {
                tracing::debug!(%name, "loaded");
                self.loading = self.loading.saturating_sub(1);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send(ui: &mut UiMachine, event: UiEvent) -> Vec<UiOutput> {
        let mut outbox = Vec::new();
        ui.handle(event, &mut outbox).unwrap();
        outbox
    }

    #[test]
    fn dark_mode_follows_background_unless_forced() {
        assert!(UiMachine::new(&UiOptions::default(), true, true).toggles().dark_mode);
        let forced = UiOptions {
            dark_mode: Some(false),
            ..UiOptions::default()
        };
        assert!(!UiMachine::new(&forced, true, true).toggles().dark_mode);
    }

    #[test]
    fn disable_fullscreen_is_idempotent() {
        let mut ui = UiMachine::default();
        send(&mut ui, UiEvent::ToggleFullscreen);
        assert!(ui.toggles().fullscreen);
        send(&mut ui, UiEvent::DisableFullscreen);
        send(&mut ui, UiEvent::DisableFullscreen);
        assert!(!ui.toggles().fullscreen);
    }

    #[test]
    fn interpolation_toggle_requests_rendering_change() {
        let mut ui = UiMachine::default();
        assert_eq!(
            send(&mut ui, UiEvent::ToggleInterpolation),
            vec![UiOutput::SetInterpolation(false)]
        );
        assert_eq!(
            send(&mut ui, UiEvent::ToggleCroppingPlanes),
            vec![UiOutput::SetCroppingEnabled(true)]
        );
        assert!(send(&mut ui, UiEvent::ToggleUiCollapsed).is_empty());
    }

    #[test]
    fn interpolation_starts_from_rendering_setting() {
        let mut ui = UiMachine::new(&UiOptions::default(), false, false);
        assert!(!ui.toggles().interpolation_enabled);
        assert_eq!(
            send(&mut ui, UiEvent::ToggleInterpolation),
            vec![UiOutput::SetInterpolation(true)]
        );
    }

    #[test]
    fn loading_clears_after_assignment() {
        let mut ui = UiMachine::default();
        send(&mut ui, UiEvent::StartLoading("ct".into()));
        send(&mut ui, UiEvent::StartLoading("ct".into()));
        send(&mut ui, UiEvent::LayerAssigned("ct".into()));
        assert!(ui.is_loading());
        send(&mut ui, UiEvent::LayerAssigned("ct-1".into()));
        assert!(!ui.is_loading());
    }
}
