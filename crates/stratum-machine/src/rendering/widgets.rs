//! Widgets area: the cropping planes widget.

use serde_json::json;
use stratum_frontend_core::{Proxy, ProxyCategory, ProxyOptions, RenderBackend};

use crate::error::Result;
use crate::options::WidgetsOptions;

pub struct WidgetsArea {
    options: WidgetsOptions,
    cropping: Option<Box<dyn Proxy>>,
    cropping_enabled: bool,
    /// Image the cropping planes bound.
    target: Option<String>,
}

impl WidgetsArea {
    pub fn new(options: WidgetsOptions) -> Self {
        Self {
            options,
            cropping: None,
            cropping_enabled: false,
            target: None,
        }
    }

    pub fn cropping_enabled(&self) -> bool {
        self.cropping_enabled
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Enable or disable cropping, creating the widget on first enable.
    pub fn set_cropping_enabled(
        &mut self,
        backend: &mut impl RenderBackend,
        enabled: bool,
    ) -> Result<()> {
        self.cropping_enabled = enabled;
        if self.cropping.is_none() {
            if !enabled {
                return Ok(());
            }
            let mut widget = backend.create_proxy(
                ProxyCategory::Widgets,
                &self.options.cropping_widget_kind,
                ProxyOptions::named("Cropping"),
            )?;
            if let Some(target) = &self.target {
                widget.set_property("image", json!(target))?;
            }
            self.cropping = Some(widget);
        }
        if let Some(widget) = self.cropping.as_mut() {
            widget.set_property("enabled", json!(enabled))?;
        }
        Ok(())
    }

    /// Bound the cropping planes to `name`.
    pub fn follow(&mut self, name: &str) -> Result<()> {
        if self.target.as_deref() == Some(name) {
            return Ok(());
        }
        self.target = Some(name.to_owned());
        if let Some(widget) = self.cropping.as_mut() {
            widget.set_property("image", json!(name))?;
        }
        Ok(())
    }
}
