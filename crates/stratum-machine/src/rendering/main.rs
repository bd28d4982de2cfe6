//! Main area: the view, its container and the image source.

use std::collections::HashSet;

use serde_json::json;
use stratum_frontend_core::{
    CaptureResult, ContainerElement, FrontendError, Proxy, ProxyCategory, ProxyOptions,
    RenderBackend,
};

use crate::error::Result;
use crate::options::MainOptions;

pub struct MainArea {
    pub(super) view: Box<dyn Proxy>,
    pub(super) image_source: Box<dyn Proxy>,
    pub(super) background: [f32; 3],
    pub(super) render_pending: bool,
    pub(super) animations: HashSet<String>,
}

impl MainArea {
    /// Create the view inside `container` and the source feeding it images.
    pub fn create_renderer(
        backend: &mut impl RenderBackend,
        options: &MainOptions,
        container: &ContainerElement,
    ) -> Result<Self> {
        let [width, height] = options.size;
        let view_options = ProxyOptions::default().with("size", json!([width, height]));
        let mut view = backend.create_proxy(ProxyCategory::Views, &options.view_kind, view_options)?;
        view.set_container(container)?;
        view.set_background(options.background_color)?;

        let image_source = backend.create_proxy(
            ProxyCategory::Sources,
            &options.source_kind,
            ProxyOptions::named("Image"),
        )?;
        tracing::info!(
            view = view.id(),
            source = image_source.id(),
            container = %container.id,
            "renderer created"
        );

        Ok(Self {
            view,
            image_source,
            background: options.background_color,
            render_pending: false,
            animations: HashSet::new(),
        })
    }

    pub fn background(&self) -> [f32; 3] {
        self.background
    }

    pub fn set_background(&mut self, rgb: [f32; 3]) -> Result<()> {
        self.view.set_background(rgb)?;
        self.background = rgb;
        Ok(())
    }

    /// Point the image source at the named layer.
    pub fn set_source_image(&mut self, name: &str) -> Result<()> {
        self.image_source.set_property("image", json!(name))?;
        Ok(())
    }

    /// Render then read back the frame.
    pub fn capture(&mut self) -> Result<CaptureResult> {
        self.render()?;
        let kind = self.view.kind().to_owned();
        let window = self.view.render_window().ok_or(FrontendError::Unsupported {
            kind,
            operation: "capture",
        })?;
        Ok(window.capture()?)
    }
}
