//! Rendering subsystem.
//!
//! Splits the renderer into independently configured areas: `main` (view,
//! container, background, screenshots), `images` (per-layer
//! representations), `widgets` (cropping planes) and `layers` (the layers
//! coordinator, hosted here as a child actor). Render requests from every
//! area coalesce in the main area until the next [`RenderingMachine::flush`].

mod actions;
mod images;
mod main;
mod widgets;

pub use images::ImagesArea;
pub use main::MainArea;
pub use widgets::WidgetsArea;

use stratum_core::LayerType;
use stratum_frontend_core::{ContainerElement, RenderBackend};

use crate::actor::{Actor, Drained, Mailbox};
use crate::error::{MachineError, Result};
use crate::events::{LayerSignal, LayersOutput, RenderingEvent, RenderingOutput};
use crate::layers::LayersCoordinator;
use crate::options::RenderingOptions;

pub struct RenderingMachine<B: RenderBackend> {
    backend: B,
    main: MainArea,
    images: ImagesArea,
    widgets: WidgetsArea,
    layers: Mailbox<LayersCoordinator>,
}

impl<B: RenderBackend> RenderingMachine<B> {
    /// Create the renderer in `container` and set up every area.
    pub fn new(
        mut backend: B,
        options: RenderingOptions,
        use_2d: bool,
        container: &ContainerElement,
    ) -> Result<Self> {
        let main = MainArea::create_renderer(&mut backend, &options.main, container)?;
        let layers = LayersCoordinator::new(options.layers, use_2d);
        Ok(Self {
            backend,
            main,
            images: ImagesArea::new(options.images, use_2d),
            widgets: WidgetsArea::new(options.widgets),
            layers: Mailbox::new("layers", layers),
        })
    }

    pub fn main(&self) -> &MainArea {
        &self.main
    }

    pub fn images(&self) -> &ImagesArea {
        &self.images
    }

    pub fn widgets(&self) -> &WidgetsArea {
        &self.widgets
    }

    pub fn layers(&self) -> &LayersCoordinator {
        self.layers.actor()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Frame boundary: issue the pending render, if any.
    pub fn flush(&mut self) -> Result<bool> {
        self.main.flush()
    }

    fn assign_layer(&mut self, name: &str, layer_type: LayerType) -> Result<()> {
        let context = self
            .layers
            .actor()
            .image_context(name)
            .ok_or_else(|| MachineError::UnknownLayer(name.to_owned()))?;
        self.images.assign(
            &mut self.backend,
            self.main.view.as_mut(),
            name,
            layer_type,
            &context,
        )?;
        if layer_type == LayerType::Image {
            self.main.set_source_image(name)?;
            self.widgets.follow(name)?;
        }
        self.main.render_later();
        Ok(())
    }

    fn apply_layers_output(
        &mut self,
        output: LayersOutput,
        outbox: &mut Vec<RenderingOutput>,
    ) -> Result<()> {
        match output {
            LayersOutput::ImageAssigned(name) => {
                self.assign_layer(&name, LayerType::Image)?;
                outbox.push(RenderingOutput::ImageAssigned(name));
            }
            LayersOutput::LabelImageAssigned(name) => {
                self.assign_layer(&name, LayerType::LabelImage)?;
                outbox.push(RenderingOutput::LabelImageAssigned(name));
            }
            LayersOutput::Layer(LayerSignal::Selected { name, layer_type }) => {
                if layer_type == LayerType::Image {
                    self.main.set_source_image(&name)?;
                    self.widgets.follow(&name)?;
                }
                self.main.render_later();
            }
            LayersOutput::Layer(LayerSignal::VisibilityChanged { name, visible }) => {
                self.images.set_visibility(&name, visible)?;
                self.main.render_later();
            }
        }
        Ok(())
    }
}

impl<B: RenderBackend> Actor for RenderingMachine<B> {
    type Event = RenderingEvent;
    type Output = RenderingOutput;

    fn handle(&mut self, event: RenderingEvent, outbox: &mut Vec<RenderingOutput>) -> Result<()> {
        match event {
            RenderingEvent::SetBackgroundColor(rgb) => {
                self.main.set_background(rgb)?;
                self.main.render_later();
            }
            RenderingEvent::TakeScreenshot => {
                let capture = self.main.capture()?;
                let (width, height) = capture.size();
                tracing::info!(width, height, "screenshot captured");
                outbox.push(RenderingOutput::Screenshot(capture));
            }
            RenderingEvent::SetInterpolation(enabled) => {
                self.images.set_interpolation(enabled)?;
                self.main.render_later();
            }
            RenderingEvent::SetCroppingEnabled(enabled) => {
                self.widgets
                    .set_cropping_enabled(&mut self.backend, enabled)?;
                self.main.render_later();
            }
            RenderingEvent::RequestAnimation(key) => self.main.request_animation(&key),
            RenderingEvent::CancelAnimation(key) => {
                self.main.cancel_animation(&key);
            }
            RenderingEvent::Layers(event) => {
                self.layers.address().send(event);
            }
        }
        Ok(())
    }

    fn run_children(&mut self, outbox: &mut Vec<RenderingOutput>) -> Drained {
        let mut outputs = Vec::new();
        let mut drained = self.layers.drain(&mut outputs);
        for output in outputs {
            if let Err(err) = self.apply_layers_output(output, outbox) {
                tracing::error!("failed to apply layer change: {err}");
                drained.record(Some(err));
            }
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::LayersEvent;
    use stratum_core::{ComponentType, ImageDescriptor};
    use stratum_frontend_core::headless::{BackendCall, HeadlessBackend};

    fn machine() -> Mailbox<RenderingMachine<HeadlessBackend>> {
        let rendering = RenderingMachine::new(
            HeadlessBackend::new(),
            RenderingOptions::default(),
            false,
            &ContainerElement::new("viewer"),
        )
        .unwrap();
        Mailbox::new("rendering", rendering)
    }

    fn run(
        mailbox: &mut Mailbox<RenderingMachine<HeadlessBackend>>,
        event: RenderingEvent,
    ) -> Vec<RenderingOutput> {
        mailbox.address().send(event);
        let mut outbox = Vec::new();
        mailbox.drain(&mut outbox).into_result().unwrap();
        outbox
    }

    #[test]
    fn renderer_creates_view_and_image_source() {
        let rendering = machine();
        let calls = rendering.actor().backend().log().snapshot();
        let kinds: Vec<&str> = calls
            .iter()
            .filter_map(|call| match call {
                BackendCall::CreateProxy { kind, .. } => Some(kind.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, ["ItkVtkView", "TrivialProducer"]);
        assert!(calls.contains(&BackendCall::CreateProxy {
            id: 2,
            category: stratum_frontend_core::ProxyCategory::Sources,
            kind: "TrivialProducer".into(),
            name: Some("Image".into()),
        }));
    }

    #[test]
    fn render_requests_coalesce() {
        let mut rendering = machine();
        let log = rendering.actor().backend().log();
        for rgb in [[0.1; 3], [0.2; 3], [0.3; 3]] {
            run(&mut rendering, RenderingEvent::SetBackgroundColor(rgb));
        }
        assert_eq!(log.renders(), 0);
        assert!(rendering.actor_mut().flush().unwrap());
        assert!(!rendering.actor_mut().flush().unwrap());
        assert_eq!(log.renders(), 1);
        assert_eq!(rendering.actor().main().background(), [0.3; 3]);
    }

    #[test]
    fn added_image_gets_a_representation() {
        let mut rendering = machine();
        let out = run(
            &mut rendering,
            RenderingEvent::Layers(LayersEvent::AddImage(ImageDescriptor::new(
                "ct",
                1,
                ComponentType::Int16,
            ))),
        );
        assert!(matches!(out.as_slice(), [RenderingOutput::ImageAssigned(name)] if name == "ct"));
        let rendering_ref = rendering.actor();
        assert!(rendering_ref.images().has_representation("ct"));
        assert_eq!(rendering_ref.widgets().target(), Some("ct"));
        let log = rendering_ref.backend().log();
        assert_eq!(
            log.count(|call| matches!(call, BackendCall::AddRepresentation { .. })),
            1
        );
        assert!(log.snapshot().iter().any(|call| matches!(
            call,
            BackendCall::CreateProxy { kind, name: Some(name), .. } if kind == "Volume" && name == "ct"
        )));
    }

    #[test]
    fn visibility_signal_reaches_representation() {
        let mut rendering = machine();
        run(
            &mut rendering,
            RenderingEvent::Layers(LayersEvent::AddImage(ImageDescriptor::new(
                "ct",
                1,
                ComponentType::Int16,
            ))),
        );
        run(
            &mut rendering,
            RenderingEvent::Layers(LayersEvent::ToggleLayerVisibility("ct".into())),
        );
        let log = rendering.actor().backend().log();
        assert!(log.snapshot().iter().any(|call| matches!(
            call,
            BackendCall::SetProperty { key, value, .. } if key == "visibility" && *value == serde_json::Value::Bool(false)
        )));
    }

    #[test]
    fn cropping_widget_is_created_once() {
        let mut rendering = machine();
        run(&mut rendering, RenderingEvent::SetCroppingEnabled(false));
        run(&mut rendering, RenderingEvent::SetCroppingEnabled(true));
        run(&mut rendering, RenderingEvent::SetCroppingEnabled(false));
        run(&mut rendering, RenderingEvent::SetCroppingEnabled(true));
        let log = rendering.actor().backend().log();
        let widgets = log.count(|call| {
            matches!(
                call,
                BackendCall::CreateProxy {
                    category: stratum_frontend_core::ProxyCategory::Widgets,
                    ..
                }
            )
        });
        assert_eq!(widgets, 1);
        assert!(rendering.actor().widgets().cropping_enabled());
    }

    #[test]
    fn screenshot_is_reported_to_parent() {
        let mut rendering = machine();
        run(&mut rendering, RenderingEvent::SetBackgroundColor([1.0, 1.0, 1.0]));
        let out = run(&mut rendering, RenderingEvent::TakeScreenshot);
        let [RenderingOutput::Screenshot(capture)] = out.as_slice() else {
            panic!("expected one screenshot, got {out:?}");
        };
        assert_eq!(capture.size(), (300, 300));
        assert_eq!(&capture.clone().into_rgba()[..4], &[255, 255, 255, 255]);
        assert!(!rendering.actor().main().is_render_pending());
    }

    #[test]
    fn cancelling_unknown_animation_is_noop() {
        let mut rendering = machine();
        let log = rendering.actor().backend().log();
        run(&mut rendering, RenderingEvent::CancelAnimation("spin".into()));
        run(&mut rendering, RenderingEvent::RequestAnimation("spin".into()));
        run(&mut rendering, RenderingEvent::CancelAnimation("spin".into()));
        run(&mut rendering, RenderingEvent::CancelAnimation("spin".into()));
        assert_eq!(
            log.count(|call| matches!(call, BackendCall::CancelAnimation { .. })),
            1
        );
        assert_eq!(rendering.actor().main().animations().count(), 0);
    }
}
