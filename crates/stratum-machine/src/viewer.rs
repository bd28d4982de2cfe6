//! Viewer coordinator: the root of the machine hierarchy.
//!
//! Starts `Idle`, styles the container and builds its children on
//! [`ViewerMachine::start`], then routes external events while `Active`.
//! Every external event runs to completion: child mailboxes are drained
//! until nothing is left to do and the pending render is flushed before
//! [`ViewerMachine::send`] returns.

use stratum_core::scene::{ColorBy, DatasetKind, DatasetSummary, SceneStores};
use stratum_core::{ContainerStyle, SceneStyle, UiToggles};
use stratum_frontend_core::{ContainerElement, RenderBackend};
use tokio::sync::mpsc;

use crate::actor::{Drained, Mailbox};
use crate::emitter::EmitterActor;
use crate::error::{MachineError, Result};
use crate::events::{
    LayersEvent, Notification, RenderingEvent, RenderingOutput, UiEvent, UiOutput, ViewerEvent,
};
use crate::layers::LayersCoordinator;
use crate::options::ViewerOptions;
use crate::rendering::RenderingMachine;
use crate::ui::UiMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Idle,
    Active,
    Stopped,
}

impl ViewerState {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Active => "active",
            Self::Stopped => "stopped",
        }
    }
}

/// Children hosted while active.
struct Children<B: RenderBackend> {
    ui: Mailbox<UiMachine>,
    rendering: Mailbox<RenderingMachine<B>>,
    emitter: Mailbox<EmitterActor>,
}

pub struct ViewerMachine<B: RenderBackend> {
    options: ViewerOptions,
    state: ViewerState,
    container: ContainerElement,
    scene: SceneStyle,
    datasets: SceneStores,
    backend: Option<B>,
    notifications: mpsc::UnboundedSender<Notification>,
    children: Option<Children<B>>,
}

impl<B: RenderBackend> ViewerMachine<B> {
    /// Create an idle viewer. Notifications are delivered on `notifications`.
    pub fn new(
        options: ViewerOptions,
        backend: B,
        notifications: mpsc::UnboundedSender<Notification>,
    ) -> Self {
        let scene = SceneStyle {
            background_color: options.rendering.main.background_color,
            ..SceneStyle::default()
        };
        Self {
            container: ContainerElement::new(options.container_id.0.clone()),
            options,
            state: ViewerState::Idle,
            scene,
            datasets: SceneStores::default(),
            backend: Some(backend),
            notifications,
            children: None,
        }
    }

    fn unexpected(&self, event: &'static str) -> MachineError {
        MachineError::UnexpectedEvent {
            machine: "viewer",
            state: self.state.name(),
            event,
        }
    }

    /// Leave `Idle`: style the container, create the renderer and the
    /// children, and become `Active`.
    pub fn start(&mut self) -> Result<()> {
        if self.state != ViewerState::Idle {
            return Err(self.unexpected("START"));
        }
        let Some(backend) = self.backend.take() else {
            return Err(self.unexpected("START"));
        };
        apply_container_style(&mut self.container, &self.scene.container_style);

        let ui = UiMachine::new(
            &self.options.ui,
            self.scene.is_background_dark(),
            self.options.rendering.images.interpolation,
        );
        let rendering = RenderingMachine::new(
            backend,
            self.options.rendering.clone(),
            self.options.use_2d,
            &self.container,
        )?;
        let emitter = EmitterActor::new(self.notifications.clone());
        self.children = Some(Children {
            ui: Mailbox::new("ui", ui),
            rendering: Mailbox::new("rendering", rendering),
            emitter: Mailbox::new("eventEmitter", emitter),
        });
        self.state = ViewerState::Active;
        tracing::info!(container = %self.container.id, use_2d = self.options.use_2d, "viewer active");
        Ok(())
    }

    /// Tear down the children. Later events are rejected.
    pub fn stop(&mut self) {
        self.children = None;
        self.state = ViewerState::Stopped;
        tracing::info!("viewer stopped");
    }

    /// Decode a `{ "type": ..., "data": ... }` command and send it.
    pub fn send_json(&mut self, json: &str) -> Result<()> {
        let event: ViewerEvent = serde_json::from_str(json).inspect_err(|err| {
            tracing::warn!("rejected command: {err}");
        })?;
        self.send(event)
    }

    /// Route `event` and run every machine to quiescence.
    pub fn send(&mut self, event: ViewerEvent) -> Result<()> {
        if self.state != ViewerState::Active {
            return Err(self.unexpected(event.name()));
        }
        tracing::debug!(event = event.name(), "route");
        let Some(children) = self.children.as_mut() else {
            return Err(self.unexpected(event.name()));
        };

        let ui = children.ui.address();
        let rendering = children.rendering.address();
        match event {
            ViewerEvent::StyleContainer => {
                apply_container_style(&mut self.container, &self.scene.container_style);
            }
            ViewerEvent::SetBackgroundColor(rgb) => {
                self.scene.background_color = rgb;
                rendering.send(RenderingEvent::SetBackgroundColor(rgb));
                children
                    .emitter
                    .address()
                    .send(Notification::BackgroundColorChanged(rgb));
            }
            ViewerEvent::TakeScreenshot => {
                rendering.send(RenderingEvent::TakeScreenshot);
            }
            ViewerEvent::ToggleDarkMode => {
                ui.send(UiEvent::ToggleDarkMode);
            }
            ViewerEvent::ToggleUiCollapsed => {
                ui.send(UiEvent::ToggleUiCollapsed);
            }
            ViewerEvent::ToggleFullscreen => {
                ui.send(UiEvent::ToggleFullscreen);
            }
            ViewerEvent::DisableFullscreen => {
                ui.send(UiEvent::DisableFullscreen);
            }
            ViewerEvent::ToggleInterpolation => {
                ui.send(UiEvent::ToggleInterpolation);
            }
            ViewerEvent::ToggleCroppingPlanes => {
                ui.send(UiEvent::ToggleCroppingPlanes);
            }
            ViewerEvent::AddImage(image) => {
                ui.send(UiEvent::StartLoading(image.name.clone()));
                rendering.send(RenderingEvent::Layers(LayersEvent::AddImage(image)));
            }
            ViewerEvent::AddLabelImage(label) => {
                ui.send(UiEvent::StartLoading(label.label_image.name.clone()));
                rendering.send(RenderingEvent::Layers(LayersEvent::AddLabelImage(label)));
            }
            ViewerEvent::SelectLayer(name) => {
                rendering.send(RenderingEvent::Layers(LayersEvent::SelectLayer(name)));
            }
            ViewerEvent::ToggleLayerVisibility(name) => {
                rendering.send(RenderingEvent::Layers(LayersEvent::ToggleLayerVisibility(
                    name,
                )));
            }
        }
        self.settle()
    }

    /// Ask the renderer for continuous frames under `key`.
    pub fn request_animation(&mut self, key: &str) -> Result<()> {
        self.send_rendering(RenderingEvent::RequestAnimation(key.to_owned()), "REQUEST_ANIMATION")
    }

    /// Cancel continuous frames under `key`; unknown keys are ignored.
    pub fn cancel_animation(&mut self, key: &str) -> Result<()> {
        self.send_rendering(RenderingEvent::CancelAnimation(key.to_owned()), "CANCEL_ANIMATION")
    }

    fn send_rendering(&mut self, event: RenderingEvent, name: &'static str) -> Result<()> {
        match (self.state, self.children.as_ref()) {
            (ViewerState::Active, Some(children)) => {
                children.rendering.address().send(event);
                self.settle()
            }
            _ => Err(self.unexpected(name)),
        }
    }

    /// Add a dataset to the store of `kind` and select it.
    ///
    /// Stores outlive the children, so this works in any state.
    pub fn record_dataset(&mut self, kind: DatasetKind, summary: DatasetSummary) -> usize {
        let store = self.datasets.store_mut(kind);
        let index = store.push(summary);
        if let Err(err) = store.select(index) {
            tracing::warn!(?kind, "dataset store out of sync: {err}");
        }
        tracing::debug!(?kind, index, "dataset recorded");
        index
    }

    /// Replace the arrays of a recorded dataset.
    pub fn update_dataset(
        &mut self,
        kind: DatasetKind,
        index: usize,
        summary: DatasetSummary,
    ) -> Result<()> {
        Ok(self.datasets.store_mut(kind).set_summary(index, summary)?)
    }

    /// Color-by options and default of a recorded dataset.
    pub fn color_by(&mut self, kind: DatasetKind, index: usize) -> Result<&ColorBy> {
        Ok(self.datasets.store_mut(kind).color_by(index)?)
    }

    /// Drain children until quiescent, then flush the pending render.
    fn settle(&mut self) -> Result<()> {
        let Some(children) = self.children.as_mut() else {
            return Ok(());
        };
        let mut drained = Drained::default();
        loop {
            let before = drained.processed;

            let mut ui_outputs = Vec::new();
            drained.merge(children.ui.drain(&mut ui_outputs));
            for output in ui_outputs {
                let event = match output {
                    UiOutput::SetInterpolation(enabled) => RenderingEvent::SetInterpolation(enabled),
                    UiOutput::SetCroppingEnabled(enabled) => {
                        RenderingEvent::SetCroppingEnabled(enabled)
                    }
                };
                children.rendering.address().send(event);
            }

            let mut rendering_outputs = Vec::new();
            drained.merge(children.rendering.drain(&mut rendering_outputs));
            for output in rendering_outputs {
                let notification = match output {
                    RenderingOutput::ImageAssigned(name) => {
                        record_image(&mut self.datasets, &name);
                        children.ui.address().send(UiEvent::LayerAssigned(name.clone()));
                        Notification::ImageAssigned(name)
                    }
                    RenderingOutput::LabelImageAssigned(name) => {
                        children.ui.address().send(UiEvent::LayerAssigned(name.clone()));
                        Notification::LabelImageAssigned(name)
                    }
                    RenderingOutput::Screenshot(capture) => Notification::ScreenshotTaken(capture),
                };
                children.emitter.address().send(notification);
            }

            drained.merge(children.emitter.drain(&mut Vec::new()));
            if drained.processed == before {
                break;
            }
        }

        if let Err(err) = children.rendering.actor_mut().flush() {
            tracing::error!("render failed: {err}");
            drained.record(Some(err));
        }
        drained.into_result().map(|_| ())
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn container(&self) -> &ContainerElement {
        &self.container
    }

    pub fn scene(&self) -> &SceneStyle {
        &self.scene
    }

    pub fn datasets(&self) -> &SceneStores {
        &self.datasets
    }

    pub fn ui_toggles(&self) -> Option<UiToggles> {
        self.children.as_ref().map(|c| c.ui.actor().toggles())
    }

    pub fn is_loading(&self) -> bool {
        self.children.as_ref().is_some_and(|c| c.ui.actor().is_loading())
    }

    pub fn rendering(&self) -> Option<&RenderingMachine<B>> {
        self.children.as_ref().map(|c| c.rendering.actor())
    }

    pub fn layers(&self) -> Option<&LayersCoordinator> {
        self.rendering().map(RenderingMachine::layers)
    }
}

fn apply_container_style(container: &mut ContainerElement, style: &ContainerStyle) {
    for (property, value) in style.declarations() {
        container.set_style(property, value);
    }
}

/// Track an assigned image in the scene's image store and select it.
fn record_image(datasets: &mut SceneStores, name: &str) {
    let index = datasets.images.push(DatasetSummary::new(name));
    if let Err(err) = datasets.images.select(index) {
        tracing::warn!("image store out of sync: {err}");
    }
}
