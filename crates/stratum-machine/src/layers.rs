//! Layers coordinator.
//!
//! Owns the layer actor registry and is the single writer of the shared
//! layer and image contexts. Adding a dataset is a two-step transition:
//! spawn the layer actor under a unique name, then assign default
//! visualization parameters to the queued data and tell the parent.

use std::sync::Arc;

use parking_lot::RwLock;
use stratum_core::{
    DefaultPolicy, ImageActorContext, LabelImageDescriptor, LayerActorContext, LayerType,
    assign_image_defaults, unique_name,
};

use crate::actor::{Actor, ActorRegistry, Drained};
use crate::context::{ContextReader, LastAddedData, SharedContext};
use crate::error::{MachineError, Result};
use crate::events::{AddedData, LayerEvent, LayersEvent, LayersOutput};
use crate::layer_actor::LayerActor;
use crate::options::LayersOptions;

pub struct LayersCoordinator {
    options: LayersOptions,
    use_2d: bool,
    context: Arc<RwLock<SharedContext>>,
    actors: ActorRegistry<LayerActor>,
    /// Layer whose actor currently holds the selection, of any type.
    selected_layer: Option<String>,
}

impl LayersCoordinator {
    pub fn new(options: LayersOptions, use_2d: bool) -> Self {
        Self {
            options,
            use_2d,
            context: SharedContext::new_shared(),
            actors: ActorRegistry::new(),
            selected_layer: None,
        }
    }

    pub fn reader(&self) -> ContextReader {
        ContextReader::new(Arc::clone(&self.context))
    }

    /// Layer names in z-order.
    pub fn layer_names(&self) -> &[String] {
        self.actors.keys()
    }

    pub fn actor_ids(&self) -> Vec<String> {
        self.actors.ids()
    }

    pub fn actor(&self, name: &str) -> Option<&LayerActor> {
        self.actors.get(name)
    }

    pub fn layer_type(&self, name: &str) -> Option<LayerType> {
        self.reader().layer_type(name)
    }

    pub fn image_context(&self, name: &str) -> Option<ImageActorContext> {
        self.reader().image_context(name)
    }

    pub fn selected_image(&self) -> Option<String> {
        self.reader().selected_image()
    }

    pub fn label_image(&self) -> Option<String> {
        self.reader().label_image()
    }

    fn spawn_layer_actor(&mut self, data: AddedData) -> String {
        let name = unique_name(&data.image().name, |candidate| {
            self.actors.contains(candidate)
        });
        let layer_type = data.layer_type();
        {
            let mut shared = self.context.write();
            shared
                .layers
                .actor_context
                .entry(name.clone())
                .and_modify(|context| context.layer_type = layer_type)
                .or_insert_with(|| LayerActorContext::new(layer_type));
            shared.layers.last_added_data = Some(LastAddedData {
                name: name.clone(),
                data,
            });
        }

        let id = self.options.actor_id(&name);
        let actor = LayerActor::new(name.clone(), self.reader());
        self.actors.spawn(name.clone(), id, actor);
        tracing::info!(layer = %name, %layer_type, "layer added");
        name
    }

    fn assign_image_context(&mut self, outbox: &mut Vec<LayersOutput>) -> Result<()> {
        let mut guard = self.context.write();
        let shared = &mut *guard;
        let LastAddedData { name, data } = shared
            .layers
            .last_added_data
            .take()
            .ok_or(MachineError::NothingQueued)?;

        let images = &mut shared.images;
        match data {
            AddedData::Image(_) => images.selected_name = Some(name.clone()),
            AddedData::LabelImage(_) => images.label_image = Some(name.clone()),
        }
        let policy = DefaultPolicy {
            use_2d: self.use_2d,
            label_image_fused: images.label_image.is_some(),
        };
        let context = images.actor_context.entry(name.clone()).or_default();
        assign_image_defaults(context, data.image(), policy);
        drop(guard);

        outbox.push(match data {
            AddedData::Image(_) => LayersOutput::ImageAssigned(name),
            AddedData::LabelImage(_) => LayersOutput::LabelImageAssigned(name),
        });
        Ok(())
    }

    fn select_layer(&mut self, name: String) {
        if self.layer_type(&name) == Some(LayerType::Image) {
            self.context.write().images.selected_name = Some(name.clone());
        }
        let event = LayerEvent::SelectLayer(name.clone());
        if !self.actors.send(&name, event) {
            return;
        }
        match self.selected_layer.replace(name.clone()) {
            Some(previous) if previous != name => {
                self.actors.send(&previous, LayerEvent::Deselect);
            }
            _ => {}
        }
    }
}

impl Actor for LayersCoordinator {
    type Event = LayersEvent;
    type Output = LayersOutput;

    fn handle(&mut self, event: LayersEvent, outbox: &mut Vec<LayersOutput>) -> Result<()> {
        match event {
            LayersEvent::AddImage(image) => {
                self.spawn_layer_actor(AddedData::Image(image));
                self.assign_image_context(outbox)
            }
            LayersEvent::AddLabelImage(LabelImageDescriptor { label_image }) => {
                self.spawn_layer_actor(AddedData::LabelImage(label_image));
                self.assign_image_context(outbox)
            }
            LayersEvent::SelectLayer(name) => {
                self.select_layer(name);
                Ok(())
            }
            LayersEvent::ToggleLayerVisibility(name) => {
                let event = LayerEvent::ToggleLayerVisibility(name.clone());
                self.actors.send(&name, event);
                Ok(())
            }
        }
    }

    fn run_children(&mut self, outbox: &mut Vec<LayersOutput>) -> Drained {
        let mut signals = Vec::new();
        let drained = self.actors.drain(&mut signals);
        outbox.extend(signals.into_iter().map(LayersOutput::Layer));
        drained
    }
}
