//! Per-layer actor: selection and visibility of a single layer.

use crate::actor::Actor;
use crate::context::ContextReader;
use crate::error::{MachineError, Result};
use crate::events::{LayerEvent, LayerSignal};

#[derive(Debug)]
pub struct LayerActor {
    name: String,
    selected: bool,
    visible: bool,
    context: ContextReader,
}

impl LayerActor {
    pub fn new(name: impl Into<String>, context: ContextReader) -> Self {
        Self {
            name: name.into(),
            selected: false,
            visible: true,
            context,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Actor for LayerActor {
    type Event = LayerEvent;
    type Output = LayerSignal;

    fn handle(&mut self, event: LayerEvent, outbox: &mut Vec<LayerSignal>) -> Result<()> {
        match event {
            LayerEvent::SelectLayer(name) => {
                let layer_type = self
                    .context
                    .layer_type(&name)
                    .ok_or_else(|| MachineError::UnknownLayer(name.clone()))?;
                self.selected = true;
                outbox.push(LayerSignal::Selected { name, layer_type });
            }
            LayerEvent::Deselect => self.selected = false,
            LayerEvent::ToggleLayerVisibility(name) => {
                self.visible = !self.visible;
                outbox.push(LayerSignal::VisibilityChanged {
                    name,
                    visible: self.visible,
                });
            }
        }
        Ok(())
    }
}
