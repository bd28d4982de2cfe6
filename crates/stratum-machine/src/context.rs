//! Context shared between the layers coordinator and its children.
//!
//! The coordinator is the only writer. Layer actors get a
//! [`ContextReader`], which can look but not touch.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use stratum_core::{ImageActorContext, LayerActorContext, LayerType};

use crate::events::AddedData;

/// Most recently added dataset, waiting for the assignment step.
#[derive(Debug, Clone, PartialEq)]
pub struct LastAddedData {
    pub name: String,
    pub data: AddedData,
}

#[derive(Debug, Default)]
pub struct LayersContext {
    /// Per-layer record, keyed by unique layer name.
    pub actor_context: HashMap<String, LayerActorContext>,
    /// Single slot, overwritten on every add.
    pub last_added_data: Option<LastAddedData>,
}

#[derive(Debug, Default)]
pub struct ImagesContext {
    pub selected_name: Option<String>,
    pub actor_context: HashMap<String, ImageActorContext>,
    /// Name of the label image fused with the images, if any.
    pub label_image: Option<String>,
}

#[derive(Debug, Default)]
pub struct SharedContext {
    pub layers: LayersContext,
    pub images: ImagesContext,
}

impl SharedContext {
    pub fn new_shared() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self::default()))
    }
}

/// Read-only view of the shared context.
#[derive(Debug, Clone)]
pub struct ContextReader {
    inner: Arc<RwLock<SharedContext>>,
}

impl ContextReader {
    pub fn new(inner: Arc<RwLock<SharedContext>>) -> Self {
        Self { inner }
    }

    pub fn layer_type(&self, name: &str) -> Option<LayerType> {
        self.inner
            .read()
            .layers
            .actor_context
            .get(name)
            .map(|context| context.layer_type)
    }

    pub fn image_context(&self, name: &str) -> Option<ImageActorContext> {
        self.inner.read().images.actor_context.get(name).cloned()
    }

    pub fn selected_image(&self) -> Option<String> {
        self.inner.read().images.selected_name.clone()
    }

    pub fn label_image(&self) -> Option<String> {
        self.inner.read().images.label_image.clone()
    }
}
