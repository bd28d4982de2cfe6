//! Images area: one representation proxy per image layer.

use std::collections::HashMap;

use serde_json::json;
use stratum_core::{ImageActorContext, LayerType};
use stratum_frontend_core::{Proxy, ProxyCategory, ProxyOptions, RenderBackend};

use crate::error::{MachineError, Result};
use crate::options::ImagesOptions;

pub struct ImagesArea {
    options: ImagesOptions,
    use_2d: bool,
    interpolation: bool,
    representations: HashMap<String, Box<dyn Proxy>>,
}

impl ImagesArea {
    pub fn new(options: ImagesOptions, use_2d: bool) -> Self {
        Self {
            interpolation: options.interpolation,
            options,
            use_2d,
            representations: HashMap::new(),
        }
    }

    pub fn interpolation(&self) -> bool {
        self.interpolation
    }

    pub fn has_representation(&self, name: &str) -> bool {
        self.representations.contains_key(name)
    }

    fn kind_for(&self, layer_type: LayerType) -> &str {
        match layer_type {
            LayerType::LabelImage => &self.options.label_kind,
            _ => self.options.image_kind(self.use_2d),
        }
    }

    /// Create (or refresh) the representation of an assigned layer and
    /// attach new ones to `view`.
    pub fn assign(
        &mut self,
        backend: &mut impl RenderBackend,
        view: &mut dyn Proxy,
        name: &str,
        layer_type: LayerType,
        context: &ImageActorContext,
    ) -> Result<()> {
        if !self.representations.contains_key(name) {
            let kind = self.kind_for(layer_type).to_owned();
            let representation = backend.create_proxy(
                ProxyCategory::Representations,
                &kind,
                ProxyOptions::named(name),
            )?;
            view.add_representation(representation.id())?;
            tracing::debug!(layer = name, %kind, id = representation.id(), "representation created");
            self.representations.insert(name.to_owned(), representation);
        }
        let interpolation = self.interpolation;
        let Some(representation) = self.representations.get_mut(name) else {
            return Err(MachineError::UnknownLayer(name.to_owned()));
        };
        representation.set_property("colorMaps", json!(context.color_maps))?;
        representation.set_property(
            "piecewiseFunctionGaussians",
            json!(context.piecewise_function_gaussians),
        )?;
        representation.set_property("componentVisibilities", json!(context.component_visibilities))?;
        representation.set_property("independentComponents", json!(context.independent_components))?;
        representation.set_property("interpolation", json!(interpolation))?;
        Ok(())
    }

    pub fn set_visibility(&mut self, name: &str, visible: bool) -> Result<()> {
        match self.representations.get_mut(name) {
            Some(representation) => {
                representation.set_property("visibility", json!(visible))?;
            }
            None => tracing::debug!(layer = name, "no representation, visibility not applied"),
        }
        Ok(())
    }

    pub fn set_interpolation(&mut self, enabled: bool) -> Result<()> {
        self.interpolation = enabled;
        for representation in self.representations.values_mut() {
            representation.set_property("interpolation", json!(enabled))?;
        }
        Ok(())
    }
}
