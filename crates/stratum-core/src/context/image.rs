use serde::Serialize;
use std::collections::BTreeMap;

use super::PiecewiseGaussian;
use crate::image::ImageDescriptor;

/// Visualization state of one image layer.
///
/// Per-component entries are created once by the default policy and then
/// only changed by explicit user configuration. `component_visibilities` only
/// ever grows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageActorContext {
    /// Most recently assigned descriptor for this layer.
    pub image: Option<ImageDescriptor>,
    /// Component index -> color map name.
    pub color_maps: BTreeMap<usize, String>,
    /// Component index -> opacity transfer function lobes.
    pub piecewise_function_gaussians: BTreeMap<usize, Vec<PiecewiseGaussian>>,
    /// One flag per component.
    pub component_visibilities: Vec<bool>,
    /// `None` until the default policy (or the user) decides.
    pub independent_components: Option<bool>,
}

impl ImageActorContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of components of the assigned image, 0 before assignment.
    pub fn components(&self) -> usize {
        self.image.as_ref().map_or(0, ImageDescriptor::components)
    }

    pub fn color_map(&self, component: usize) -> Option<&str> {
        self.color_maps.get(&component).map(String::as_str)
    }

    /// Replace a component's color map (user configuration).
    pub fn set_color_map(&mut self, component: usize, name: impl Into<String>) {
        self.color_maps.insert(component, name.into());
    }

    /// Toggle a component; out of range indices are ignored.
    pub fn toggle_component_visibility(&mut self, component: usize) -> Option<bool> {
        let visible = self.component_visibilities.get_mut(component)?;
        *visible = !*visible;
        Some(*visible)
    }
}
