//! Default visualization parameters for newly assigned images.
//!
//! The policy only fills gaps: any component that already has a color map or
//! a transfer function keeps it, and `independent_components` is decided at
//! most once per layer.

use crate::context::{ImageActorContext, PiecewiseGaussian};
use crate::image::{ComponentType, ImageDescriptor};

pub const VIRIDIS: &str = "Viridis (matplotlib)";
pub const GRAYSCALE: &str = "Grayscale";
pub const BLACK_MAGENTA: &str = "BkMa";
pub const BLACK_CYAN: &str = "BkCy";
pub const BLACK_RED: &str = "BkRd";
pub const BLACK_GREEN: &str = "BkGn";
pub const BLACK_BLUE: &str = "BkBu";

/// Viewer state the policy depends on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultPolicy {
    /// Slice (2D) rather than volume rendering.
    pub use_2d: bool,
    /// A label image is fused with the image being assigned.
    pub label_image_fused: bool,
}

impl DefaultPolicy {
    /// 8-bit RGB/RGBA in 2D is displayed as packed color, not per channel.
    fn is_packed_color(self, image: &ImageDescriptor) -> bool {
        self.use_2d
            && image.component_type() == ComponentType::UInt8
            && matches!(image.components(), 3 | 4)
    }

    fn independent_components(self, image: &ImageDescriptor) -> Option<bool> {
        if self.is_packed_color(image) {
            Some(false)
        } else if image.components() == 1 && self.label_image_fused {
            None
        } else {
            Some(true)
        }
    }

    fn color_map(self, image: &ImageDescriptor, component: usize) -> &'static str {
        let components = image.components();
        if self.is_packed_color(image) || (components == 1 && self.label_image_fused) {
            return GRAYSCALE;
        }
        match (components, component) {
            (2, 0) => BLACK_MAGENTA,
            (2, 1) => BLACK_CYAN,
            (3, 0) => BLACK_RED,
            (3, 1) => BLACK_GREEN,
            (3, 2) => BLACK_BLUE,
            _ => VIRIDIS,
        }
    }
}

/// Extend `values` with `fill` up to `len`. Never shrinks.
pub fn pad_to<T: Clone>(values: &mut Vec<T>, len: usize, fill: T) {
    if values.len() < len {
        values.resize(len, fill);
    }
}

/// Assign `image` to `context` and fill in missing visualization defaults.
pub fn assign_image_defaults(
    context: &mut ImageActorContext,
    image: &ImageDescriptor,
    policy: DefaultPolicy,
) {
    let components = image.components();
    pad_to(&mut context.component_visibilities, components, true);

    if context.independent_components.is_none() {
        context.independent_components = policy.independent_components(image);
    }

    for component in 0..components {
        context
            .color_maps
            .entry(component)
            .or_insert_with(|| policy.color_map(image, component).to_owned());
        context
            .piecewise_function_gaussians
            .entry(component)
            .or_insert_with(|| vec![PiecewiseGaussian::default_for(policy.use_2d)]);
    }

    tracing::debug!(
        image = %image.name,
        components,
        component_type = %image.component_type(),
        independent = ?context.independent_components,
        "assigned image defaults"
    );
    context.image = Some(image.clone());
}
