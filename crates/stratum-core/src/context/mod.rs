//! Per-layer context records: layer type and image visualization state.

pub mod gaussian;
pub mod image;
pub mod layer;

pub use gaussian::PiecewiseGaussian;
pub use image::ImageActorContext;
pub use layer::{LayerActorContext, LayerType};
