//! Stratum Core: domain layer for the viewer.
//!
//! This crate contains the per-layer context records, the default
//! visualization policy applied to newly added images, unique layer naming,
//! and the viewer-level scene state. No channel or rendering backend
//! dependencies.

pub mod context;
pub mod defaults;
pub mod error;
pub mod image;
pub mod naming;
pub mod scene;

// Re-exports for convenience.
pub use context::{ImageActorContext, LayerActorContext, LayerType, PiecewiseGaussian};
pub use defaults::{DefaultPolicy, assign_image_defaults};
pub use error::{CoreError, Result};
pub use image::{ComponentType, ImageDescriptor, ImageType, LabelImageDescriptor};
pub use naming::unique_name;
pub use scene::{ContainerStyle, SceneStyle, UiToggles};
