//! Parametric lobes of the opacity transfer function.

use serde::{Deserialize, Serialize};

/// One gaussian lobe of a piecewise opacity function.
///
/// `position` and `width` are normalized over the component's scalar range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PiecewiseGaussian {
    pub position: f64,
    pub height: f64,
    pub width: f64,
    pub x_bias: f64,
    pub y_bias: f64,
}

impl PiecewiseGaussian {
    /// Default lobe for slice rendering. The steep `y_bias` keeps the lookup
    /// table opaque across the whole range.
    pub const SLICE: Self = Self {
        position: 0.5,
        height: 1.0,
        width: 0.5,
        x_bias: 0.0,
        y_bias: 3.0,
    };

    /// Default lobe for volume rendering.
    pub const VOLUME: Self = Self {
        position: 0.5,
        height: 1.0,
        width: 0.5,
        x_bias: 0.51,
        y_bias: 0.4,
    };

    pub const fn default_for(use_2d: bool) -> Self {
        if use_2d { Self::SLICE } else { Self::VOLUME }
    }
}
