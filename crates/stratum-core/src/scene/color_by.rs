//! Color-by selection for geometries and point sets.
//!
//! A dataset can be colored by any of its point or cell scalar arrays. The
//! default choice is the active point scalars, then the active cell scalars.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// Where a data array is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataLocation {
    #[serde(rename = "pointData")]
    Point,
    #[serde(rename = "cellData")]
    Cell,
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point => f.write_str("pointData"),
            Self::Cell => f.write_str("cellData"),
        }
    }
}

/// A scalar array available on a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataArray {
    pub name: String,
    pub location: DataLocation,
    pub components: usize,
    /// Value range over all components.
    pub range: [f64; 2],
}

/// The part of a geometry or point set the viewer needs for coloring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    pub name: String,
    #[serde(default)]
    pub arrays: Vec<DataArray>,
    #[serde(default)]
    pub active_point_scalars: Option<String>,
    #[serde(default)]
    pub active_cell_scalars: Option<String>,
}

impl DatasetSummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn array(&self, location: DataLocation, name: &str) -> Option<&DataArray> {
        self.arrays
            .iter()
            .find(|array| array.location == location && array.name == name)
    }
}

/// One entry of the color-by menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorByOption {
    pub label: String,
    /// `pointData:<name>` or `cellData:<name>`.
    pub value: String,
}

impl ColorByOption {
    fn for_array(array: &DataArray) -> Self {
        Self {
            label: array.name.clone(),
            value: format!("{}:{}", array.location, array.name),
        }
    }
}

/// Derived color-by state of one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorBy {
    pub options: Vec<ColorByOption>,
    pub default: Option<ColorByOption>,
    /// Range of the default array, used to seed the color transfer function.
    pub range: Option<[f64; 2]>,
}

impl ColorBy {
    /// Compute options and default for `dataset`.
    ///
    /// A dataset with scalar arrays must declare active point or cell
    /// scalars.
    pub fn compute(dataset: &DatasetSummary) -> Result<Self> {
        if dataset.arrays.is_empty() {
            return Ok(Self::default());
        }

        // Point arrays first, then cell arrays.
        let options = [DataLocation::Point, DataLocation::Cell]
            .into_iter()
            .flat_map(move |location| {
                dataset
                    .arrays
                    .iter()
                    .filter(move |array| array.location == location)
            })
            .map(ColorByOption::for_array)
            .collect();

        let active = dataset
            .active_point_scalars
            .as_deref()
            .and_then(|name| dataset.array(DataLocation::Point, name))
            .or_else(|| {
                dataset
                    .active_cell_scalars
                    .as_deref()
                    .and_then(|name| dataset.array(DataLocation::Cell, name))
            })
            .ok_or_else(|| CoreError::NoActiveScalars {
                dataset: dataset.name.clone(),
            })?;

        Ok(Self {
            options,
            default: Some(ColorByOption::for_array(active)),
            range: Some(active.range),
        })
    }
}
