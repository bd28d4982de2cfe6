//! Per-kind dataset stores backing the geometry and point set panels.

use serde::{Deserialize, Serialize};

use super::color_by::{ColorBy, DatasetSummary};
use crate::error::{CoreError, Result};

/// Which panel a store backs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DatasetKind {
    Image,
    Geometry,
    PointSet,
}

/// Display parameters of one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderParams {
    pub color: [f32; 3],
    pub opacity: f32,
    /// Point size or line width, depending on the representation.
    pub size: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            size: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    summary: DatasetSummary,
    params: RenderParams,
    /// Cleared whenever `summary` is written.
    color_by: Option<ColorBy>,
}

/// Datasets of one kind with their selection and derived color-by state.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    kind: DatasetKind,
    selected: usize,
    entries: Vec<Entry>,
}

impl DatasetStore {
    pub fn new(kind: DatasetKind) -> Self {
        Self {
            kind,
            selected: 0,
            entries: Vec::new(),
        }
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a dataset and return its index.
    pub fn push(&mut self, summary: DatasetSummary) -> usize {
        self.entries.push(Entry {
            summary,
            params: RenderParams::default(),
            color_by: None,
        });
        self.entries.len() - 1
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.summary.name.as_str())
            .collect()
    }

    pub fn selected(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.selected)
    }

    pub fn select(&mut self, index: usize) -> Result<()> {
        self.check(index)?;
        self.selected = index;
        Ok(())
    }

    pub fn params(&self, index: usize) -> Result<&RenderParams> {
        self.check(index)?;
        Ok(&self.entries[index].params)
    }

    pub fn params_mut(&mut self, index: usize) -> Result<&mut RenderParams> {
        self.check(index)?;
        Ok(&mut self.entries[index].params)
    }

    /// Replace a dataset's arrays; invalidates its color-by state.
    pub fn set_summary(&mut self, index: usize, summary: DatasetSummary) -> Result<()> {
        self.check(index)?;
        let entry = &mut self.entries[index];
        entry.summary = summary;
        entry.color_by = None;
        Ok(())
    }

    /// Color-by state of one dataset, computed on first access after a write.
    pub fn color_by(&mut self, index: usize) -> Result<&ColorBy> {
        self.check(index)?;
        let entry = &mut self.entries[index];
        let color_by = match entry.color_by.take() {
            Some(color_by) => color_by,
            None => {
                tracing::trace!(dataset = %entry.summary.name, "recomputing color-by");
                ColorBy::compute(&entry.summary)?
            }
        };
        Ok(entry.color_by.insert(color_by))
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(CoreError::DatasetIndex {
                index,
                len: self.entries.len(),
            })
        }
    }
}

/// One store per dataset kind.
#[derive(Debug, Clone)]
pub struct SceneStores {
    pub images: DatasetStore,
    pub geometries: DatasetStore,
    pub point_sets: DatasetStore,
}

impl Default for SceneStores {
    fn default() -> Self {
        Self {
            images: DatasetStore::new(DatasetKind::Image),
            geometries: DatasetStore::new(DatasetKind::Geometry),
            point_sets: DatasetStore::new(DatasetKind::PointSet),
        }
    }
}

impl SceneStores {
    pub fn store_mut(&mut self, kind: DatasetKind) -> &mut DatasetStore {
        match kind {
            DatasetKind::Image => &mut self.images,
            DatasetKind::Geometry => &mut self.geometries,
            DatasetKind::PointSet => &mut self.point_sets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::color_by::{DataArray, DataLocation};

    fn mesh(name: &str, active: &str, range: [f64; 2]) -> DatasetSummary {
        DatasetSummary {
            name: name.into(),
            arrays: vec![DataArray {
                name: active.into(),
                location: DataLocation::Point,
                components: 1,
                range,
            }],
            active_point_scalars: Some(active.into()),
            active_cell_scalars: None,
        }
    }

    #[test]
    fn empty_store_has_no_selection() {
        let store = DatasetStore::new(DatasetKind::Geometry);
        assert_eq!(store.selected(), None);
        assert!(store.names().is_empty());
    }

    #[test]
    fn select_rejects_out_of_range_index() {
        let mut store = DatasetStore::new(DatasetKind::PointSet);
        store.push(DatasetSummary::new("cloud"));
        assert!(store.select(0).is_ok());
        assert!(matches!(
            store.select(3),
            Err(CoreError::DatasetIndex { index: 3, len: 1 })
        ));
    }

    #[test]
    fn color_by_is_recomputed_after_summary_write() {
        let mut stores = SceneStores::default();
        let geometries = stores.store_mut(DatasetKind::Geometry);
        let index = geometries.push(mesh("mesh", "height", [0.0, 1.0]));
        assert_eq!(geometries.color_by(index).unwrap().range, Some([0.0, 1.0]));

        geometries
            .set_summary(index, mesh("mesh", "height", [0.0, 5.0]))
            .unwrap();
        assert_eq!(geometries.color_by(index).unwrap().range, Some([0.0, 5.0]));
    }

    #[test]
    fn render_params_are_editable_per_dataset() {
        let mut store = DatasetStore::new(DatasetKind::Geometry);
        store.push(DatasetSummary::new("a"));
        store.push(DatasetSummary::new("b"));
        store.params_mut(1).unwrap().opacity = 0.25;
        assert_eq!(store.params(0).unwrap().opacity, 1.0);
        assert_eq!(store.params(1).unwrap().opacity, 0.25);
        assert_eq!(store.names(), ["a", "b"]);
    }
}
