use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid color {input:?}: expected six hex digits (rrggbb)")]
    InvalidHexColor { input: String },

    #[error("dataset {dataset:?} has scalar arrays but no active point or cell scalars")]
    NoActiveScalars { dataset: String },

    #[error("dataset index {index} out of range ({len} datasets)")]
    DatasetIndex { index: usize, len: usize },
}
