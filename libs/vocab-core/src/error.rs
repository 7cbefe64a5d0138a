//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using DatasetError.
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Errors that can occur while reading the vocabulary dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("dataset is not a JSON array")]
    NotArray,
}

/// Errors reported by a key-value store backend.
///
/// Callers inside this crate never propagate these; see
/// [`ProgressStore`](crate::store::ProgressStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Reasons a saved progress snapshot is rejected on restore.
#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("snapshot version {found:?} does not match {expected}")]
    VersionMismatch { found: Option<u64>, expected: u64 },

    #[error("snapshot has no presentation order")]
    MissingOrder,

    #[error("no order entries fall inside a dataset of {dataset_size}")]
    StaleOrder { dataset_size: usize },
}
