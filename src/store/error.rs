use std::path::PathBuf;

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by the trajectory store.
///
/// A missing episode is not an error: loads return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The filesystem refused a read, write, rename or mkdir.
    #[error("storage failure at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file exists but does not hold a valid document. Includes episode
    /// files with unknown `entity_type` tags.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    /// Episode files are write-once.
    #[error("trajectory {index} already exists at {}", path.display())]
    AlreadyExists { index: u64, path: PathBuf },
}

impl StoreError {
    /// Adapter for `map_err` on I/O results touching `path`.
    pub(crate) fn storage(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Storage { path, source }
    }
}
