use std::path::PathBuf;

use thiserror::Error;

/// Persistence failures of the counter store.
///
/// These never leave the component boundary through `load`/`save`; only the
/// `try_*` variants surface them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read death counts from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed death count file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid player id {key:?} in {path}")]
    InvalidPlayerId { path: PathBuf, key: String },

    #[error("Player id {key:?} appears more than once in {path}")]
    DuplicatePlayerId { path: PathBuf, key: String },

    #[error("Failed to serialize death counts: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Failed to write death counts to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
