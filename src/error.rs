use std::path::PathBuf;

use thiserror::Error;

/// Failures of the surrounding I/O. Building the graph itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid snapshot document: {0}")]
    Json(#[from] serde_json::Error),
}
