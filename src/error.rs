//! Driver errors.

use std::path::PathBuf;

use island::content::ContentError;

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid scene: {0}")]
    Content(#[from] ContentError),
    #[error("script event {index}: {message}")]
    Script { index: usize, message: String },
    #[error("simulation did not settle within {frames} frames")]
    NotSettled { frames: u64 },
}
