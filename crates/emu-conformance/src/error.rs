use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a vector file.
#[derive(Debug, Error)]
pub enum VectorError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown bus action {0:?}")]
    Action(String),
}
