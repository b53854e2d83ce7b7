// ABOUTME: Application-wide error types for skopeo-tasks.
// ABOUTME: Covers configuration loading and module argument files.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read module arguments from {}: {source}", path.display())]
    ArgsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("module arguments must be a JSON object")]
    ArgsNotAnObject,
}

pub type Result<T> = std::result::Result<T, Error>;
