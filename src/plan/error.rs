use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Failed to read OpenClaw config {}: {message}", path.display())]
    ConfigRead { path: PathBuf, message: String },

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render {artifact}: {message}")]
    Render {
        artifact: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, PlanError>;
