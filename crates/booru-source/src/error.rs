use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    // Model evaluation errors
    #[error("Uncaught exception at line {line}: {message}")]
    Evaluation { message: String, line: usize },

    #[error("Javascript model not found for '{disk_name}' in '{}'", .path.display())]
    MissingDefinition { disk_name: String, path: PathBuf },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Endpoint list errors
    #[error("Could not persist endpoint list {}: {reason}", .path.display())]
    Persistence { path: PathBuf, reason: String },

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SourceError {
    /// Line reported by the runtime, if this is an evaluation failure
    pub fn line(&self) -> Option<usize> {
        match self {
            SourceError::Evaluation { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
