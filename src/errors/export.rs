//! Export error types

use thiserror::Error;

/// Export operation errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// Template rendering failed
    #[error("Template rendering failed: {0}")]
    Template(String),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Output could not be written
    #[error("Failed to write {path}: {reason}")]
    Write {
        /// Output file
        path: String,
        /// Underlying failure
        reason: String,
    },
}

impl From<handlebars::RenderError> for ExportError {
    fn from(err: handlebars::RenderError) -> Self {
        ExportError::Template(err.to_string())
    }
}
