//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur while loading a point cloud
#[derive(Error, Debug)]
pub enum IoError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("No valid points in {path}")]
    NoValidPoints { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IoError> for cloudview_core::Error {
    fn from(e: IoError) -> Self {
        match e {
            IoError::Io(inner) => cloudview_core::Error::Io(inner),
            other => cloudview_core::Error::InvalidData(other.to_string()),
        }
    }
}
