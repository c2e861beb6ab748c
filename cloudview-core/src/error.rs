//! Error types for cloudview

use thiserror::Error;

/// Main error type for cloudview operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Window error: {0}")]
    Window(String),
}

/// Result type alias for cloudview operations
pub type Result<T> = std::result::Result<T, Error>;
