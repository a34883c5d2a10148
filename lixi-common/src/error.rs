//! Common error types for the lucky-draw engine

use thiserror::Error;

/// Common result type for lucky-draw operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the engine and its front ends
#[derive(Error, Debug)]
pub enum Error {
    /// Outcome set cannot be sampled (empty, or non-positive weight)
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
