//! Error types for ironlog-core
//!
//! Sparse or missing history is never an error: the engine reports fewer
//! metrics and fewer insights instead. These variants cover the cases where
//! the caller handed over something structurally unusable.

use thiserror::Error;

/// Main error type for the ironlog-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error (history exports)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Structurally invalid input (bad window sizes, unusable options)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Profile name that is neither "strict" nor "aggressive"
    #[error("unknown insight profile: {0}")]
    UnknownProfile(String),
}

/// Result type alias for ironlog-core
pub type Result<T> = std::result::Result<T, Error>;
