//! Error types for the magnetite-nn library

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum EngineError {
    /// Operand dimensions are incompatible for the attempted operation
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// IO error while reading or writing a model file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A saved model carries a layer tag, loss tag, or parameter payload
    /// this library does not understand
    #[error("unsupported model format: {0}")]
    UnsupportedModelFormat(String),
}
