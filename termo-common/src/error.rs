//! Common error types for Termo

use thiserror::Error;

/// Common result type for Termo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Termo services
#[derive(Error, Debug)]
pub enum Error {
    /// A required project-level field is absent or blank
    #[error("Missing required field '{field}'")]
    MissingField { field: String },

    /// A critical thermographic field is absent or blank for an object
    #[error("Object {object_index}: missing critical field '{field}'")]
    MissingCriticalField {
        object_index: usize,
        field: &'static str,
    },

    /// A critical field carries text that cannot be read as a number
    #[error("Object {object_index}: invalid numeric value '{value}' for '{field}'")]
    InvalidNumericInput {
        object_index: usize,
        field: &'static str,
        value: String,
    },

    /// An object image is not valid base64 payload
    #[error("Object {object_index}: invalid image payload in '{field}'")]
    InvalidImagePayload {
        object_index: usize,
        field: &'static str,
    },

    /// Object count outside the supported template range
    #[error("Unsupported object count: {0} (supported range is 1..=20)")]
    UnsupportedObjectCount(usize),

    /// Template resolution or lookup error
    #[error("Template error: {0}")]
    Template(String),

    /// Map rendering collaborator failure
    #[error("Map rendering failed: {0}")]
    MapRendering(String),

    /// Document assembly collaborator failure
    #[error("Document assembly failed: {0}")]
    DocumentAssembly(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
