//! Error types for the core data model

use thiserror::Error;

/// Core data model errors
#[derive(Error, Debug)]
pub enum CoreError {
    /// Skip count was negative in a raw (wire/JSON) window
    #[error("Invalid skip count: {0} (expected >= 0)")]
    InvalidSkipCount(i64),

    /// Max items was below -1 in a raw (wire/JSON) window
    #[error("Invalid max items: {0} (expected -1 for unlimited, or >= 0)")]
    InvalidMaxItems(i64),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
