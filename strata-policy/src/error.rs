//! Error types for permission gates

use thiserror::Error;

/// Permission gate errors
#[derive(Error, Debug)]
pub enum PolicyError {
    /// The authorization backend could not answer a check
    #[error("Permission check failed for {node_ref}: {reason}")]
    CheckFailed {
        /// Public reference of the candidate being checked
        node_ref: String,
        /// Backend-supplied failure description
        reason: String,
    },
}

/// Result type for gate operations
pub type Result<T> = std::result::Result<T, PolicyError>;
