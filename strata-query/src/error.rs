//! Error types for page assembly

use thiserror::Error;

/// Query layer errors
#[derive(Error, Debug)]
pub enum QueryError {
    /// Error from strata-core
    #[error("Core error: {0}")]
    Core(#[from] strata_core::CoreError),

    /// Permission gate failure; the page-assembly call aborts
    #[error("Policy error: {0}")]
    Policy(#[from] strata_policy::PolicyError),

    /// Candidate cursor failure
    #[error("Cursor error: {0}")]
    Cursor(String),

    /// Metadata store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid query options
    #[error("Invalid query options: {0}")]
    InvalidOptions(String),

    /// Invalid engine configuration
    #[error("Invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;
