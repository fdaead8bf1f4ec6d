//! Error types for trust analysis.

use thiserror::Error;

/// Errors that can occur during trust analysis.
#[derive(Error, Debug)]
pub enum TrustError {
    /// A claim failed model validation.
    #[error("model error: {0}")]
    Model(#[from] vouch_model::ModelError),

    /// The storage collaborator failed to answer a query.
    #[error("store error: {0}")]
    Store(String),
}

/// Result type for trust operations.
pub type Result<T> = std::result::Result<T, TrustError>;
