//! Error types for model validation.

use thiserror::Error;

/// Errors that can occur during claim construction and validation.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Public key string is not a valid `ed25519:<hex>` key.
    #[error("invalid public key: {reason}")]
    InvalidPubkey {
        /// Reason for invalidity.
        reason: String,
    },

    /// Expiry timestamp is not strictly after issuance.
    #[error("expires must be after issued")]
    ExpiresBeforeIssued,

    /// Behavioral warning is missing its category.
    #[error("behavioral_warning requires warning_category")]
    MissingWarningCategory,

    /// Non-warning attestation is missing its skill.
    #[error("{kind} requires a skill field")]
    MissingSkill {
        /// The attestation kind that requires a skill.
        kind: String,
    },

    /// Behavioral warning carries too few evidence artifacts.
    #[error("behavioral_warning requires at least 1 evidence artifact")]
    TooFewArtifacts,

    /// Behavioral warning context is below the minimum length.
    #[error("behavioral_warning requires evidence context >= {required} characters, got {actual}")]
    ContextTooShort {
        /// Minimum required character count.
        required: usize,
        /// Actual character count.
        actual: usize,
    },

    /// Domain is not present in the taxonomy.
    #[error("unknown domain: {0:?}")]
    UnknownDomain(String),

    /// Skill is not present in the taxonomy under the given domain.
    #[error("unknown skill {specific:?} in domain {domain:?}")]
    UnknownSkill {
        /// The domain that was queried.
        domain: String,
        /// The unknown skill identifier.
        specific: String,
    },

    /// Proficiency value outside the 1-5 range.
    #[error("invalid proficiency value: {0} (must be 1-5)")]
    InvalidProficiency(u8),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
