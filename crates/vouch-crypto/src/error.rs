//! Error types for canonicalization and signing.

use thiserror::Error;

/// Errors that can occur during signing and verification.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The private key does not belong to the claim's declared issuer.
    #[error("signing key does not match the claim issuer: key is {key}, issuer is {issuer}")]
    KeyMismatch {
        /// Public key derived from the signing key.
        key: String,
        /// Public key declared on the claim.
        issuer: String,
    },

    /// The claim carries no signature.
    #[error("claim has no signature")]
    MissingSignature,

    /// The signature string has the wrong prefix, length, or encoding.
    #[error("malformed signature: {reason}")]
    MalformedSignature {
        /// What is wrong with the signature string.
        reason: String,
    },

    /// Cryptographic verification failed against the issuer's key.
    #[error("signature verification failed")]
    SignatureMismatch,

    /// The issuer's public key is not a valid Ed25519 curve point.
    #[error("invalid public key: {reason}")]
    InvalidKey {
        /// Why the key was rejected.
        reason: String,
    },

    /// Decryption of an encrypted seed failed, most likely a bad passphrase.
    #[error("seed decryption failed (wrong passphrase?)")]
    WrongPassphrase,

    /// An encrypted seed blob has the wrong length or layout.
    #[error("malformed encrypted seed blob: {reason}")]
    MalformedSeedBlob {
        /// What is wrong with the blob.
        reason: String,
    },

    /// Passphrase key derivation failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Claim could not be serialized for canonicalization.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
