//! # vouch-crypto
//!
//! Canonical serialization and Ed25519 signing for the Vouch protocol.
//!
//! This crate provides:
//! - **Canonical bytes**: deterministic claim serialization, the exact
//!   signing payload shared by every conforming implementation
//! - **Keypair**: Ed25519 key generation and encrypted-at-rest seed storage
//! - **sign/verify**: attach and check detached `ed25519:<hex>` signatures
//!
//! ## Cross-implementation contract
//!
//! The canonical byte encoding is a wire contract: a conforming
//! implementation in any language must produce byte-identical output for
//! the same logical claim, or signatures will fail verification across
//! implementations. See [`canonical`] for the exact rules.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod canonical;
pub mod error;
pub mod keys;
pub mod sign;

#[cfg(test)]
mod proptests;

pub use canonical::{canonical_bytes, document_bytes, signing_bytes};
pub use error::{CryptoError, Result};
pub use keys::{decrypt_seed, encrypt_seed, Keypair};
pub use sign::{sign_claim, verify_claim, SIGNATURE_PREFIX};
