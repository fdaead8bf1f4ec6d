//! # vouch-model
//!
//! Claim data model for the Vouch protocol.
//!
//! This crate provides:
//! - **Claim**: the three signable record kinds (Attestation, Dispute, Revocation)
//! - **PublicKey**: canonical `ed25519:<hex>` identity keys
//! - **Evidence**: supporting material attached to a claim
//! - **Taxonomy**: the bundled skill taxonomy used to validate skill claims
//!
//! ## Validation
//!
//! Claims are validated at construction time. A structurally invalid claim
//! (warning without a category, expiry before issuance, unknown skill) is
//! rejected before it can be signed or stored. Once signed, a claim is
//! append-only: only the `signature` field is ever set after the fact.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod error;
pub mod evidence;
pub mod identity;
pub mod taxonomy;
pub mod timestamp;

pub use claim::{
    Attestation, AttestationBuilder, AttestationKind, Claim, Dispute, Proficiency, Revocation,
    Skill, WarningCategory, PROTOCOL_VERSION,
};
pub use error::{ModelError, Result};
pub use evidence::Evidence;
pub use identity::{Attestor, AttestorType, Identity, PublicKey, Subject};
