//! Identity keys and the parties that appear on claims.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::timestamp;

/// Prefix for canonical public key strings.
pub const PUBKEY_PREFIX: &str = "ed25519:";

/// Length of the hex portion of a canonical public key (32 bytes).
pub const PUBKEY_HEX_LEN: usize = 64;

/// A 32-byte Ed25519 public key.
///
/// The canonical representation is `ed25519:` followed by 64 lowercase hex
/// characters. Two identities are equal iff their canonical strings are
/// equal, which for this type reduces to byte equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    /// Parse a canonical `ed25519:<hex>` string.
    ///
    /// Uppercase hex is accepted on input and normalized to the lowercase
    /// canonical form.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidPubkey` when the prefix, length, or hex
    /// encoding is wrong.
    pub fn parse(s: &str) -> Result<Self> {
        let hex_part = s
            .strip_prefix(PUBKEY_PREFIX)
            .ok_or_else(|| ModelError::InvalidPubkey {
                reason: format!("must start with {PUBKEY_PREFIX:?}"),
            })?;
        if hex_part.len() != PUBKEY_HEX_LEN {
            return Err(ModelError::InvalidPubkey {
                reason: format!(
                    "hex portion must be {PUBKEY_HEX_LEN} characters, got {}",
                    hex_part.len()
                ),
            });
        }
        let bytes = hex::decode(hex_part).map_err(|_| ModelError::InvalidPubkey {
            reason: "hex portion must be valid hexadecimal".to_string(),
        })?;
        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        Ok(Self(key))
    }

    /// Create a key from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw key bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Get the hex portion without the `ed25519:` prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PUBKEY_PREFIX}{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PublicKey({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl FromStr for PublicKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PublicKey {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.to_string()
    }
}

/// Declared type of an attesting party.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestorType {
    /// An autonomous software agent.
    Agent,
    /// A human operator.
    Human,
}

impl fmt::Display for AttestorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttestorType::Agent => write!(f, "agent"),
            AttestorType::Human => write!(f, "human"),
        }
    }
}

/// The party a claim is about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Canonical public key.
    pub pubkey: PublicKey,
    /// Display name. Not used in scoring.
    #[serde(default)]
    pub name: String,
}

impl Subject {
    /// Create a subject with an empty display name.
    #[must_use]
    pub fn new(pubkey: PublicKey) -> Self {
        Self {
            pubkey,
            name: String::new(),
        }
    }

    /// Create a subject with a display name.
    #[must_use]
    pub fn named(pubkey: PublicKey, name: impl Into<String>) -> Self {
        Self {
            pubkey,
            name: name.into(),
        }
    }
}

/// The party issuing an attestation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestor {
    /// Canonical public key.
    pub pubkey: PublicKey,
    /// Display name. Not used in scoring.
    #[serde(default)]
    pub name: String,
    /// Declared party type.
    #[serde(rename = "type")]
    pub kind: AttestorType,
}

impl Attestor {
    /// Create an attestor with an empty display name.
    #[must_use]
    pub fn new(pubkey: PublicKey, kind: AttestorType) -> Self {
        Self {
            pubkey,
            name: String::new(),
            kind,
        }
    }

    /// Create an attestor with a display name.
    #[must_use]
    pub fn named(pubkey: PublicKey, name: impl Into<String>, kind: AttestorType) -> Self {
        Self {
            pubkey,
            name: name.into(),
            kind,
        }
    }
}

/// A locally known identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Identity {
    /// Canonical public key.
    pub pubkey: PublicKey,
    /// Display name.
    pub name: String,
    /// Declared party type.
    #[serde(rename = "type")]
    pub kind: AttestorType,
    /// When this identity was created.
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Create an identity record stamped with the current time.
    #[must_use]
    pub fn new(pubkey: PublicKey, name: impl Into<String>, kind: AttestorType) -> Self {
        Self {
            pubkey,
            name: name.into(),
            kind,
            created_at: Utc::now(),
        }
    }
}
