//! Ed25519 keypairs and encrypted-at-rest seed storage.
//!
//! Seeds at rest are encrypted with a passphrase-derived key: argon2id
//! for derivation, XChaCha20-Poly1305 for the seed itself. The blob
//! layout is `salt (16) || nonce (24) || ciphertext (48)`.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use ed25519_dalek::{Signature, Signer, SigningKey};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use vouch_model::PublicKey;

use crate::error::{CryptoError, Result};

/// Length of the argon2id salt.
pub const SALT_LEN: usize = 16;

/// Length of the XChaCha20-Poly1305 nonce.
pub const NONCE_LEN: usize = 24;

/// Length of an Ed25519 seed.
pub const SEED_LEN: usize = 32;

/// Length of the ciphertext: seed plus the 16-byte Poly1305 tag.
const CIPHERTEXT_LEN: usize = SEED_LEN + 16;

/// An Ed25519 keypair used to sign claims.
#[derive(Clone)]
pub struct Keypair {
    inner: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = OsRng;
        Self {
            inner: SigningKey::generate(&mut rng),
        }
    }

    /// Reconstruct a keypair from a 32-byte seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> Self {
        Self {
            inner: SigningKey::from_bytes(seed),
        }
    }

    /// The raw seed bytes. Handle with care.
    #[must_use]
    pub fn to_seed(&self) -> [u8; SEED_LEN] {
        self.inner.to_bytes()
    }

    /// The canonical public key for this keypair.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_bytes(self.inner.verifying_key().to_bytes())
    }

    /// Sign a payload.
    pub(crate) fn sign_payload(&self, payload: &[u8]) -> Signature {
        self.inner.sign(payload)
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

fn derive_key(passphrase: &str, salt: &[u8]) -> Result<[u8; 32]> {
    let mut key = [0u8; 32];
    argon2::Argon2::default()
        .hash_password_into(passphrase.as_bytes(), salt, &mut key)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(key)
}

/// Encrypt a keypair's seed under a passphrase.
///
/// # Errors
///
/// Returns `CryptoError::KeyDerivation` if argon2id fails.
pub fn encrypt_seed(keypair: &Keypair, passphrase: &str) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let mut key = derive_key(passphrase, &salt)?;
    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key));
    let mut seed = keypair.to_seed();
    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce), seed.as_ref())
        .map_err(|_| CryptoError::KeyDerivation("seed encryption failed".to_string()));
    seed.zeroize();
    key.zeroize();
    let ciphertext = ciphertext?;

    let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt a seed blob back into a keypair.
///
/// # Errors
///
/// Returns `CryptoError::MalformedSeedBlob` if the blob layout is wrong and
/// `CryptoError::WrongPassphrase` if authentication fails.
pub fn decrypt_seed(blob: &[u8], passphrase: &str) -> Result<Keypair> {
    if blob.len() != SALT_LEN + NONCE_LEN + CIPHERTEXT_LEN {
        return Err(CryptoError::MalformedSeedBlob {
            reason: format!(
                "expected {} bytes, got {}",
                SALT_LEN + NONCE_LEN + CIPHERTEXT_LEN,
                blob.len()
            ),
        });
    }
    let (salt, rest) = blob.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

    let mut key = derive_key(passphrase, salt)?;
    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key));
    let plaintext = cipher
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::WrongPassphrase);
    key.zeroize();
    let mut plaintext = plaintext?;

    let mut seed = [0u8; SEED_LEN];
    seed.copy_from_slice(&plaintext);
    plaintext.zeroize();
    let keypair = Keypair::from_seed(&seed);
    seed.zeroize();
    Ok(keypair)
}
