//! Attach and verify detached claim signatures.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use vouch_model::Claim;

use crate::canonical;
use crate::error::{CryptoError, Result};
use crate::keys::Keypair;

/// Prefix for canonical signature strings.
pub const SIGNATURE_PREFIX: &str = "ed25519:";

/// Length of the hex portion of a canonical signature (64 bytes).
pub const SIGNATURE_HEX_LEN: usize = 128;

/// Sign a claim, returning a copy with the signature attached.
///
/// The signing payload is the claim's canonical bytes with the signature
/// field excluded, so re-signing an already-signed claim produces the same
/// payload (and a signature over the same bytes).
///
/// # Errors
///
/// Returns `CryptoError::KeyMismatch` if the keypair's public key does not
/// equal the claim's declared issuer (attestor, disputor, or revoker).
pub fn sign_claim(claim: &Claim, keypair: &Keypair) -> Result<Claim> {
    let key = keypair.public_key();
    let issuer = *claim.issuer();
    if key != issuer {
        return Err(CryptoError::KeyMismatch {
            key: key.to_string(),
            issuer: issuer.to_string(),
        });
    }
    let payload = canonical::signing_bytes(claim)?;
    let signature = keypair.sign_payload(&payload);
    Ok(claim.with_signature(format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(signature.to_bytes())
    )))
}

/// Verify a claim's signature against its declared issuer.
///
/// Any mutation of the claim's canonical bytes after signing causes
/// verification to fail — this is the tamper-detection guarantee the rest
/// of the system relies on.
///
/// # Errors
///
/// - `CryptoError::MissingSignature` if the claim is unsigned
/// - `CryptoError::MalformedSignature` if the prefix, length, or hex
///   encoding is wrong
/// - `CryptoError::InvalidKey` if the issuer key is not a valid curve point
/// - `CryptoError::SignatureMismatch` if cryptographic verification fails
pub fn verify_claim(claim: &Claim) -> Result<()> {
    let sig_str = claim.signature().ok_or(CryptoError::MissingSignature)?;
    let hex_part =
        sig_str
            .strip_prefix(SIGNATURE_PREFIX)
            .ok_or_else(|| CryptoError::MalformedSignature {
                reason: format!("must start with {SIGNATURE_PREFIX:?}"),
            })?;
    if hex_part.len() != SIGNATURE_HEX_LEN {
        return Err(CryptoError::MalformedSignature {
            reason: format!(
                "hex portion must be {SIGNATURE_HEX_LEN} characters, got {}",
                hex_part.len()
            ),
        });
    }
    let sig_bytes = hex::decode(hex_part).map_err(|_| CryptoError::MalformedSignature {
        reason: "hex portion must be valid hexadecimal".to_string(),
    })?;
    let sig_array: [u8; 64] = sig_bytes
        .try_into()
        .map_err(|_| CryptoError::MalformedSignature {
            reason: "signature must be 64 bytes".to_string(),
        })?;
    let signature = Signature::from_bytes(&sig_array);

    let verifying_key =
        VerifyingKey::from_bytes(&claim.issuer().to_bytes()).map_err(|e| CryptoError::InvalidKey {
            reason: e.to_string(),
        })?;

    let payload = canonical::signing_bytes(claim)?;
    verifying_key
        .verify(&payload, &signature)
        .map_err(|_| CryptoError::SignatureMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    use vouch_model::{
        Attestation, AttestationKind, Attestor, AttestorType, Dispute, Evidence, Proficiency,
        Revocation, Skill, Subject,
    };

    fn attestation_claim(attestor_key: &Keypair) -> Claim {
        let subject = Subject::new(vouch_model::PublicKey::from_bytes([9u8; 32]));
        let attestor = Attestor::new(attestor_key.public_key(), AttestorType::Agent);
        let att = Attestation::builder(AttestationKind::Skill, subject, attestor)
            .skill(Skill::new("research", "fact_checking", Proficiency::Expert).unwrap())
            .evidence(Evidence::from_context("checked twelve citations"))
            .build()
            .unwrap();
        Claim::from(att)
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let keypair = Keypair::generate();
        let claim = attestation_claim(&keypair);
        let signed = sign_claim(&claim, &keypair).unwrap();
        assert!(signed.signature().unwrap().starts_with(SIGNATURE_PREFIX));
        verify_claim(&signed).unwrap();
    }

    #[test]
    fn test_sign_rejects_wrong_key() {
        let issuer_key = Keypair::generate();
        let other_key = Keypair::generate();
        let claim = attestation_claim(&issuer_key);
        let err = sign_claim(&claim, &other_key).unwrap_err();
        assert!(matches!(err, CryptoError::KeyMismatch { .. }));
    }

    #[test]
    fn test_verify_unsigned_fails() {
        let keypair = Keypair::generate();
        let claim = attestation_claim(&keypair);
        let err = verify_claim(&claim).unwrap_err();
        assert!(matches!(err, CryptoError::MissingSignature));
    }

    #[test]
    fn test_verify_malformed_signature_fails() {
        let keypair = Keypair::generate();
        let claim = attestation_claim(&keypair);

        let bad_prefix = claim.with_signature(format!("rsa:{}", "ab".repeat(64)));
        assert!(matches!(
            verify_claim(&bad_prefix).unwrap_err(),
            CryptoError::MalformedSignature { .. }
        ));

        let bad_len = claim.with_signature("ed25519:abcd".to_string());
        assert!(matches!(
            verify_claim(&bad_len).unwrap_err(),
            CryptoError::MalformedSignature { .. }
        ));

        let bad_hex = claim.with_signature(format!("ed25519:{}", "zz".repeat(64)));
        assert!(matches!(
            verify_claim(&bad_hex).unwrap_err(),
            CryptoError::MalformedSignature { .. }
        ));
    }

    #[test]
    fn test_tampered_claim_fails_verification() {
        let keypair = Keypair::generate();
        let claim = attestation_claim(&keypair);
        let signed = sign_claim(&claim, &keypair).unwrap();

        let mut tampered = match signed.clone() {
            Claim::Attestation(a) => a,
            _ => unreachable!(),
        };
        tampered.evidence.context.push_str(" and more");
        let err = verify_claim(&Claim::from(tampered)).unwrap_err();
        assert!(matches!(err, CryptoError::SignatureMismatch));
    }

    #[test]
    fn test_proficiency_bump_fails_verification() {
        let keypair = Keypair::generate();
        let claim = attestation_claim(&keypair);
        let signed = sign_claim(&claim, &keypair).unwrap();

        let mut tampered = match signed {
            Claim::Attestation(a) => a,
            _ => unreachable!(),
        };
        if let Some(skill) = &mut tampered.skill {
            skill.proficiency = Proficiency::Authority;
        }
        let err = verify_claim(&Claim::from(tampered)).unwrap_err();
        assert!(matches!(err, CryptoError::SignatureMismatch));
    }

    #[test]
    fn test_dispute_and_revocation_sign_verify() {
        let keypair = Keypair::generate();
        let issuer = Subject::new(keypair.public_key());

        let dispute = Claim::from(Dispute::new("w-1", issuer.clone(), "the logs show otherwise"));
        let signed = sign_claim(&dispute, &keypair).unwrap();
        verify_claim(&signed).unwrap();

        let revocation = Claim::from(Revocation::new("a-1", issuer, "superseded"));
        let signed = sign_claim(&revocation, &keypair).unwrap();
        verify_claim(&signed).unwrap();
    }

    #[test]
    fn test_resigning_is_deterministic() {
        // The payload excludes the signature, so signing a signed claim
        // signs the same bytes and yields the same signature.
        let keypair = Keypair::generate();
        let claim = attestation_claim(&keypair);
        let first = sign_claim(&claim, &keypair).unwrap();
        let second = sign_claim(&first, &keypair).unwrap();
        assert_eq!(first.signature(), second.signature());
    }
}
