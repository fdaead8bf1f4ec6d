//! Recursive reputation scoring.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use vouch_model::PublicKey;

use crate::config::TrustConfig;
use crate::decay::compute_decay;
use crate::error::Result;
use crate::evidence::score_evidence;
use crate::rings::{ring_discount, RingInfo};
use crate::store::{AttestationFilter, AttestationStore};

/// Compute an identity's reputation score in [0, 1).
///
/// Weighted sum of incoming non-revoked attestations, where each
/// attestation contributes
/// `(base + (1 - base) * attestor_reputation) * decay * ring_discount *
/// evidence_composite`, and the accumulated sum is squashed through
/// `1 - e^(-sum)`. Attestor reputation recurses with a depth cap and a
/// per-branch visited set, so cycles terminate and an attestor can never
/// inflate a subject through the subject's own score.
///
/// An identity with no incoming attestations scores exactly 0.0.
pub fn reputation(
    store: &dyn AttestationStore,
    pubkey: &PublicKey,
    rings: &[RingInfo],
    reference: Option<DateTime<Utc>>,
    config: &TrustConfig,
) -> Result<f64> {
    let reference = reference.unwrap_or_else(Utc::now);
    reputation_at_depth(store, pubkey, 0, &HashSet::new(), rings, reference, config)
}

fn reputation_at_depth(
    store: &dyn AttestationStore,
    pubkey: &PublicKey,
    depth: usize,
    visited: &HashSet<PublicKey>,
    rings: &[RingInfo],
    reference: DateTime<Utc>,
    config: &TrustConfig,
) -> Result<f64> {
    if depth >= config.max_reputation_depth || visited.contains(pubkey) {
        return Ok(0.0);
    }

    // Cloned, not aliased: sibling branches must not see each other's
    // visits, only the path back to the root.
    let mut visited = visited.clone();
    visited.insert(*pubkey);

    let attestations = store.search_attestations(&AttestationFilter::by_subject(*pubkey))?;
    if attestations.is_empty() {
        return Ok(0.0);
    }

    let mut total = 0.0;
    for attestation in &attestations {
        let attestor_rep = reputation_at_depth(
            store,
            &attestation.attestor.pubkey,
            depth + 1,
            &visited,
            rings,
            reference,
            config,
        )?;
        let attestor_weight = config.base_reputation_weight
            + (1.0 - config.base_reputation_weight) * attestor_rep;

        let decay = compute_decay(attestation.issued, reference, config.half_life_days);
        let discount = ring_discount(
            &attestation.subject.pubkey,
            &attestation.attestor.pubkey,
            rings,
            config,
        );
        let quality = score_evidence(&attestation.evidence, attestation.kind, Some(reference)).composite;

        total += attestor_weight * decay * discount * quality;
    }

    Ok(1.0 - (-total).exp())
}

/// Convert an attestor's reputation into their attestation weight.
///
/// The floor keeps an entirely unattested attestor contributing a small
/// amount, which prevents zero-reputation deadlock in a fresh network.
#[must_use]
pub fn attestor_weight(attestor_reputation: f64, config: &TrustConfig) -> f64 {
    config.base_reputation_weight + (1.0 - config.base_reputation_weight) * attestor_reputation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rings::detect_all_rings;
    use crate::store::MemoryStore;
    use chrono::Duration;
    use vouch_model::{
        Attestation, AttestationKind, Attestor, AttestorType, Evidence, Proficiency, Skill, Subject,
    };

    fn key(fill: u8) -> PublicKey {
        PublicKey::from_bytes([fill; 32])
    }

    fn attest(store: &mut MemoryStore, attestor: u8, subject: u8, days_ago: i64) -> String {
        let issued = Utc::now() - Duration::days(days_ago);
        let att = Attestation::builder(
            AttestationKind::Skill,
            Subject::new(key(subject)),
            Attestor::new(key(attestor), AttestorType::Agent),
        )
        .skill(Skill::new("research", "synthesis", Proficiency::Expert).unwrap())
        .evidence(
            Evidence::from_context("reviewed the survey draft in detail")
                .with_artifact("https://example.com/review/1"),
        )
        .issued(issued)
        .build()
        .unwrap();
        let id = att.id.clone();
        store.insert(att).unwrap();
        id
    }

    fn rep(store: &MemoryStore, subject: u8) -> f64 {
        let config = TrustConfig::default();
        let rings = detect_all_rings(store, &config).unwrap();
        reputation(store, &key(subject), &rings, None, &config).unwrap()
    }

    #[test]
    fn test_no_attestations_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(rep(&store, 1), 0.0);
    }

    #[test]
    fn test_single_attestation_positive_below_one() {
        let mut store = MemoryStore::new();
        attest(&mut store, 1, 2, 1);
        let score = rep(&store, 2);
        assert!(score > 0.0);
        assert!(score < 1.0);
    }

    #[test]
    fn test_revoking_sole_attestation_returns_to_zero() {
        let mut store = MemoryStore::new();
        let id = attest(&mut store, 1, 2, 1);
        assert!(rep(&store, 2) > 0.0);
        store.revoke(&id);
        assert_eq!(rep(&store, 2), 0.0);
    }

    #[test]
    fn test_more_attestors_monotonically_increase_score() {
        let mut store = MemoryStore::new();
        attest(&mut store, 1, 9, 1);
        let one = rep(&store, 9);
        attest(&mut store, 2, 9, 1);
        let two = rep(&store, 9);
        attest(&mut store, 3, 9, 1);
        let three = rep(&store, 9);
        assert!(two > one);
        assert!(three > two);
        assert!(three < 1.0);
    }

    #[test]
    fn test_attested_attestor_contributes_more() {
        // B's attestation of C counts more when B is itself attested.
        let mut unattested = MemoryStore::new();
        attest(&mut unattested, 2, 3, 1);
        let baseline = rep(&unattested, 3);

        let mut attested = MemoryStore::new();
        attest(&mut attested, 2, 3, 1);
        attest(&mut attested, 1, 2, 1);
        let boosted = rep(&attested, 3);

        assert!(boosted > baseline);
    }

    #[test]
    fn test_cycle_terminates_and_stays_bounded() {
        let mut store = MemoryStore::new();
        attest(&mut store, 1, 2, 1);
        attest(&mut store, 2, 1, 1);
        let score = rep(&store, 1);
        assert!(score > 0.0);
        assert!(score < 1.0);
    }

    #[test]
    fn test_old_attestation_counts_less() {
        let mut fresh = MemoryStore::new();
        attest(&mut fresh, 1, 2, 1);
        let fresh_score = rep(&fresh, 2);

        let mut stale = MemoryStore::new();
        attest(&mut stale, 1, 2, 720);
        let stale_score = rep(&stale, 2);

        assert!(stale_score < fresh_score);
        assert!(stale_score > 0.0);
    }

    #[test]
    fn test_mutual_pair_discount_lowers_score() {
        let mut discounted = MemoryStore::new();
        attest(&mut discounted, 1, 2, 1);
        attest(&mut discounted, 2, 1, 1);
        let ringed = rep(&discounted, 2);

        let mut clean = MemoryStore::new();
        attest(&mut clean, 1, 2, 1);
        let unringed = rep(&clean, 2);

        assert!(ringed < unringed);
    }

    #[test]
    fn test_attestor_weight_floor() {
        let config = TrustConfig::default();
        assert!((attestor_weight(0.0, &config) - 0.1).abs() < 1e-12);
        assert!((attestor_weight(1.0, &config) - 1.0).abs() < 1e-12);
        assert!((attestor_weight(0.5, &config) - 0.55).abs() < 1e-12);
    }
}
