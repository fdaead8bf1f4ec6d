//! Storage collaborator interface and in-memory implementation.
//!
//! The engine reads attestations through [`AttestationStore`] and never
//! writes. A persistent backend implements the same trait; the engine's
//! semantics do not change as long as a consistent snapshot backs each
//! analysis call.

use std::collections::HashSet;

use vouch_model::{Attestation, AttestationKind, PublicKey, Revocation};

use crate::error::Result;

/// Query filter for attestation searches.
///
/// All populated fields must match. Revoked attestations are excluded
/// unless `include_revoked` is set.
#[derive(Clone, Debug, Default)]
pub struct AttestationFilter {
    /// Match the subject's public key.
    pub subject: Option<PublicKey>,
    /// Match the attestor's public key.
    pub attestor: Option<PublicKey>,
    /// Match the skill domain.
    pub domain: Option<String>,
    /// Match the attestation kind.
    pub kind: Option<AttestationKind>,
    /// Include revoked attestations in the results.
    pub include_revoked: bool,
}

impl AttestationFilter {
    /// Filter by subject only.
    #[must_use]
    pub fn by_subject(subject: PublicKey) -> Self {
        Self {
            subject: Some(subject),
            ..Self::default()
        }
    }

    /// Filter by attestor only.
    #[must_use]
    pub fn by_attestor(attestor: PublicKey) -> Self {
        Self {
            attestor: Some(attestor),
            ..Self::default()
        }
    }

    /// Filter by the directed attestor -> subject edge.
    #[must_use]
    pub fn between(attestor: PublicKey, subject: PublicKey) -> Self {
        Self {
            subject: Some(subject),
            attestor: Some(attestor),
            ..Self::default()
        }
    }
}

/// Read-only attestation queries consumed by the engine.
pub trait AttestationStore {
    /// Return all attestations matching the filter.
    fn search_attestations(&self, filter: &AttestationFilter) -> Result<Vec<Attestation>>;

    /// Return every directed (attestor, subject) edge over non-revoked
    /// attestations. One entry per attestation, duplicates included.
    fn attestation_edges(&self) -> Result<Vec<(PublicKey, PublicKey)>>;
}

/// In-memory attestation store.
///
/// Backs the test suite and the CLI. Inserts validate structural
/// invariants, so a structurally invalid claim is never stored.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    attestations: Vec<Attestation>,
    revoked: HashSet<String>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attestation after validating it.
    ///
    /// # Errors
    ///
    /// Returns the model validation error for a structurally invalid claim.
    pub fn insert(&mut self, attestation: Attestation) -> Result<()> {
        attestation.validate()?;
        self.attestations.push(attestation);
        Ok(())
    }

    /// Mark an attestation as revoked. Returns whether the id was known.
    pub fn revoke(&mut self, attestation_id: &str) -> bool {
        let known = self.attestations.iter().any(|a| a.id == attestation_id);
        if known {
            self.revoked.insert(attestation_id.to_string());
        }
        known
    }

    /// Apply a revocation claim.
    pub fn apply_revocation(&mut self, revocation: &Revocation) -> bool {
        self.revoke(&revocation.attestation_id)
    }

    /// Whether the given attestation id has been revoked.
    #[must_use]
    pub fn is_revoked(&self, attestation_id: &str) -> bool {
        self.revoked.contains(attestation_id)
    }

    /// Number of stored attestations, revoked ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attestations.len()
    }

    /// Whether the store holds no attestations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attestations.is_empty()
    }

    fn matches(&self, attestation: &Attestation, filter: &AttestationFilter) -> bool {
        if !filter.include_revoked && self.revoked.contains(&attestation.id) {
            return false;
        }
        if let Some(subject) = &filter.subject {
            if attestation.subject.pubkey != *subject {
                return false;
            }
        }
        if let Some(attestor) = &filter.attestor {
            if attestation.attestor.pubkey != *attestor {
                return false;
            }
        }
        if let Some(domain) = &filter.domain {
            match &attestation.skill {
                Some(skill) if skill.domain == *domain => {}
                _ => return false,
            }
        }
        if let Some(kind) = &filter.kind {
            if attestation.kind != *kind {
                return false;
            }
        }
        true
    }
}

impl AttestationStore for MemoryStore {
    fn search_attestations(&self, filter: &AttestationFilter) -> Result<Vec<Attestation>> {
        Ok(self
            .attestations
            .iter()
            .filter(|a| self.matches(a, filter))
            .cloned()
            .collect())
    }

    fn attestation_edges(&self) -> Result<Vec<(PublicKey, PublicKey)>> {
        Ok(self
            .attestations
            .iter()
            .filter(|a| !self.revoked.contains(&a.id))
            .map(|a| (a.attestor.pubkey, a.subject.pubkey))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vouch_model::{Attestor, AttestorType, Evidence, Proficiency, Skill, Subject};

    fn key(fill: u8) -> PublicKey {
        PublicKey::from_bytes([fill; 32])
    }

    fn attestation(attestor: u8, subject: u8, domain: &str, specific: &str) -> Attestation {
        Attestation::builder(
            AttestationKind::Skill,
            Subject::new(key(subject)),
            Attestor::new(key(attestor), AttestorType::Agent),
        )
        .skill(Skill::new(domain, specific, Proficiency::Proficient).unwrap())
        .evidence(Evidence::from_context("observed directly"))
        .build()
        .unwrap()
    }

    #[test]
    fn test_insert_validates() {
        let mut store = MemoryStore::new();
        let mut bad = attestation(1, 2, "research", "synthesis");
        bad.skill = None;
        assert!(store.insert(bad).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_search_by_subject_and_attestor() {
        let mut store = MemoryStore::new();
        store.insert(attestation(1, 2, "research", "synthesis")).unwrap();
        store.insert(attestation(1, 3, "research", "synthesis")).unwrap();
        store.insert(attestation(2, 3, "writing", "editing")).unwrap();

        let by_subject = store
            .search_attestations(&AttestationFilter::by_subject(key(3)))
            .unwrap();
        assert_eq!(by_subject.len(), 2);

        let between = store
            .search_attestations(&AttestationFilter::between(key(1), key(3)))
            .unwrap();
        assert_eq!(between.len(), 1);
    }

    #[test]
    fn test_search_by_domain_and_kind() {
        let mut store = MemoryStore::new();
        store.insert(attestation(1, 2, "research", "synthesis")).unwrap();
        store.insert(attestation(1, 2, "writing", "editing")).unwrap();

        let filter = AttestationFilter {
            domain: Some("writing".to_string()),
            ..AttestationFilter::default()
        };
        let results = store.search_attestations(&filter).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].skill.as_ref().unwrap().specific, "editing");

        let filter = AttestationFilter {
            kind: Some(AttestationKind::Warning),
            ..AttestationFilter::default()
        };
        assert!(store.search_attestations(&filter).unwrap().is_empty());
    }

    #[test]
    fn test_revoked_excluded_by_default() {
        let mut store = MemoryStore::new();
        let att = attestation(1, 2, "research", "synthesis");
        let id = att.id.clone();
        store.insert(att).unwrap();

        assert!(store.revoke(&id));
        assert!(store.is_revoked(&id));

        let visible = store
            .search_attestations(&AttestationFilter::default())
            .unwrap();
        assert!(visible.is_empty());

        let with_revoked = store
            .search_attestations(&AttestationFilter {
                include_revoked: true,
                ..AttestationFilter::default()
            })
            .unwrap();
        assert_eq!(with_revoked.len(), 1);

        assert!(store.attestation_edges().unwrap().is_empty());
    }

    #[test]
    fn test_revoke_unknown_id_is_noop() {
        let mut store = MemoryStore::new();
        assert!(!store.revoke("no-such-id"));
    }

    #[test]
    fn test_apply_revocation_claim() {
        let mut store = MemoryStore::new();
        let att = attestation(1, 2, "research", "synthesis");
        let id = att.id.clone();
        store.insert(att).unwrap();

        let revocation = Revocation::new(&id, Subject::new(key(1)), "no longer accurate");
        assert!(store.apply_revocation(&revocation));
        assert!(store.is_revoked(&id));
    }

    #[test]
    fn test_edges_keep_duplicates() {
        let mut store = MemoryStore::new();
        store.insert(attestation(1, 2, "research", "synthesis")).unwrap();
        store.insert(attestation(1, 2, "writing", "editing")).unwrap();
        assert_eq!(store.attestation_edges().unwrap().len(), 2);
    }
}
