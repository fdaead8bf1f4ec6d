//! Attestation ring detection.
//!
//! Rings are derived, never stored: every detection call recomputes from
//! the live edge set, so a revoked attestation disappears from ring
//! structure on the next query.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use vouch_model::PublicKey;

use crate::config::TrustConfig;
use crate::error::Result;
use crate::store::{AttestationFilter, AttestationStore};

/// Minimum member count for a clique ring.
pub const MIN_CLIQUE_SIZE: usize = 3;

/// The shape of a detected ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingType {
    /// Two identities attesting each other.
    MutualPair,
    /// Three or more identities, all pairs mutually attesting.
    Clique,
}

/// A detected cluster of mutually-attesting identities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RingInfo {
    /// Member identities, sorted canonically.
    pub members: Vec<PublicKey>,
    /// Number of members.
    pub size: usize,
    /// Whether this is a mutual pair or a clique.
    pub ring_type: RingType,
    /// Identifiers of the attestations forming the ring's edges.
    pub attestation_ids: Vec<String>,
}

impl RingInfo {
    /// Whether the given identity is a member of this ring.
    #[must_use]
    pub fn contains(&self, pubkey: &PublicKey) -> bool {
        self.members.contains(pubkey)
    }
}

fn attestation_ids_between(
    store: &dyn AttestationStore,
    attestor: PublicKey,
    subject: PublicKey,
) -> Result<Vec<String>> {
    Ok(store
        .search_attestations(&AttestationFilter::between(attestor, subject))?
        .into_iter()
        .map(|a| a.id)
        .collect())
}

/// Find all A<->B mutual attestation pairs.
///
/// Each unordered pair is reported once, annotated with every attestation
/// id forming either direction of the edge.
pub fn detect_mutual_pairs(store: &dyn AttestationStore) -> Result<Vec<RingInfo>> {
    let edges = store.attestation_edges()?;
    let edge_set: HashSet<(PublicKey, PublicKey)> = edges.iter().copied().collect();

    let mut seen: HashSet<(PublicKey, PublicKey)> = HashSet::new();
    let mut pairs = Vec::new();
    for &(a, b) in &edges {
        if a == b {
            continue;
        }
        let pair_key = if a < b { (a, b) } else { (b, a) };
        if seen.contains(&pair_key) {
            continue;
        }
        if edge_set.contains(&(b, a)) {
            seen.insert(pair_key);
            let mut attestation_ids = attestation_ids_between(store, a, b)?;
            attestation_ids.extend(attestation_ids_between(store, b, a)?);
            let mut members = vec![a, b];
            members.sort();
            pairs.push(RingInfo {
                members,
                size: 2,
                ring_type: RingType::MutualPair,
                attestation_ids,
            });
        }
    }
    Ok(pairs)
}

/// Find cliques of `min_size` or more where all members mutually attest.
///
/// Runs Bron-Kerbosch (no pivoting) on the mutual-attestation graph.
/// Skips enumeration entirely when the edge count exceeds the configured
/// ceiling — mutual-pair detection is unaffected by that valve.
pub fn detect_cliques(
    store: &dyn AttestationStore,
    min_size: usize,
    config: &TrustConfig,
) -> Result<Vec<RingInfo>> {
    let edges = store.attestation_edges()?;
    if edges.len() > config.max_edges_for_cliques {
        warn!(
            edges = edges.len(),
            ceiling = config.max_edges_for_cliques,
            "edge count exceeds safety ceiling, skipping clique enumeration"
        );
        return Ok(Vec::new());
    }

    let edge_set: HashSet<(PublicKey, PublicKey)> = edges.iter().copied().collect();
    let mut mutual_graph: HashMap<PublicKey, HashSet<PublicKey>> = HashMap::new();
    for &(a, b) in &edges {
        if a != b && edge_set.contains(&(b, a)) {
            mutual_graph.entry(a).or_default().insert(b);
            mutual_graph.entry(b).or_default().insert(a);
        }
    }
    if mutual_graph.is_empty() {
        return Ok(Vec::new());
    }

    let mut cliques: Vec<HashSet<PublicKey>> = Vec::new();
    bron_kerbosch(
        &mut HashSet::new(),
        mutual_graph.keys().copied().collect(),
        HashSet::new(),
        &mutual_graph,
        &mut cliques,
    );

    let mut results = Vec::new();
    for clique in cliques {
        if clique.len() < min_size {
            continue;
        }
        let mut members: Vec<PublicKey> = clique.into_iter().collect();
        members.sort();
        let mut attestation_ids = Vec::new();
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                attestation_ids.extend(attestation_ids_between(store, a, b)?);
                attestation_ids.extend(attestation_ids_between(store, b, a)?);
            }
        }
        results.push(RingInfo {
            size: members.len(),
            members,
            ring_type: RingType::Clique,
            attestation_ids,
        });
    }
    Ok(results)
}

/// Bron-Kerbosch maximal clique enumeration, recording cliques of 2+.
fn bron_kerbosch(
    r: &mut HashSet<PublicKey>,
    mut p: HashSet<PublicKey>,
    mut x: HashSet<PublicKey>,
    graph: &HashMap<PublicKey, HashSet<PublicKey>>,
    cliques: &mut Vec<HashSet<PublicKey>>,
) {
    if p.is_empty() && x.is_empty() {
        if r.len() >= 2 {
            cliques.push(r.clone());
        }
        return;
    }
    let candidates: Vec<PublicKey> = p.iter().copied().collect();
    for v in candidates {
        let empty = HashSet::new();
        let neighbors = graph.get(&v).unwrap_or(&empty);
        r.insert(v);
        bron_kerbosch(
            r,
            p.intersection(neighbors).copied().collect(),
            x.intersection(neighbors).copied().collect(),
            graph,
            cliques,
        );
        r.remove(&v);
        p.remove(&v);
        x.insert(v);
    }
}

/// Combined ring detection: mutual pairs followed by cliques.
pub fn detect_all_rings(store: &dyn AttestationStore, config: &TrustConfig) -> Result<Vec<RingInfo>> {
    let mut rings = detect_mutual_pairs(store)?;
    rings.extend(detect_cliques(store, MIN_CLIQUE_SIZE, config)?);
    Ok(rings)
}

/// Discount factor for an attestation given ring membership.
///
/// Cliques are checked before pairs: the larger coordinated structure
/// carries the stricter penalty.
#[must_use]
pub fn ring_discount(
    subject: &PublicKey,
    attestor: &PublicKey,
    rings: &[RingInfo],
    config: &TrustConfig,
) -> f64 {
    for ring in rings {
        if ring.ring_type == RingType::Clique && ring.contains(subject) && ring.contains(attestor) {
            return config.clique_discount;
        }
    }
    for ring in rings {
        if ring.ring_type == RingType::MutualPair
            && ring.contains(subject)
            && ring.contains(attestor)
        {
            return config.mutual_pair_discount;
        }
    }
    1.0
}
