//! Per-attestation weighting, per-agent analysis, and network statistics.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use vouch_model::{timestamp, Attestation, PublicKey};

use crate::config::TrustConfig;
use crate::decay::compute_decay;
use crate::error::Result;
use crate::evidence::score_evidence;
use crate::reputation::{attestor_weight, reputation};
use crate::rings::{detect_all_rings, ring_discount, RingInfo, RingType};
use crate::store::{AttestationFilter, AttestationStore};
use crate::util::{round2, round4};

/// Decay factor below which an attestation is flagged as decayed.
pub const DECAYED_FLAG_THRESHOLD: f64 = 0.25;

/// Attestor reputation below which the attestor is flagged as unattested.
pub const UNATTESTED_FLAG_THRESHOLD: f64 = 0.01;

/// Advisory flag attached to an attestation weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightFlag {
    /// Attestor and subject share a ring.
    RingMember,
    /// Decay factor fell below 0.25.
    Decayed,
    /// The attestor has effectively no reputation of their own.
    UnattestedAttestor,
}

/// Computed weight for a single attestation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttestationWeight {
    /// Identifier of the weighted attestation.
    pub attestation_id: String,
    /// Declared proficiency, 1-5. Defaults to 1 when no skill is present.
    pub raw_proficiency: u8,
    /// Evidence composite score.
    pub evidence_quality: f64,
    /// Time decay factor from the issuance date.
    pub decay_factor: f64,
    /// The attestor's own recursive reputation.
    pub attestor_reputation: f64,
    /// Ring discount applied to this attestation.
    pub ring_discount: f64,
    /// Product of proficiency, quality, decay, attestor weight, discount.
    pub effective_weight: f64,
    /// Advisory flags.
    pub flags: Vec<WeightFlag>,
}

/// Weighted aggregate for one (domain, specific) skill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillSummary {
    /// Taxonomy domain identifier.
    pub domain: String,
    /// Specific skill identifier.
    pub specific: String,
    /// Highest attested proficiency.
    pub max_proficiency: u8,
    /// Arithmetic mean proficiency.
    pub avg_proficiency: f64,
    /// Weight-normalized mean proficiency. Falls back to the arithmetic
    /// mean when total weight is zero.
    pub weighted_avg_proficiency: f64,
    /// Number of attestations for this skill.
    pub attestation_count: usize,
}

/// Full trust analysis for one agent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentTrustAnalysis {
    /// The analyzed identity.
    pub pubkey: PublicKey,
    /// Recursive reputation score in [0, 1).
    pub reputation_score: f64,
    /// Weight for every non-revoked attestation naming this identity as
    /// subject.
    pub attestation_weights: Vec<AttestationWeight>,
    /// Rings this identity participates in.
    pub rings_involved: Vec<RingInfo>,
    /// Weighted per-skill aggregates.
    pub weighted_skills: Vec<SkillSummary>,
    /// When this analysis was computed.
    #[serde(with = "timestamp")]
    pub analysis_timestamp: DateTime<Utc>,
}

/// Network-wide ring statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkHealth {
    /// Distinct identities appearing on any edge.
    pub total_agents_in_graph: usize,
    /// Directed attestor -> subject edges over non-revoked attestations.
    pub total_directed_edges: usize,
    /// Number of mutual pairs.
    pub mutual_pair_count: usize,
    /// Number of cliques.
    pub clique_count: usize,
    /// Identities involved in at least one ring.
    pub agents_in_rings: usize,
    /// Fraction of graph agents involved in rings.
    pub ring_participation_rate: f64,
}

/// Compute the effective weight of a single attestation.
///
/// The attestor's reputation is recomputed here; batch callers that
/// already hold it can cache across calls, the result is identical.
pub fn attestation_weight(
    store: &dyn AttestationStore,
    attestation: &Attestation,
    rings: &[RingInfo],
    reference: Option<DateTime<Utc>>,
    config: &TrustConfig,
) -> Result<AttestationWeight> {
    let raw_proficiency = attestation
        .skill
        .as_ref()
        .map_or(1, |s| s.proficiency.level());

    let evidence_quality =
        score_evidence(&attestation.evidence, attestation.kind, reference).composite;
    let reference_time = reference.unwrap_or_else(Utc::now);
    let decay = compute_decay(attestation.issued, reference_time, config.half_life_days);

    let attestor_reputation = reputation(
        store,
        &attestation.attestor.pubkey,
        rings,
        Some(reference_time),
        config,
    )?;
    let weight = attestor_weight(attestor_reputation, config);

    let discount = ring_discount(
        &attestation.subject.pubkey,
        &attestation.attestor.pubkey,
        rings,
        config,
    );

    let effective = f64::from(raw_proficiency) * evidence_quality * decay * weight * discount;

    let mut flags = Vec::new();
    if discount < 1.0 {
        flags.push(WeightFlag::RingMember);
    }
    if decay < DECAYED_FLAG_THRESHOLD {
        flags.push(WeightFlag::Decayed);
    }
    if attestor_reputation < UNATTESTED_FLAG_THRESHOLD {
        flags.push(WeightFlag::UnattestedAttestor);
    }

    Ok(AttestationWeight {
        attestation_id: attestation.id.clone(),
        raw_proficiency,
        evidence_quality: round4(evidence_quality),
        decay_factor: round4(decay),
        attestor_reputation: round4(attestor_reputation),
        ring_discount: round2(discount),
        effective_weight: round4(effective),
        flags,
    })
}

/// Aggregate attestations into weighted per-skill summaries.
///
/// Groups by (domain, specific); sorted by descending max proficiency,
/// then descending attestation count.
#[must_use]
pub fn aggregate_weighted_skills(
    attestations: &[Attestation],
    weights: &[AttestationWeight],
) -> Vec<SkillSummary> {
    let weight_by_id: BTreeMap<&str, f64> = weights
        .iter()
        .map(|w| (w.attestation_id.as_str(), w.effective_weight))
        .collect();

    struct Bucket {
        domain: String,
        specific: String,
        proficiencies: Vec<f64>,
        weights: Vec<f64>,
    }

    let mut buckets: BTreeMap<(String, String), Bucket> = BTreeMap::new();
    for attestation in attestations {
        let Some(skill) = &attestation.skill else {
            continue;
        };
        let key = (skill.domain.clone(), skill.specific.clone());
        let bucket = buckets.entry(key).or_insert_with(|| Bucket {
            domain: skill.domain.clone(),
            specific: skill.specific.clone(),
            proficiencies: Vec::new(),
            weights: Vec::new(),
        });
        bucket
            .proficiencies
            .push(f64::from(skill.proficiency.level()));
        bucket
            .weights
            .push(weight_by_id.get(attestation.id.as_str()).copied().unwrap_or(0.0));
    }

    let mut results: Vec<SkillSummary> = buckets
        .into_values()
        .map(|bucket| {
            let count = bucket.proficiencies.len();
            let total_weight: f64 = bucket.weights.iter().sum();
            let avg = bucket.proficiencies.iter().sum::<f64>() / count as f64;
            let weighted_avg = if total_weight > 0.0 {
                bucket
                    .proficiencies
                    .iter()
                    .zip(&bucket.weights)
                    .map(|(p, w)| p * w)
                    .sum::<f64>()
                    / total_weight
            } else {
                avg
            };
            SkillSummary {
                domain: bucket.domain,
                specific: bucket.specific,
                max_proficiency: bucket.proficiencies.iter().fold(0.0, |a: f64, &b| a.max(b)) as u8,
                avg_proficiency: round2(avg),
                weighted_avg_proficiency: round2(weighted_avg),
                attestation_count: count,
            }
        })
        .collect();

    results.sort_by(|a, b| {
        b.max_proficiency
            .cmp(&a.max_proficiency)
            .then(b.attestation_count.cmp(&a.attestation_count))
    });
    results
}

/// Full trust analysis for one agent.
///
/// Returns a complete, self-consistent analysis or fails; it never
/// returns partial weights.
pub fn analyze_agent(
    store: &dyn AttestationStore,
    pubkey: &PublicKey,
    reference: Option<DateTime<Utc>>,
    config: &TrustConfig,
) -> Result<AgentTrustAnalysis> {
    let rings = detect_all_rings(store, config)?;

    let reputation_score = reputation(store, pubkey, &rings, reference, config)?;

    let attestations = store.search_attestations(&AttestationFilter::by_subject(*pubkey))?;
    debug!(
        pubkey = %pubkey,
        attestations = attestations.len(),
        rings = rings.len(),
        "analyzing agent"
    );

    let mut attestation_weights = Vec::with_capacity(attestations.len());
    for attestation in &attestations {
        attestation_weights.push(attestation_weight(
            store,
            attestation,
            &rings,
            reference,
            config,
        )?);
    }

    let rings_involved: Vec<RingInfo> = rings
        .into_iter()
        .filter(|ring| ring.contains(pubkey))
        .collect();

    let weighted_skills = aggregate_weighted_skills(&attestations, &attestation_weights);

    Ok(AgentTrustAnalysis {
        pubkey: *pubkey,
        reputation_score: round4(reputation_score),
        attestation_weights,
        rings_involved,
        weighted_skills,
        analysis_timestamp: Utc::now(),
    })
}

/// Network-wide ring statistics. No recursion, pure aggregation.
pub fn network_health(store: &dyn AttestationStore, config: &TrustConfig) -> Result<NetworkHealth> {
    let rings = detect_all_rings(store, config)?;
    let edges = store.attestation_edges()?;

    let mut unique_agents: HashSet<PublicKey> = HashSet::new();
    for (a, b) in &edges {
        unique_agents.insert(*a);
        unique_agents.insert(*b);
    }

    let mutual_pair_count = rings
        .iter()
        .filter(|r| r.ring_type == RingType::MutualPair)
        .count();
    let clique_count = rings
        .iter()
        .filter(|r| r.ring_type == RingType::Clique)
        .count();

    let mut ring_agents: HashSet<PublicKey> = HashSet::new();
    for ring in &rings {
        ring_agents.extend(ring.members.iter().copied());
    }

    let ring_participation_rate = if unique_agents.is_empty() {
        0.0
    } else {
        round4(ring_agents.len() as f64 / unique_agents.len() as f64)
    };

    Ok(NetworkHealth {
        total_agents_in_graph: unique_agents.len(),
        total_directed_edges: edges.len(),
        mutual_pair_count,
        clique_count,
        agents_in_rings: ring_agents.len(),
        ring_participation_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Duration;
    use vouch_model::{
        AttestationKind, Attestor, AttestorType, Evidence, Proficiency, Skill, Subject,
    };

    fn key(fill: u8) -> PublicKey {
        PublicKey::from_bytes([fill; 32])
    }

    fn attest_skill(
        store: &mut MemoryStore,
        attestor: u8,
        subject: u8,
        specific: &str,
        proficiency: Proficiency,
        days_ago: i64,
    ) -> String {
        let att = Attestation::builder(
            AttestationKind::Skill,
            Subject::new(key(subject)),
            Attestor::new(key(attestor), AttestorType::Agent),
        )
        .skill(Skill::new("software_development", specific, proficiency).unwrap())
        .evidence(
            Evidence::from_context("watched the work happen end to end")
                .with_artifact("https://example.com/artifact"),
        )
        .issued(Utc::now() - Duration::days(days_ago))
        .build()
        .unwrap();
        let id = att.id.clone();
        store.insert(att).unwrap();
        id
    }

    #[test]
    fn test_weight_flags_unattested_fresh_attestor() {
        let mut store = MemoryStore::new();
        attest_skill(&mut store, 1, 2, "debugging", Proficiency::Expert, 1);
        let config = TrustConfig::default();
        let rings = detect_all_rings(&store, &config).unwrap();
        let attestations = store
            .search_attestations(&AttestationFilter::by_subject(key(2)))
            .unwrap();

        let weight = attestation_weight(&store, &attestations[0], &rings, None, &config).unwrap();
        assert_eq!(weight.raw_proficiency, 4);
        assert!(weight.flags.contains(&WeightFlag::UnattestedAttestor));
        assert!(!weight.flags.contains(&WeightFlag::RingMember));
        assert!(!weight.flags.contains(&WeightFlag::Decayed));
        assert_eq!(weight.ring_discount, 1.0);
        assert!(weight.effective_weight > 0.0);
    }

    #[test]
    fn test_weight_flags_decayed() {
        let mut store = MemoryStore::new();
        // Two half-lives is exactly 0.25; go past it.
        attest_skill(&mut store, 1, 2, "debugging", Proficiency::Expert, 400);
        let config = TrustConfig::default();
        let rings = detect_all_rings(&store, &config).unwrap();
        let attestations = store
            .search_attestations(&AttestationFilter::by_subject(key(2)))
            .unwrap();

        let weight = attestation_weight(&store, &attestations[0], &rings, None, &config).unwrap();
        assert!(weight.flags.contains(&WeightFlag::Decayed));
        assert!(weight.decay_factor < DECAYED_FLAG_THRESHOLD);
    }

    #[test]
    fn test_weight_flags_ring_member_with_half_discount() {
        let mut store = MemoryStore::new();
        attest_skill(&mut store, 1, 2, "debugging", Proficiency::Expert, 1);
        attest_skill(&mut store, 2, 1, "debugging", Proficiency::Expert, 1);
        let config = TrustConfig::default();
        let rings = detect_all_rings(&store, &config).unwrap();

        for subject in [1u8, 2u8] {
            let attestations = store
                .search_attestations(&AttestationFilter::by_subject(key(subject)))
                .unwrap();
            let weight =
                attestation_weight(&store, &attestations[0], &rings, None, &config).unwrap();
            assert_eq!(weight.ring_discount, 0.5);
            assert!(weight.flags.contains(&WeightFlag::RingMember));
        }
    }

    #[test]
    fn test_aggregate_groups_and_sorts() {
        let mut store = MemoryStore::new();
        attest_skill(&mut store, 1, 9, "debugging", Proficiency::Expert, 1);
        attest_skill(&mut store, 2, 9, "debugging", Proficiency::Competent, 1);
        attest_skill(&mut store, 3, 9, "testing", Proficiency::Authority, 1);

        let config = TrustConfig::default();
        let analysis = analyze_agent(&store, &key(9), None, &config).unwrap();
        let skills = &analysis.weighted_skills;

        assert_eq!(skills.len(), 2);
        // testing has max 5, debugging max 4.
        assert_eq!(skills[0].specific, "testing");
        assert_eq!(skills[0].max_proficiency, 5);
        assert_eq!(skills[1].specific, "debugging");
        assert_eq!(skills[1].max_proficiency, 4);
        assert_eq!(skills[1].attestation_count, 2);
        assert_eq!(skills[1].avg_proficiency, 3.0);
        // Weighted mean stays within the attested range.
        assert!(skills[1].weighted_avg_proficiency >= 2.0);
        assert!(skills[1].weighted_avg_proficiency <= 4.0);
    }

    #[test]
    fn test_aggregate_zero_weight_falls_back_to_plain_mean() {
        let attestation = Attestation::builder(
            AttestationKind::Skill,
            Subject::new(key(2)),
            Attestor::new(key(1), AttestorType::Agent),
        )
        .skill(Skill::new("software_development", "testing", Proficiency::Proficient).unwrap())
        .evidence(Evidence::from_context("ctx"))
        .build()
        .unwrap();
        let weights = vec![AttestationWeight {
            attestation_id: attestation.id.clone(),
            raw_proficiency: 3,
            evidence_quality: 0.0,
            decay_factor: 1.0,
            attestor_reputation: 0.0,
            ring_discount: 1.0,
            effective_weight: 0.0,
            flags: vec![],
        }];
        let skills = aggregate_weighted_skills(&[attestation], &weights);
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].weighted_avg_proficiency, 3.0);
    }

    #[test]
    fn test_analysis_includes_only_own_rings() {
        let mut store = MemoryStore::new();
        attest_skill(&mut store, 1, 2, "debugging", Proficiency::Expert, 1);
        attest_skill(&mut store, 2, 1, "debugging", Proficiency::Expert, 1);
        attest_skill(&mut store, 5, 6, "testing", Proficiency::Expert, 1);
        attest_skill(&mut store, 6, 5, "testing", Proficiency::Expert, 1);

        let config = TrustConfig::default();
        let analysis = analyze_agent(&store, &key(1), None, &config).unwrap();
        assert_eq!(analysis.rings_involved.len(), 1);
        assert!(analysis.rings_involved[0].contains(&key(1)));
        assert!(!analysis.rings_involved[0].contains(&key(5)));
    }

    #[test]
    fn test_network_health_empty_graph() {
        let store = MemoryStore::new();
        let config = TrustConfig::default();
        let health = network_health(&store, &config).unwrap();
        assert_eq!(health.total_agents_in_graph, 0);
        assert_eq!(health.total_directed_edges, 0);
        assert_eq!(health.ring_participation_rate, 0.0);
    }

    #[test]
    fn test_network_health_counts() {
        let mut store = MemoryStore::new();
        // One mutual pair and one one-way edge to an outsider.
        attest_skill(&mut store, 1, 2, "debugging", Proficiency::Expert, 1);
        attest_skill(&mut store, 2, 1, "debugging", Proficiency::Expert, 1);
        attest_skill(&mut store, 1, 3, "testing", Proficiency::Expert, 1);

        let config = TrustConfig::default();
        let health = network_health(&store, &config).unwrap();
        assert_eq!(health.total_agents_in_graph, 3);
        assert_eq!(health.total_directed_edges, 3);
        assert_eq!(health.mutual_pair_count, 1);
        assert_eq!(health.clique_count, 0);
        assert_eq!(health.agents_in_rings, 2);
        assert!((health.ring_participation_rate - 0.6667).abs() < 1e-9);
    }
}
