//! Evidence quality scoring.
//!
//! Four dimensions, each in [0, 1]:
//! - **Specificity**: context length and artifact count
//! - **Verifiability**: artifact count and recognizable locator shapes
//! - **Relevance**: fixed at 1.0 pending semantic matching
//! - **Recency**: exponential decay from the interaction date
//!
//! Scoring is informational input to the reputation engine. It never
//! blocks claim acceptance and never fails — thin evidence scores low.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vouch_model::{AttestationKind, Evidence};

use crate::util::round4;

/// Composite weight of the specificity dimension.
pub const SPECIFICITY_WEIGHT: f64 = 0.30;

/// Composite weight of the verifiability dimension.
pub const VERIFIABILITY_WEIGHT: f64 = 0.30;

/// Composite weight of the relevance dimension.
pub const RELEVANCE_WEIGHT: f64 = 0.20;

/// Composite weight of the recency dimension.
pub const RECENCY_WEIGHT: f64 = 0.20;

/// Recency half-life in days.
pub const RECENCY_HALF_LIFE_DAYS: f64 = 180.0;

/// Locator prefixes that count as verifiable.
const VERIFIABLE_PREFIXES: &[&str] = &[
    "http://", "https://", "chain:", "output:", "post:", "commit:", "pr:", "issue:", "ipfs:",
];

/// Evidence quality across four dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvidenceScore {
    /// Context length and artifact count.
    pub specificity: f64,
    /// Artifact count and locator shapes.
    pub verifiability: f64,
    /// Fixed at 1.0 in this version.
    pub relevance: f64,
    /// Exponential decay from the interaction date.
    pub recency: f64,
    /// Weighted sum of the four dimensions.
    pub composite: f64,
}

fn score_specificity(evidence: &Evidence) -> f64 {
    let ctx_len = evidence.context.chars().count();
    let ctx_score = if ctx_len == 0 {
        0.0
    } else if ctx_len <= 500 {
        (ctx_len as f64 / 500.0) * 0.5
    } else {
        0.5 + ((ctx_len as f64 - 500.0) / 2000.0).min(0.5)
    };

    let art_score = match evidence.artifacts.len() {
        0 => 0.0,
        1 => 0.5,
        2 => 0.75,
        _ => 1.0,
    };

    let outcome_bonus = if evidence.outcome.is_empty() { 0.0 } else { 0.1 };

    (ctx_score * 0.5 + art_score * 0.5 + outcome_bonus).min(1.0)
}

fn score_verifiability(evidence: &Evidence) -> f64 {
    if evidence.artifacts.is_empty() {
        return 0.0;
    }
    let uri_count = evidence
        .artifacts
        .iter()
        .filter(|artifact| is_verifiable_locator(artifact))
        .count();
    let uri_ratio = uri_count as f64 / evidence.artifacts.len() as f64;
    let base = (evidence.artifacts.len() as f64 * 0.2).min(0.5);
    (base + uri_ratio * 0.5).min(1.0)
}

fn is_verifiable_locator(artifact: &str) -> bool {
    VERIFIABLE_PREFIXES.iter().any(|prefix| {
        artifact
            .strip_prefix(prefix)
            .is_some_and(|rest| !rest.is_empty())
    })
}

fn score_relevance(_evidence: &Evidence, _kind: AttestationKind) -> f64 {
    // Placeholder until semantic matching exists.
    1.0
}

fn score_recency(evidence: &Evidence, reference: DateTime<Utc>) -> f64 {
    let Some(interaction) = evidence.interaction_date else {
        // Unknown is not the same as stale.
        return 0.5;
    };
    let delta_days = (reference - interaction).num_seconds() as f64 / 86_400.0;
    if delta_days < 0.0 {
        return 1.0;
    }
    (-delta_days / RECENCY_HALF_LIFE_DAYS).exp2()
}

/// Score evidence quality across four dimensions.
///
/// `reference` defaults to now; pass a fixed time for reproducible
/// analysis runs.
#[must_use]
pub fn score_evidence(
    evidence: &Evidence,
    kind: AttestationKind,
    reference: Option<DateTime<Utc>>,
) -> EvidenceScore {
    let reference = reference.unwrap_or_else(Utc::now);

    let specificity = score_specificity(evidence);
    let verifiability = score_verifiability(evidence);
    let relevance = score_relevance(evidence, kind);
    let recency = score_recency(evidence, reference);

    let composite = SPECIFICITY_WEIGHT * specificity
        + VERIFIABILITY_WEIGHT * verifiability
        + RELEVANCE_WEIGHT * relevance
        + RECENCY_WEIGHT * recency;

    EvidenceScore {
        specificity: round4(specificity),
        verifiability: round4(verifiability),
        relevance: round4(relevance),
        recency: round4(recency),
        composite: round4(composite),
    }
}
