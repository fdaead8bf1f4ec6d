//! Tunable parameters for the trust engine.

use serde::{Deserialize, Serialize};

/// Default half-life for decay, in days.
pub const DEFAULT_HALF_LIFE_DAYS: f64 = 180.0;

/// Default floor on attestor weight.
pub const DEFAULT_BASE_REPUTATION_WEIGHT: f64 = 0.1;

/// Default discount for mutual attestation pairs.
pub const DEFAULT_MUTUAL_PAIR_DISCOUNT: f64 = 0.5;

/// Default discount for cliques of three or more.
pub const DEFAULT_CLIQUE_DISCOUNT: f64 = 0.3;

/// Default maximum recursion depth for reputation.
pub const DEFAULT_MAX_REPUTATION_DEPTH: usize = 3;

/// Default edge-count ceiling above which clique enumeration is skipped.
pub const DEFAULT_MAX_EDGES_FOR_CLIQUES: usize = 10_000;

/// Configuration for the trust engine.
///
/// The defaults are the protocol constants; deployments tune these only
/// for analysis experiments, never for live scoring, since two engines
/// with different parameters produce incomparable scores.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Half-life for attestation and evidence decay, in days.
    pub half_life_days: f64,
    /// Floor on attestor weight, so unattested attestors still contribute.
    pub base_reputation_weight: f64,
    /// Discount applied to attestations inside a mutual pair.
    pub mutual_pair_discount: f64,
    /// Discount applied to attestations inside a clique. Takes precedence
    /// over the mutual-pair discount.
    pub clique_discount: f64,
    /// Maximum recursion depth for reputation computation.
    pub max_reputation_depth: usize,
    /// Edge-count ceiling above which clique enumeration is skipped.
    pub max_edges_for_cliques: usize,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            half_life_days: DEFAULT_HALF_LIFE_DAYS,
            base_reputation_weight: DEFAULT_BASE_REPUTATION_WEIGHT,
            mutual_pair_discount: DEFAULT_MUTUAL_PAIR_DISCOUNT,
            clique_discount: DEFAULT_CLIQUE_DISCOUNT,
            max_reputation_depth: DEFAULT_MAX_REPUTATION_DEPTH,
            max_edges_for_cliques: DEFAULT_MAX_EDGES_FOR_CLIQUES,
        }
    }
}

impl TrustConfig {
    /// Create a configuration with the protocol defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the decay half-life in days.
    #[must_use]
    pub fn with_half_life_days(mut self, days: f64) -> Self {
        self.half_life_days = days;
        self
    }

    /// Set the clique-detection edge ceiling.
    #[must_use]
    pub fn with_max_edges_for_cliques(mut self, max_edges: usize) -> Self {
        self.max_edges_for_cliques = max_edges;
        self
    }

    /// Set the maximum reputation recursion depth.
    #[must_use]
    pub fn with_max_reputation_depth(mut self, depth: usize) -> Self {
        self.max_reputation_depth = depth;
        self
    }
}
