//! # vouch-trust
//!
//! Trust graph analysis and reputation engine for the Vouch protocol.
//!
//! This crate provides:
//! - **EvidenceScore**: four-dimension quality scoring for claim evidence
//! - **Ring detection**: mutual pairs and cliques of mutually-attesting
//!   identities (Bron-Kerbosch)
//! - **Reputation**: recursive, decay- and ring-discounted scoring in [0, 1)
//! - **AgentTrustAnalysis**: per-agent weights, rings, and skill aggregates
//! - **NetworkHealth**: graph-wide ring statistics
//!
//! ## Purity
//!
//! Every public operation is a pure function of the attestation snapshot
//! behind the [`AttestationStore`] trait. The engine holds no state and
//! performs no mutation, so it is safe to call concurrently without
//! locking. Derived results (rings, analyses) are recomputed per query;
//! the optional [`AnalysisCache`] only ever affects latency, never
//! correctness.
//!
//! ## Anti-Gaming Measures
//!
//! - Mutual attestation pairs discounted to 0.5
//! - Cliques of three or more discounted to 0.3
//! - 180-day half-life decay on attestation age and evidence recency
//! - Attestor weight floored at 0.1 so fresh networks can bootstrap
//! - Recursion depth capped at 3 with per-branch cycle detection

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod cache;
pub mod config;
pub mod decay;
pub mod error;
pub mod evidence;
pub mod reputation;
pub mod rings;
pub mod store;

mod util;

pub use analysis::{
    aggregate_weighted_skills, analyze_agent, attestation_weight, network_health,
    AgentTrustAnalysis, AttestationWeight, NetworkHealth, SkillSummary, WeightFlag,
};
pub use cache::AnalysisCache;
pub use config::TrustConfig;
pub use decay::compute_decay;
pub use error::{Result, TrustError};
pub use evidence::{score_evidence, EvidenceScore};
pub use reputation::reputation;
pub use rings::{
    detect_all_rings, detect_cliques, detect_mutual_pairs, ring_discount, RingInfo, RingType,
};
pub use store::{AttestationFilter, AttestationStore, MemoryStore};
