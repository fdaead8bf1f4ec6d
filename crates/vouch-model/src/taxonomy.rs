//! Bundled skill taxonomy — load, validate, and query.
//!
//! The taxonomy is a static asset embedded at build time. It never changes
//! at runtime, so it is parsed once and cached for the life of the process.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::{ModelError, Result};

/// Raw taxonomy file contents, bundled with the crate.
const TAXONOMY_JSON: &str = include_str!("../data/taxonomy_v1.json");

#[derive(Debug, Deserialize)]
struct TaxonomyData {
    version: String,
    domains: BTreeMap<String, DomainData>,
}

#[derive(Debug, Deserialize)]
struct DomainData {
    label: String,
    skills: Vec<String>,
}

fn taxonomy() -> &'static TaxonomyData {
    static TAXONOMY: OnceLock<TaxonomyData> = OnceLock::new();
    TAXONOMY.get_or_init(|| {
        serde_json::from_str(TAXONOMY_JSON).expect("bundled taxonomy_v1.json is valid")
    })
}

/// Return all valid domain identifiers.
#[must_use]
pub fn domains() -> Vec<&'static str> {
    taxonomy().domains.keys().map(String::as_str).collect()
}

/// Return the human-readable label for a domain.
///
/// # Errors
///
/// Returns `ModelError::UnknownDomain` if the domain is not in the taxonomy.
pub fn domain_label(domain: &str) -> Result<&'static str> {
    taxonomy()
        .domains
        .get(domain)
        .map(|d| d.label.as_str())
        .ok_or_else(|| ModelError::UnknownDomain(domain.to_string()))
}

/// Return the specific skills for a domain.
///
/// # Errors
///
/// Returns `ModelError::UnknownDomain` if the domain is not in the taxonomy.
pub fn skills(domain: &str) -> Result<&'static [String]> {
    taxonomy()
        .domains
        .get(domain)
        .map(|d| d.skills.as_slice())
        .ok_or_else(|| ModelError::UnknownDomain(domain.to_string()))
}

/// Check whether a domain/skill combination is valid.
#[must_use]
pub fn is_valid_skill(domain: &str, specific: &str) -> bool {
    taxonomy()
        .domains
        .get(domain)
        .is_some_and(|d| d.skills.iter().any(|s| s == specific))
}

/// Validate a domain/skill combination.
///
/// # Errors
///
/// Returns `ModelError::UnknownDomain` or `ModelError::UnknownSkill`.
pub fn validate_skill(domain: &str, specific: &str) -> Result<()> {
    let data = taxonomy()
        .domains
        .get(domain)
        .ok_or_else(|| ModelError::UnknownDomain(domain.to_string()))?;
    if data.skills.iter().any(|s| s == specific) {
        Ok(())
    } else {
        Err(ModelError::UnknownSkill {
            domain: domain.to_string(),
            specific: specific.to_string(),
        })
    }
}

/// Suggest a domain that matches the query by prefix, then by substring.
#[must_use]
pub fn suggest_domain(query: &str) -> Option<&'static str> {
    let query = query.to_lowercase();
    let all = domains();
    all.iter()
        .find(|d| d.starts_with(&query))
        .or_else(|| all.iter().find(|d| d.contains(&query)))
        .copied()
}

/// Return the taxonomy version string.
#[must_use]
pub fn version() -> &'static str {
    &taxonomy().version
}
