//! Supporting evidence attached to a claim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// Free-form evidence supporting a claim.
///
/// Evidence is never itself signed or scored at construction time; quality
/// scoring is advisory and lives in the trust engine. The one protocol-level
/// rule is that behavioral warnings require substantial evidence (context
/// length >= 100 and at least one artifact), enforced when the attestation
/// is built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Free-text description of the interaction or work observed.
    pub context: String,
    /// Ordered list of artifact URIs or locators.
    #[serde(default)]
    pub artifacts: Vec<String>,
    /// Optional outcome text.
    #[serde(default)]
    pub outcome: String,
    /// When the underlying interaction occurred, if known.
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub interaction_date: Option<DateTime<Utc>>,
}

impl Evidence {
    /// Create evidence with context text only.
    #[must_use]
    pub fn from_context(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            ..Self::default()
        }
    }

    /// Add an artifact locator.
    #[must_use]
    pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifacts.push(artifact.into());
        self
    }

    /// Set the outcome text.
    #[must_use]
    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = outcome.into();
        self
    }

    /// Set the interaction timestamp.
    #[must_use]
    pub fn with_interaction_date(mut self, date: DateTime<Utc>) -> Self {
        self.interaction_date = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_builder_chain() {
        let ev = Evidence::from_context("reviewed a parser rewrite")
            .with_artifact("https://example.com/pr/42")
            .with_outcome("merged");
        assert_eq!(ev.artifacts.len(), 1);
        assert_eq!(ev.outcome, "merged");
        assert!(ev.interaction_date.is_none());
    }

    #[test]
    fn test_absent_interaction_date_omitted_from_json() {
        let ev = Evidence::from_context("ctx");
        let json = serde_json::to_value(&ev).unwrap();
        assert!(json.get("interaction_date").is_none());
    }

    #[test]
    fn test_interaction_date_canonical_format() {
        let ev = Evidence::from_context("ctx")
            .with_interaction_date(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["interaction_date"], "2025-01-02T03:04:05Z");
    }
}
