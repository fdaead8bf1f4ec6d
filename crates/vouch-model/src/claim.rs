//! Signable claim records: attestations, disputes, and revocations.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ModelError, Result};
use crate::evidence::Evidence;
use crate::identity::{Attestor, PublicKey, Subject};
use crate::taxonomy;
use crate::timestamp;

/// Protocol schema version carried on every claim.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Minimum evidence context length for a behavioral warning.
pub const WARNING_MIN_CONTEXT_LEN: usize = 100;

/// Default validity window for a new attestation.
const DEFAULT_VALIDITY_DAYS: i64 = 365;

/// The kind of statement an attestation makes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttestationKind {
    /// The subject demonstrated a specific skill.
    #[serde(rename = "skill_attestation")]
    Skill,
    /// The subject made an intellectual contribution.
    #[serde(rename = "intellectual_contribution")]
    Intellectual,
    /// The subject made a community contribution.
    #[serde(rename = "community_contribution")]
    Community,
    /// The subject exhibited harmful behavior.
    #[serde(rename = "behavioral_warning")]
    Warning,
}

impl fmt::Display for AttestationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            AttestationKind::Skill => "skill_attestation",
            AttestationKind::Intellectual => "intellectual_contribution",
            AttestationKind::Community => "community_contribution",
            AttestationKind::Warning => "behavioral_warning",
        };
        write!(f, "{tag}")
    }
}

/// Category of a behavioral warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCategory {
    /// Unwanted or unsolicited output.
    Spam,
    /// Distributing malicious code.
    Malware,
    /// Deliberately misleading behavior.
    Deception,
    /// Exfiltrating private data.
    DataExfiltration,
    /// Impersonating another identity.
    Impersonation,
}

/// Declared proficiency level, 1 through 5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Proficiency {
    /// Level 1.
    Novice,
    /// Level 2.
    Competent,
    /// Level 3.
    Proficient,
    /// Level 4.
    Expert,
    /// Level 5.
    Authority,
}

impl Proficiency {
    /// The numeric level, 1-5.
    #[must_use]
    pub fn level(&self) -> u8 {
        match self {
            Proficiency::Novice => 1,
            Proficiency::Competent => 2,
            Proficiency::Proficient => 3,
            Proficiency::Expert => 4,
            Proficiency::Authority => 5,
        }
    }
}

impl TryFrom<u8> for Proficiency {
    type Error = ModelError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Proficiency::Novice),
            2 => Ok(Proficiency::Competent),
            3 => Ok(Proficiency::Proficient),
            4 => Ok(Proficiency::Expert),
            5 => Ok(Proficiency::Authority),
            other => Err(ModelError::InvalidProficiency(other)),
        }
    }
}

impl From<Proficiency> for u8 {
    fn from(p: Proficiency) -> Self {
        p.level()
    }
}

/// A skill claimed by an attestation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Taxonomy domain identifier.
    pub domain: String,
    /// Specific skill identifier within the domain.
    pub specific: String,
    /// Declared proficiency level.
    pub proficiency: Proficiency,
}

impl Skill {
    /// Create a skill, validating it against the bundled taxonomy.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::UnknownDomain` or `ModelError::UnknownSkill`.
    pub fn new(
        domain: impl Into<String>,
        specific: impl Into<String>,
        proficiency: Proficiency,
    ) -> Result<Self> {
        let domain = domain.into();
        let specific = specific.into();
        taxonomy::validate_skill(&domain, &specific)?;
        Ok(Self {
            domain,
            specific,
            proficiency,
        })
    }
}

/// A signed claim that a subject demonstrated a skill or behavior.
///
/// Immutable once constructed; only the `signature` field is set after the
/// fact by the signer. Field order here is not significant — the canonical
/// serializer sorts keys.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
    /// Protocol schema version.
    pub vouch: String,
    /// Unique claim identifier.
    pub id: String,
    /// What kind of statement this attestation makes.
    #[serde(rename = "type")]
    pub kind: AttestationKind,
    /// The party this attestation is about.
    pub subject: Subject,
    /// The party issuing this attestation.
    pub attestor: Attestor,
    /// The skill claimed. Required for all kinds except warnings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<Skill>,
    /// Warning category. Required only for behavioral warnings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning_category: Option<WarningCategory>,
    /// Supporting evidence.
    pub evidence: Evidence,
    /// When this attestation was issued.
    #[serde(with = "timestamp")]
    pub issued: DateTime<Utc>,
    /// When this attestation expires. Strictly after `issued`.
    #[serde(with = "timestamp")]
    pub expires: DateTime<Utc>,
    /// Detached signature, `ed25519:<hex>`. Set by the signer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Attestation {
    /// Start building an attestation.
    #[must_use]
    pub fn builder(kind: AttestationKind, subject: Subject, attestor: Attestor) -> AttestationBuilder {
        AttestationBuilder::new(kind, subject, attestor)
    }

    /// Validate the structural invariants of this attestation.
    ///
    /// Called by the builder; also useful after deserializing untrusted
    /// input, since serde alone does not enforce cross-field rules.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<()> {
        if self.expires <= self.issued {
            return Err(ModelError::ExpiresBeforeIssued);
        }
        if let Some(skill) = &self.skill {
            taxonomy::validate_skill(&skill.domain, &skill.specific)?;
        }
        match self.kind {
            AttestationKind::Warning => {
                if self.warning_category.is_none() {
                    return Err(ModelError::MissingWarningCategory);
                }
                if self.evidence.artifacts.is_empty() {
                    return Err(ModelError::TooFewArtifacts);
                }
                let ctx_len = self.evidence.context.chars().count();
                if ctx_len < WARNING_MIN_CONTEXT_LEN {
                    return Err(ModelError::ContextTooShort {
                        required: WARNING_MIN_CONTEXT_LEN,
                        actual: ctx_len,
                    });
                }
            }
            kind => {
                if self.skill.is_none() {
                    return Err(ModelError::MissingSkill {
                        kind: kind.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Builder for [`Attestation`].
///
/// Defaults: `issued` is now, `expires` is one year after `issued`.
#[derive(Debug)]
pub struct AttestationBuilder {
    kind: AttestationKind,
    subject: Subject,
    attestor: Attestor,
    skill: Option<Skill>,
    warning_category: Option<WarningCategory>,
    evidence: Evidence,
    issued: DateTime<Utc>,
    expires: Option<DateTime<Utc>>,
}

impl AttestationBuilder {
    /// Create a builder for the given kind and parties.
    #[must_use]
    pub fn new(kind: AttestationKind, subject: Subject, attestor: Attestor) -> Self {
        Self {
            kind,
            subject,
            attestor,
            skill: None,
            warning_category: None,
            evidence: Evidence::default(),
            issued: Utc::now(),
            expires: None,
        }
    }

    /// Set the claimed skill.
    #[must_use]
    pub fn skill(mut self, skill: Skill) -> Self {
        self.skill = Some(skill);
        self
    }

    /// Set the warning category.
    #[must_use]
    pub fn warning_category(mut self, category: WarningCategory) -> Self {
        self.warning_category = Some(category);
        self
    }

    /// Set the supporting evidence.
    #[must_use]
    pub fn evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = evidence;
        self
    }

    /// Override the issuance timestamp.
    #[must_use]
    pub fn issued(mut self, issued: DateTime<Utc>) -> Self {
        self.issued = issued;
        self
    }

    /// Override the expiry timestamp.
    #[must_use]
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Build and validate the attestation.
    ///
    /// # Errors
    ///
    /// Returns the first violated structural invariant.
    pub fn build(self) -> Result<Attestation> {
        let expires = self
            .expires
            .unwrap_or(self.issued + Duration::days(DEFAULT_VALIDITY_DAYS));
        let attestation = Attestation {
            vouch: PROTOCOL_VERSION.to_string(),
            id: Uuid::new_v4().to_string(),
            kind: self.kind,
            subject: self.subject,
            attestor: self.attestor,
            skill: self.skill,
            warning_category: self.warning_category,
            evidence: self.evidence,
            issued: self.issued,
            expires,
            signature: None,
        };
        attestation.validate()?;
        Ok(attestation)
    }
}

/// A signed response contesting a behavioral warning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dispute {
    /// Protocol schema version.
    pub vouch: String,
    /// Unique claim identifier.
    pub id: String,
    /// Identifier of the warning being disputed.
    pub warning_id: String,
    /// The party disputing the warning.
    pub disputor: Subject,
    /// Free-text response.
    pub response: String,
    /// Optional counter-evidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Evidence>,
    /// When this dispute was issued.
    #[serde(with = "timestamp")]
    pub issued: DateTime<Utc>,
    /// Detached signature, `ed25519:<hex>`. Set by the signer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Dispute {
    /// Create a new dispute issued now.
    #[must_use]
    pub fn new(warning_id: impl Into<String>, disputor: Subject, response: impl Into<String>) -> Self {
        Self {
            vouch: PROTOCOL_VERSION.to_string(),
            id: Uuid::new_v4().to_string(),
            warning_id: warning_id.into(),
            disputor,
            response: response.into(),
            evidence: None,
            issued: Utc::now(),
            signature: None,
        }
    }

    /// Attach counter-evidence.
    #[must_use]
    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = Some(evidence);
        self
    }
}

/// A signed retraction of a previously issued attestation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Revocation {
    /// Protocol schema version.
    pub vouch: String,
    /// Unique claim identifier.
    pub id: String,
    /// Identifier of the attestation being revoked.
    pub attestation_id: String,
    /// The party revoking.
    pub revoker: Subject,
    /// Why the attestation is being revoked.
    pub reason: String,
    /// When this revocation was issued.
    #[serde(with = "timestamp")]
    pub issued: DateTime<Utc>,
    /// Detached signature, `ed25519:<hex>`. Set by the signer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Revocation {
    /// Create a new revocation issued now.
    #[must_use]
    pub fn new(
        attestation_id: impl Into<String>,
        revoker: Subject,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            vouch: PROTOCOL_VERSION.to_string(),
            id: Uuid::new_v4().to_string(),
            attestation_id: attestation_id.into(),
            revoker,
            reason: reason.into(),
            issued: Utc::now(),
            signature: None,
        }
    }
}

/// Any signable claim.
///
/// The variants carry distinct field sets, so untagged serde representation
/// round-trips unambiguously and the wire form stays flat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Claim {
    /// A skill or behavior attestation.
    Attestation(Attestation),
    /// A dispute against a warning.
    Dispute(Dispute),
    /// A revocation of an attestation.
    Revocation(Revocation),
}

impl Claim {
    /// The claim's unique identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Claim::Attestation(a) => &a.id,
            Claim::Dispute(d) => &d.id,
            Claim::Revocation(r) => &r.id,
        }
    }

    /// The public key of the party that must sign this claim.
    #[must_use]
    pub fn issuer(&self) -> &PublicKey {
        match self {
            Claim::Attestation(a) => &a.attestor.pubkey,
            Claim::Dispute(d) => &d.disputor.pubkey,
            Claim::Revocation(r) => &r.revoker.pubkey,
        }
    }

    /// The attached signature, if any.
    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        match self {
            Claim::Attestation(a) => a.signature.as_deref(),
            Claim::Dispute(d) => d.signature.as_deref(),
            Claim::Revocation(r) => r.signature.as_deref(),
        }
    }

    /// Return a copy of this claim with the given signature attached.
    #[must_use]
    pub fn with_signature(&self, signature: String) -> Self {
        let mut claim = self.clone();
        match &mut claim {
            Claim::Attestation(a) => a.signature = Some(signature),
            Claim::Dispute(d) => d.signature = Some(signature),
            Claim::Revocation(r) => r.signature = Some(signature),
        }
        claim
    }

    /// When this claim was issued.
    #[must_use]
    pub fn issued(&self) -> DateTime<Utc> {
        match self {
            Claim::Attestation(a) => a.issued,
            Claim::Dispute(d) => d.issued,
            Claim::Revocation(r) => r.issued,
        }
    }
}

impl From<Attestation> for Claim {
    fn from(a: Attestation) -> Self {
        Claim::Attestation(a)
    }
}

impl From<Dispute> for Claim {
    fn from(d: Dispute) -> Self {
        Claim::Dispute(d)
    }
}

impl From<Revocation> for Claim {
    fn from(r: Revocation) -> Self {
        Claim::Revocation(r)
    }
}
