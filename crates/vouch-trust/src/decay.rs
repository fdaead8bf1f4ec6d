//! Time decay of attestation weight.

use chrono::{DateTime, Utc};

/// Exponential decay: `2^(-days / half_life)`.
///
/// Measured from `issued` to `reference`. A future-dated issuance decays
/// to exactly 1.0 rather than above it.
#[must_use]
pub fn compute_decay(issued: DateTime<Utc>, reference: DateTime<Utc>, half_life_days: f64) -> f64 {
    let delta_days = (reference - issued).num_seconds() as f64 / 86_400.0;
    if delta_days < 0.0 {
        return 1.0;
    }
    (-delta_days / half_life_days).exp2()
}
