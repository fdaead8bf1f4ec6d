//! Fuzz target for claim deserialization.
//!
//! Tests that parsing arbitrary JSON as a claim is handled safely and
//! that parsed claims re-serialize losslessly.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vouch_model::Claim;

fuzz_target!(|data: &[u8]| {
    // Should succeed for well-formed claims, fail otherwise - never panic
    let Ok(claim) = serde_json::from_slice::<Claim>(data) else {
        return;
    };

    let json = serde_json::to_string(&claim).unwrap();
    let roundtrip: Claim = serde_json::from_str(&json).unwrap();
    assert_eq!(claim.id(), roundtrip.id());
    assert_eq!(claim.issuer(), roundtrip.issuer());
    assert_eq!(claim.signature(), roundtrip.signature());
});
