//! Fuzz target for PublicKey::parse.
//!
//! Tests that parsing arbitrary strings as public keys is handled safely.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vouch_model::PublicKey;

fuzz_target!(|data: &str| {
    // Should succeed for canonical ed25519:<hex> strings, fail otherwise -
    // never panic
    let result = PublicKey::parse(data);

    // If successful, verify canonical roundtrip
    if let Ok(key) = result {
        let canonical = key.to_string();
        let roundtrip = PublicKey::parse(&canonical).unwrap();
        assert_eq!(key, roundtrip);
        assert_eq!(canonical.len(), "ed25519:".len() + 64);
    }
});
