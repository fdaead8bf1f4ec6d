//! Fuzz target for canonical JSON encoding.
//!
//! Tests that canonical bytes are stable under decode/re-encode and
//! always pure ASCII.

#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use vouch_crypto::canonical_bytes;

fuzz_target!(|data: &[u8]| {
    // Only well-formed JSON documents are interesting here
    let Ok(value) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    let first = canonical_bytes(&value);
    assert!(first.is_ascii());

    // Re-encoding the decoded canonical form must be byte-identical
    let reparsed: Value = serde_json::from_slice(&first).unwrap();
    let second = canonical_bytes(&reparsed);
    assert_eq!(first, second);
});
