//! Property-based tests for canonical serialization.
//!
//! These verify the properties the signing contract depends on:
//!
//! - Determinism (same value, same bytes)
//! - Key-order independence (insertion order never leaks into output)
//! - Idempotence (re-encoding a decoded canonical document is stable)
//! - ASCII-only output regardless of input strings

use proptest::prelude::*;
use serde_json::{Map, Value};

use crate::canonical::canonical_bytes;

fn arb_json(depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        ".{0,40}".prop_map(Value::String),
    ];
    leaf.prop_recursive(depth, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,12}", inner, 0..6).prop_map(|m| {
                Value::Object(m.into_iter().collect::<Map<String, Value>>())
            }),
        ]
    })
}

proptest! {
    /// Encoding the same value twice yields identical bytes.
    #[test]
    fn encoding_is_deterministic(value in arb_json(3)) {
        prop_assert_eq!(canonical_bytes(&value), canonical_bytes(&value));
    }

    /// Key insertion order never affects the output.
    #[test]
    fn encoding_is_order_independent(
        entries in prop::collection::vec(("[a-z_]{1,12}", any::<i64>()), 0..8)
    ) {
        let forward: Map<String, Value> = entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::Number((*v).into())))
            .collect();
        let reverse: Map<String, Value> = entries
            .iter()
            .rev()
            .map(|(k, v)| (k.clone(), Value::Number((*v).into())))
            .collect();
        prop_assert_eq!(
            canonical_bytes(&Value::Object(forward)),
            canonical_bytes(&Value::Object(reverse))
        );
    }

    /// Re-encoding a decoded canonical document yields the same bytes.
    #[test]
    fn encoding_is_idempotent(value in arb_json(3)) {
        let first = canonical_bytes(&value);
        let reparsed: Value = serde_json::from_slice(&first).unwrap();
        let second = canonical_bytes(&reparsed);
        prop_assert_eq!(first, second);
    }

    /// Output is pure ASCII for arbitrary input strings.
    #[test]
    fn output_is_ascii(s in ".{0,60}") {
        let bytes = canonical_bytes(&Value::String(s));
        prop_assert!(bytes.is_ascii());
    }
}
