//! Deterministic claim serialization for Ed25519 signing.
//!
//! Canonical form rules:
//! - object keys sorted lexicographically (by code point) at every level
//! - no insignificant whitespace
//! - object entries whose value is null are omitted entirely
//! - timestamps are UTC ISO 8601 with a literal `Z` suffix and second
//!   precision (the model's serde impls already render them this way)
//! - enumerated values render as their canonical string tag
//! - string escaping is ASCII-only: every character outside `0x20..=0x7e`
//!   is written as `\uXXXX` (UTF-16 surrogate pairs above the BMP)
//!
//! These rules match `json.dumps(obj, sort_keys=True, separators=(",", ":"),
//! ensure_ascii=True)`, so signatures interoperate with implementations
//! built on that encoder.

use serde_json::Value;

use vouch_model::Claim;

use crate::error::Result;

/// Key removed from the signing payload.
const SIGNATURE_KEY: &str = "signature";

/// Produce canonical bytes for an arbitrary JSON value.
#[must_use]
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    let mut out = Vec::with_capacity(256);
    write_value(value, &mut out);
    out
}

/// Canonical bytes of a claim with the signature field removed.
///
/// This is the exact payload that is signed and verified.
///
/// # Errors
///
/// Returns `CryptoError::Serialization` if the claim cannot be converted
/// to a JSON value.
pub fn signing_bytes(claim: &Claim) -> Result<Vec<u8>> {
    let mut value = serde_json::to_value(claim)?;
    if let Value::Object(map) = &mut value {
        map.remove(SIGNATURE_KEY);
    }
    Ok(canonical_bytes(&value))
}

/// Canonical bytes of the full claim, signature included.
///
/// Used for content-addressed storage of the signed document. Never used
/// as a signing payload.
///
/// # Errors
///
/// Returns `CryptoError::Serialization` if the claim cannot be converted
/// to a JSON value.
pub fn document_bytes(claim: &Claim) -> Result<Vec<u8>> {
    let value = serde_json::to_value(claim)?;
    Ok(canonical_bytes(&value))
}

fn write_value(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => {
            // Claims carry only integers; the Display fallback covers
            // any float a caller feeds through canonical_bytes directly.
            if let Some(i) = n.as_i64() {
                out.extend_from_slice(i.to_string().as_bytes());
            } else if let Some(u) = n.as_u64() {
                out.extend_from_slice(u.to_string().as_bytes());
            } else {
                out.extend_from_slice(n.to_string().as_bytes());
            }
        }
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out);
            }
            out.push(b']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, _)| k)
                .collect();
            keys.sort_unstable();
            out.push(b'{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_string(key, out);
                out.push(b':');
                write_value(&map[key.as_str()], out);
            }
            out.push(b'}');
        }
    }
}

fn write_string(s: &str, out: &mut Vec<u8>) {
    out.push(b'"');
    for c in s.chars() {
        match c {
            '"' => out.extend_from_slice(b"\\\""),
            '\\' => out.extend_from_slice(b"\\\\"),
            '\u{0008}' => out.extend_from_slice(b"\\b"),
            '\t' => out.extend_from_slice(b"\\t"),
            '\n' => out.extend_from_slice(b"\\n"),
            '\u{000c}' => out.extend_from_slice(b"\\f"),
            '\r' => out.extend_from_slice(b"\\r"),
            '\u{0020}'..='\u{007e}' => out.push(c as u8),
            other => {
                let mut units = [0u16; 2];
                for unit in other.encode_utf16(&mut units) {
                    out.extend_from_slice(format!("\\u{unit:04x}").as_bytes());
                }
            }
        }
    }
    out.push(b'"');
}
