//! Canonical JSON serialization and content hashing
//!
//! Orphan ids and score ids are both content addresses. They must not depend
//! on map insertion order or on whether a number arrived as `100` or `100.0`,
//! so every hash goes through [`canonical_json`] first.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Render `value` as compact JSON with recursively sorted object keys.
///
/// Floats with no fractional part are written as integers.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                out.push_str(&n.to_string());
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < 9.0e15 {
                    out.push_str(&(f as i64).to_string());
                } else {
                    out.push_str(&n.to_string());
                }
            }
        }
        Value::String(s) => out.push_str(&Value::String(s.clone()).to_string()),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
    }
}

/// `prefix` followed by the hex SHA-256 of the canonical form of `value`
pub fn content_hash(prefix: &str, value: &Value) -> String {
    let digest = Sha256::digest(canonical_json(value).as_bytes());
    format!("{}{:x}", prefix, digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_order_does_not_matter() {
        let a: Value = serde_json::from_str(r#"{"b":1,"a":{"y":2,"x":[3,{"q":1,"p":2}]}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a":{"x":[3,{"p":2,"q":1}],"y":2},"b":1}"#).unwrap();
        assert_eq!(canonical_json(&a), canonical_json(&b));
        assert_eq!(canonical_json(&a), r#"{"a":{"x":[3,{"p":2,"q":1}],"y":2},"b":1}"#);
    }

    #[test]
    fn test_integral_floats_written_as_integers() {
        assert_eq!(canonical_json(&json!(100.0)), "100");
        assert_eq!(canonical_json(&json!(100)), "100");
        assert_eq!(canonical_json(&json!(99.5)), "99.5");
        assert_eq!(canonical_json(&json!(-3.0)), "-3");
    }

    #[test]
    fn test_content_hash_shape() {
        let id = content_hash("O", &json!({"a": 1}));
        assert!(id.starts_with('O'));
        assert_eq!(id.len(), 65);
        assert_eq!(id, content_hash("O", &json!({"a": 1.0})));
        assert_ne!(id, content_hash("O", &json!({"a": 2})));
    }

    #[test]
    fn test_strings_are_escaped() {
        assert_eq!(canonical_json(&json!("a\"b")), r#""a\"b""#);
        assert_eq!(canonical_json(&json!([null, true, "é"])), r#"[null,true,"é"]"#);
    }
}
