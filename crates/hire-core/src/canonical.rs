//! # Canonical Serialization: JCS Byte Production
//!
//! `CanonicalBytes` is the only input accepted by [`crate::sha256_digest`].
//! Journal records are hashed through it so the digest chain does not
//! depend on field order, whitespace, or serializer version.
//!
//! Rules applied before RFC 8785 (JCS) serialization:
//!
//! 1. Floats are rejected. Ledger values are integers and strings.
//! 2. Object keys are strings (guaranteed by `serde_json::Map`).
//! 3. Arrays and objects are recursed.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization.
///
/// The inner vector is private; `CanonicalBytes::new()` is the sole
/// constructor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// # Errors
    ///
    /// `FloatRejected` if the value contains a non-integer number;
    /// `SerializationFailed` if serde cannot represent it as JSON.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let checked = reject_floats(value)?;
        let s = serde_jcs::to_string(&checked)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn reject_floats(value: Value) -> Result<Value, CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(value),
        Value::Number(ref n) => {
            if n.is_f64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(value)
        }
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                out.insert(k, reject_floats(v)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(arr) => {
            let items: Result<Vec<_>, _> = arr.into_iter().map(reject_floats).collect();
            Ok(Value::Array(items?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_keys_compact() {
        let data = serde_json::json!({"seq": 2, "caller": "0xab", "entry": {"op": "close_job", "job_id": 1}});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(
            std::str::from_utf8(cb.as_bytes()).unwrap(),
            r#"{"caller":"0xab","entry":{"job_id":1,"op":"close_job"},"seq":2}"#
        );
    }

    #[test]
    fn test_float_rejected_anywhere() {
        assert!(CanonicalBytes::new(&serde_json::json!({"a": 1.5})).is_err());
        assert!(CanonicalBytes::new(&serde_json::json!({"a": [{"b": 0.25}]})).is_err());
        match CanonicalBytes::new(&serde_json::json!(2.5)) {
            Err(CanonicalizationError::FloatRejected(f)) => assert_eq!(f, 2.5),
            other => panic!("expected FloatRejected, got {other:?}"),
        }
    }

    #[test]
    fn test_integers_and_unicode_pass() {
        let cb = CanonicalBytes::new(&serde_json::json!({"n": -42, "name": "Zoë"})).unwrap();
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(s, "{\"n\":-42,\"name\":\"Zoë\"}");
        assert!(!cb.is_empty());
    }
}
