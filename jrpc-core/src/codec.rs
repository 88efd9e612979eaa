//! Decoding raw JSON-RPC text into validated messages
//!
//! [`parse`] is the entry point for incoming text. It decodes the payload,
//! tells a single message from a batch, and runs every message through
//! [`crate::validate::valid`].
//!
//! # Batch Messages
//!
//! A JSON array is a batch. Each element is validated on its own and the
//! outcomes keep the input order, so a batch may mix accepted messages and
//! error codes. An empty array is not an empty batch: it is rejected as a
//! whole with `INVALID_REQUEST`.
//!
//! # Error Handling
//!
//! Nothing here panics or returns a Rust error for bad input:
//! - undecodable text → `PARSE_ERROR` (-32700)
//! - empty batch → `INVALID_REQUEST` (-32600)
//! - shape violations → whatever [`crate::validate::valid`] reports
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::codec::{parse, Parsed};
//! use jrpc_core::ErrorKind;
//!
//! let parsed = parse(r#"{"jsonrpc":"2.0","method":"ping","id":1}"#, None);
//! assert!(matches!(parsed, Parsed::Single(Ok(_))));
//!
//! assert_eq!(parse("not json", None), Parsed::Single(Err(ErrorKind::ParseError)));
//! assert_eq!(parse("[]", None), Parsed::Single(Err(ErrorKind::InvalidRequest)));
//! ```

use crate::registry::ErrorKind;
use crate::validate::{valid, Outcome, Shape};
use serde_json::Value;

/// Result of parsing one payload
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// A single message, or a failure that applies to the whole payload
    Single(Outcome<Value>),
    /// One outcome per batch element, in input order
    Batch(Vec<Outcome<Value>>),
}

impl Parsed {
    /// Check if the payload was a (non-empty) batch
    pub fn is_batch(&self) -> bool {
        matches!(self, Parsed::Batch(_))
    }

    /// Flatten into a list of outcomes; a single outcome becomes a list of one
    pub fn into_outcomes(self) -> Vec<Outcome<Value>> {
        match self {
            Parsed::Single(outcome) => vec![outcome],
            Parsed::Batch(outcomes) => outcomes,
        }
    }
}

/// Decode raw text into a JSON value
///
/// Any decode failure maps to `PARSE_ERROR`.
pub fn decode(raw: &str) -> Outcome<Value> {
    serde_json::from_str(raw).map_err(|e| {
        tracing::debug!(error = %e, "Failed to decode JSON-RPC payload");
        ErrorKind::ParseError
    })
}

/// Validate a decoded value, keeping ownership of it
pub fn validate_owned(message: Value, shape: Option<Shape>) -> Outcome<Value> {
    match valid(&message, shape) {
        Ok(_) => Ok(message),
        Err(kind) => {
            tracing::debug!(code = kind.code(), reason = kind.name(), "Rejected JSON-RPC message");
            Err(kind)
        }
    }
}

/// Validate every element of a decoded batch, preserving order
///
/// Returns `INVALID_REQUEST` for an empty batch.
pub fn validate_batch(items: Vec<Value>, shape: Option<Shape>) -> Parsed {
    if items.is_empty() {
        tracing::debug!("Rejected empty batch");
        return Parsed::Single(Err(ErrorKind::InvalidRequest));
    }

    Parsed::Batch(
        items
            .into_iter()
            .map(|item| validate_owned(item, shape))
            .collect(),
    )
}

/// Parse raw text into validated message(s)
///
/// `shape` forces request or response rules for every message; `None` infers
/// the shape per message.
pub fn parse(raw: &str, shape: Option<Shape>) -> Parsed {
    match decode(raw) {
        Ok(Value::Array(items)) => validate_batch(items, shape),
        Ok(message) => Parsed::Single(validate_owned(message, shape)),
        Err(kind) => Parsed::Single(Err(kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_single_request() {
        let parsed = parse(r#"{"jsonrpc":"2.0","method":"test","id":1}"#, None);
        assert_eq!(
            parsed,
            Parsed::Single(Ok(json!({"jsonrpc": "2.0", "method": "test", "id": 1})))
        );
    }

    #[test]
    fn test_parse_invalid_json() {
        assert_eq!(parse("not json", None), Parsed::Single(Err(ErrorKind::ParseError)));
        assert_eq!(parse("", None), Parsed::Single(Err(ErrorKind::ParseError)));
        assert_eq!(parse(r#"{"jsonrpc":"2.0""#, None), Parsed::Single(Err(ErrorKind::ParseError)));
    }

    #[test]
    fn test_parse_empty_batch() {
        let parsed = parse("[]", None);
        assert_eq!(parsed, Parsed::Single(Err(ErrorKind::InvalidRequest)));
        assert!(!parsed.is_batch());
    }

    #[test]
    fn test_parse_mixed_batch() {
        let parsed = parse(r#"[{"jsonrpc":"2.0","method":"a"},{"jsonrpc":"2.0"}]"#, Some(Shape::Request));

        match parsed {
            Parsed::Batch(outcomes) => {
                assert_eq!(outcomes.len(), 2);
                assert_eq!(outcomes[0], Ok(json!({"jsonrpc": "2.0", "method": "a"})));
                assert_eq!(outcomes[1], Err(ErrorKind::InvalidRequest));
            }
            _ => panic!("Expected batch"),
        }
    }

    #[test]
    fn test_parse_batch_preserves_order() {
        let raw = r#"[
            {"jsonrpc":"2.0","result":1,"id":1},
            {"jsonrpc":"2.0","method":"notify"},
            5,
            {"jsonrpc":"1.0","method":"old","id":3}
        ]"#;

        let outcomes = parse(raw, None).into_outcomes();
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0].as_ref().unwrap()["result"], 1);
        assert_eq!(outcomes[1].as_ref().unwrap()["method"], "notify");
        assert_eq!(outcomes[2], Err(ErrorKind::InvalidRequest));
        assert_eq!(outcomes[3], Err(ErrorKind::VersionNotMatch));
    }

    #[test]
    fn test_parse_scalar_payload() {
        assert_eq!(parse("42", None), Parsed::Single(Err(ErrorKind::InvalidRequest)));
    }

    #[test]
    fn test_into_outcomes_single() {
        let outcomes = parse("nope", None).into_outcomes();
        assert_eq!(outcomes, vec![Err(ErrorKind::ParseError)]);
    }

    #[test]
    fn test_validate_batch_empty() {
        assert_eq!(validate_batch(Vec::new(), None), Parsed::Single(Err(ErrorKind::InvalidRequest)));
    }
}
