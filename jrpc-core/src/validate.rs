//! Structural validation of decoded JSON-RPC messages
//!
//! [`valid`] checks an already-decoded `serde_json::Value` against the
//! JSON-RPC 2.0 request or response shape and either hands the very same
//! value back or names the first rule it broke.
//!
//! # Check Order
//!
//! Requests:
//! 1. `method` must be a non-empty string, else `INVALID_REQUEST`
//! 2. `id`, when present, must be a string or number, else `INVALID_REQUEST`
//! 3. `params`, when present and not `null`, must be an object or array,
//!    else `INVALID_PARAMS`
//!
//! Responses:
//! 1. exactly one of `result` and `error`, else `INTERNAL_ERROR`
//! 2. `id` must be a string, number or `null`, else `INVALID_RESPONSE_ID`
//!
//! Both shapes finish with the version check: `jsonrpc` must be `"2.0"`,
//! else `VERSION_NOT_MATCH`.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::validate::{valid, Shape};
//! use jrpc_core::ErrorKind;
//! use serde_json::json;
//!
//! let request = json!({"jsonrpc": "2.0", "method": "ping", "id": 1});
//! assert!(std::ptr::eq(valid(&request, None).unwrap(), &request));
//!
//! let response = json!({"jsonrpc": "2.0", "id": 1});
//! assert_eq!(valid(&response, Some(Shape::Response)), Err(ErrorKind::InternalError));
//! ```

use crate::registry::ErrorKind;
use serde_json::Value;

/// The only protocol version this crate accepts and emits
pub const JSONRPC_VERSION: &str = "2.0";

/// Which set of shape rules a message is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Request or notification: `method`, optional `params` and `id`
    Request,
    /// Response: `id` plus exactly one of `result` and `error`
    Response,
}

impl Shape {
    /// Guess the shape of `message`: request-shaped when it has a truthy
    /// `method`, response-shaped otherwise
    pub fn infer(message: &Value) -> Shape {
        match message.get("method") {
            Some(method) if is_truthy(method) => Shape::Request,
            _ => Shape::Response,
        }
    }
}

/// Outcome of validating a single message
pub type Outcome<T> = std::result::Result<T, ErrorKind>;

/// Validate one decoded message
///
/// When `shape` is `None` it is inferred with [`Shape::infer`]. On success the
/// same reference is returned, never a copy. A value that is not a JSON
/// object is always `INVALID_REQUEST`.
pub fn valid(message: &Value, shape: Option<Shape>) -> Outcome<&Value> {
    let Some(object) = message.as_object() else {
        return Err(ErrorKind::InvalidRequest);
    };

    match shape.unwrap_or_else(|| Shape::infer(message)) {
        Shape::Request => {
            match object.get("method") {
                Some(Value::String(method)) if !method.is_empty() => {}
                _ => return Err(ErrorKind::InvalidRequest),
            }
            match object.get("id") {
                None | Some(Value::String(_)) | Some(Value::Number(_)) => {}
                Some(_) => return Err(ErrorKind::InvalidRequest),
            }
            match object.get("params") {
                None | Some(Value::Null) | Some(Value::Object(_)) | Some(Value::Array(_)) => {}
                Some(_) => return Err(ErrorKind::InvalidParams),
            }
        }
        Shape::Response => {
            let has_result = object.contains_key("result");
            let has_error = object.get("error").is_some_and(is_truthy);
            if has_result == has_error {
                return Err(ErrorKind::InternalError);
            }
            match object.get("id") {
                Some(Value::String(_)) | Some(Value::Number(_)) | Some(Value::Null) => {}
                _ => return Err(ErrorKind::InvalidResponseId),
            }
        }
    }

    match object.get("jsonrpc") {
        Some(Value::String(version)) if version == JSONRPC_VERSION => Ok(message),
        _ => Err(ErrorKind::VersionNotMatch),
    }
}

/// JavaScript-style truthiness of a JSON value
///
/// `null`, `false`, `0` and `""` are falsy. Every object and array is truthy,
/// empty ones included.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
