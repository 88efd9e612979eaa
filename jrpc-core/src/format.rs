//! Building JSON-RPC 2.0 envelopes as text
//!
//! Every function here returns serialized JSON ready for a transport. None of
//! them fail: malformed inputs degrade to a well-formed envelope (for example
//! a non-numeric response id turns a success response into an
//! `INVALID_RESPONSE_ID` error response).
//!
//! # Error Responses
//!
//! Error envelopes come from two entry points sharing one builder:
//!
//! - [`error_response_from_code`]: a bare code plus optional message
//! - [`error_response_from_entry`]: an [`ErrorObject`] carrying its own code,
//!   message and data (catalog errors convert into one with `.into()`)
//!
//! Codes are normalized with [`crate::registry::valid_code`]. The id is
//! forced to `null` when it is not a number, and always for `PARSE_ERROR`
//! and `INVALID_REQUEST`, since those failures happen before a request id
//! can be trusted.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::format;
//! use serde_json::{json, Value};
//!
//! let text = format::request("sum", &json!([1, 2]), Some(7));
//! let value: Value = serde_json::from_str(&text).unwrap();
//! assert_eq!(value, json!({"jsonrpc": "2.0", "method": "sum", "params": [1, 2], "id": 7}));
//!
//! let text = format::response(json!(42), &json!("x"));
//! let value: Value = serde_json::from_str(&text).unwrap();
//! assert_eq!(value["error"]["code"], -32050);
//! assert_eq!(value["error"]["data"], 42);
//! ```

use crate::error::{Error, ErrorObject, Result};
use crate::finite;
use crate::registry::{message_for, valid_code, ErrorKind};
use crate::validate::{is_truthy, JSONRPC_VERSION};
use serde::Serialize;
use serde_json::{json, Value};

/// Stamp the protocol version onto `message` and serialize it
///
/// An object without a truthy `jsonrpc` member gets `"jsonrpc": "2.0"`; an
/// existing value is never overwritten. Non-object values are serialized
/// unchanged.
pub fn format(mut message: Value) -> String {
    if let Value::Object(object) = &mut message {
        if !object.get("jsonrpc").is_some_and(is_truthy) {
            object.insert("jsonrpc".to_string(), Value::String(JSONRPC_VERSION.to_string()));
        }
    }

    let text = message.to_string();
    tracing::trace!(envelope = %text, "Formatted envelope");
    text
}

/// Build a success response
///
/// `id` must be a number. Any other id produces an `INVALID_RESPONSE_ID`
/// error response instead, carrying `result` as its `data`.
pub fn response(result: Value, id: &Value) -> String {
    if id.is_number() {
        return format(json!({ "id": id, "result": result }));
    }

    tracing::debug!(id = %id, "Non-numeric response id, emitting error response");
    error_response_from_entry(&ErrorKind::InvalidResponseId.into(), &Value::Null, Some(result))
}

/// Build an error response from a bare code
///
/// `message` falls back to the catalog message for the normalized code when
/// it is `None` or empty.
pub fn error_response_from_code(
    code: i64,
    message: Option<&str>,
    id: &Value,
    data: Option<Value>,
) -> String {
    build_error_response(code, message, id, data)
}

/// Build an error response from an error object
///
/// `data` takes precedence over `entry.data` when it is truthy.
pub fn error_response_from_entry(entry: &ErrorObject, id: &Value, data: Option<Value>) -> String {
    let data = data
        .filter(|data| is_truthy(data))
        .or_else(|| entry.data.clone());
    build_error_response(entry.code, Some(&entry.message), id, data)
}

fn build_error_response(code: i64, message: Option<&str>, id: &Value, data: Option<Value>) -> String {
    let code = valid_code(code);
    let message = match message {
        Some(message) if !message.is_empty() => message,
        _ => message_for(code),
    };

    let mut error = json!({ "code": code, "message": message });
    if let Some(data) = data.filter(|data| is_truthy(data)) {
        error["data"] = data;
    }

    let id_forbidden = code == ErrorKind::InvalidRequest.code() || code == ErrorKind::ParseError.code();
    let id = if id.is_number() && !id_forbidden {
        id.clone()
    } else {
        Value::Null
    };

    format(json!({ "id": id, "error": error }))
}

/// Check that request params can be represented as JSON
///
/// Params are rejected with `Error::UnserializableParams` when they hold a
/// NaN or infinite float at any depth (serde_json would write those as
/// `null`), or when conversion fails outright, such as a map with
/// non-string keys or a `Serialize` impl that errors.
pub fn sanitize_params<P: Serialize + ?Sized>(params: &P) -> Result<Value> {
    finite::check(params).map_err(|e| Error::UnserializableParams(e.to_string()))?;
    serde_json::to_value(params).map_err(|e| Error::UnserializableParams(e.to_string()))
}

/// Coerce a loosely typed id into a request id
///
/// Integers pass through, other numbers are truncated toward zero, and
/// strings are read by their leading integer (`"12abc"` is 12). Anything
/// else, including a string without leading digits, is `None`.
pub fn coerce_request_id(id: &Value) -> Option<i64> {
    match id {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => leading_integer(s),
        _ => None,
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let digits_start = usize::from(text.starts_with(['-', '+']));
    let digits_end = text[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(text.len(), |offset| digits_start + offset);
    text[..digits_end].parse().ok()
}

// Numbers are wrapped, everything falsy becomes an empty array.
fn normalize_params(params: Value) -> Value {
    match params {
        Value::Number(_) => Value::Array(vec![params]),
        params if is_truthy(&params) => params,
        _ => Value::Array(Vec::new()),
    }
}

fn build_request(method: &str, params: Value, id: Option<i64>) -> String {
    let mut request = json!({ "method": method, "params": normalize_params(params) });
    if let Some(id) = id.filter(|id| *id != 0) {
        request["id"] = Value::from(id);
    }
    format(request)
}

/// Build a request envelope
///
/// `params` that fail [`sanitize_params`] are dropped with a warning and
/// treated as absent. A numeric `params` is wrapped in a one-element array;
/// absent or falsy `params` become `[]`. An `id` of `None` or `Some(0)`
/// produces a notification.
///
/// Ids are integers only. String or fractional ids coming from elsewhere
/// can be converted first with [`coerce_request_id`].
pub fn request<P: Serialize + ?Sized>(method: &str, params: &P, id: Option<i64>) -> String {
    let params = sanitize_params(params).unwrap_or_else(|e| {
        tracing::warn!(method = %method, error = %e, "Dropping unserializable params");
        Value::Null
    });
    build_request(method, params, id)
}

/// Build a request envelope, failing on unserializable params
///
/// Same as [`request`] except that params which cannot be represented as
/// JSON are an error instead of being dropped.
pub fn try_request<P: Serialize + ?Sized>(method: &str, params: &P, id: Option<i64>) -> Result<String> {
    let params = sanitize_params(params)?;
    Ok(build_request(method, params, id))
}

/// Build a batch of request envelopes
///
/// Each `(method, params, id)` call goes through [`request`] and the texts are
/// joined into a JSON array.
pub fn request_batch<I, M, P>(calls: I) -> String
where
    I: IntoIterator<Item = (M, P, Option<i64>)>,
    M: AsRef<str>,
    P: Serialize,
{
    let items: Vec<String> = calls
        .into_iter()
        .map(|(method, params, id)| request(method.as_ref(), &params, id))
        .collect();
    format!("[{}]", items.join(","))
}
