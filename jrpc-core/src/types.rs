//! Typed JSON-RPC 2.0 messages
//!
//! The validator and parser work on `serde_json::Value` so they can report
//! exactly which rule a message broke. Once a message has passed validation
//! it can be lifted into the types here for ergonomic access.
//!
//! # Request IDs
//!
//! The protocol allows string, number or null ids. Requests may omit the id
//! entirely (a notification) but may not use null; responses always carry an
//! id and use null when the request id could not be determined.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::{Message, Id};
//! use serde_json::json;
//!
//! let message = Message::from_value(json!({"jsonrpc": "2.0", "method": "ping", "id": 7}), None).unwrap();
//! match message {
//!     Message::Request(req) => {
//!         assert_eq!(req.method, "ping");
//!         assert_eq!(req.id, Some(Id::from(7i64)));
//!     }
//!     Message::Response(_) => unreachable!(),
//! }
//! ```

use crate::error::{ErrorObject, Result};
use crate::validate::{valid, Shape, JSONRPC_VERSION};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// JSON-RPC 2.0 message id
///
/// Serialized untagged, directly as the inner value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// String identifier
    String(String),
    /// Numeric identifier, integer or not
    Number(serde_json::Number),
    /// Null identifier, only legal in responses
    Null,
}

impl Id {
    /// Check if this is a numeric id
    pub fn is_number(&self) -> bool {
        matches!(self, Id::Number(_))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => write!(f, "\"{}\"", s),
            Id::Number(n) => write!(f, "{}", n),
            Id::Null => write!(f, "null"),
        }
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n.into())
    }
}

impl From<u64> for Id {
    fn from(n: u64) -> Self {
        Id::Number(n.into())
    }
}

impl From<Id> for Value {
    fn from(id: Id) -> Self {
        match id {
            Id::String(s) => Value::String(s),
            Id::Number(n) => Value::Number(n),
            Id::Null => Value::Null,
        }
    }
}

/// JSON-RPC 2.0 request or notification
///
/// A request without an `id` is a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,
    /// Name of the method to invoke
    pub method: String,
    /// Structured parameters, object or array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Correlation id; absent for notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
}

impl Request {
    /// Create a request expecting a response
    pub fn new(method: impl Into<String>, params: Option<Value>, id: impl Into<Id>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: Some(id.into()),
        }
    }

    /// Create a notification (no id, no response expected)
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: None,
        }
    }

    /// Check if this request is a notification
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 response
///
/// Exactly one of `result` and `error` is set. A `result` of JSON `null` is
/// still a result, so it deserializes to `Some(Value::Null)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Protocol version, always "2.0"
    pub jsonrpc: String,
    /// Successful result
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
    /// Id of the request being answered
    pub id: Id,
}

impl Response {
    /// Create a success response
    pub fn success(result: Value, id: impl Into<Id>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id: id.into(),
        }
    }

    /// Create an error response
    pub fn error(error: ErrorObject, id: impl Into<Id>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id: id.into(),
        }
    }

    /// Check if the response carries a result
    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }

    /// Check if the response carries an error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// A member that is present but null is Some(Value::Null), not None.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Any single JSON-RPC message
///
/// Serializes untagged, exactly like the inner request or response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Message {
    /// A request or notification
    Request(Request),
    /// A response
    Response(Response),
}

impl Message {
    /// Validate `value` and convert it into a typed message
    ///
    /// Validation failures come back as `Error::Rejected` with the catalog
    /// error; a validated value that still does not fit the Rust types (for
    /// example an `error` member that is not an error object) is
    /// `Error::Serialization`.
    pub fn from_value(value: Value, shape: Option<Shape>) -> Result<Message> {
        let shape = shape.unwrap_or_else(|| Shape::infer(&value));
        valid(&value, Some(shape))?;

        Ok(match shape {
            Shape::Request => Message::Request(serde_json::from_value(value)?),
            Shape::Response => Message::Response(serde_json::from_value(value)?),
        })
    }

    /// Check if this message is a request or notification
    pub fn is_request(&self) -> bool {
        matches!(self, Message::Request(_))
    }

    /// Check if this message is a response
    pub fn is_response(&self) -> bool {
        matches!(self, Message::Response(_))
    }
}

impl TryFrom<Value> for Message {
    type Error = crate::error::Error;

    fn try_from(value: Value) -> Result<Self> {
        Message::from_value(value, None)
    }
}
