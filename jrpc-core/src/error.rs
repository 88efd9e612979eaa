//! Error types for jrpc
//!
//! Two kinds of error live here:
//!
//! - **Error**: crate-level errors for the typed and strict APIs (uses thiserror)
//! - **ErrorObject**: the JSON-RPC 2.0 wire error object carried by responses
//!
//! Validation and parsing do not use `Error`. They report failures as
//! [`ErrorKind`] values inside a `Result`, so malformed input never turns into
//! a panic or an opaque error.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::{ErrorKind, ErrorObject};
//!
//! let error = ErrorObject::from(ErrorKind::MethodNotFound);
//! assert_eq!(error.code, -32601);
//! assert_eq!(error.message, "Method not found");
//! ```

use crate::registry::ErrorKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for jrpc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level error type
///
/// Returned by the typed message layer and by [`crate::format::try_request`].
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A message failed JSON-RPC validation
    #[error("Rejected message: {0}")]
    Rejected(#[from] ErrorKind),

    /// A validated message could not be converted to the requested Rust type
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Request params could not be represented as JSON
    #[error("Unserializable params: {0}")]
    UnserializableParams(String),
}

impl Error {
    /// The catalog error this maps to on the wire
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Rejected(kind) => *kind,
            Error::Serialization(_) => ErrorKind::InternalError,
            Error::UnserializableParams(_) => ErrorKind::InvalidParams,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// JSON-RPC 2.0 error object
///
/// The exact wire format of the `error` member of a response: `code` and
/// `message` are required, `data` is omitted when absent.
///
/// An `ErrorObject` is also the "entry" form accepted by
/// [`crate::format::error_response_from_entry`], which reads its code,
/// message and data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Numeric error code
    pub code: i64,

    /// Short description of the error
    pub message: String,

    /// Optional additional error information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ErrorObject {
    /// Create an error object with code and message
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create an error object carrying additional data
    ///
    /// ```rust
    /// use jrpc_core::ErrorObject;
    /// use serde_json::json;
    ///
    /// let error = ErrorObject::with_data(1001, "Insufficient funds", json!({"balance": 50}));
    /// assert_eq!(error.data.unwrap()["balance"], 50);
    /// ```
    pub fn with_data(code: i64, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// The catalog error with exactly this code, if any
    pub fn kind(&self) -> Option<ErrorKind> {
        i32::try_from(self.code).ok().and_then(ErrorKind::from_code)
    }
}

impl From<ErrorKind> for ErrorObject {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind.code() as i64, kind.message())
    }
}

impl std::fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorObject {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_from_serde() {
        let serde_error = serde_json::from_str::<serde_json::Value>(r#"{"invalid": json"#).unwrap_err();
        let error = Error::from(serde_error);

        match error {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_error_from_kind() {
        let error: Error = ErrorKind::VersionNotMatch.into();
        assert_eq!(error.kind(), ErrorKind::VersionNotMatch);
        assert!(error.to_string().contains("-32001"));
    }

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(Error::Serialization("x".into()).kind(), ErrorKind::InternalError);
        assert_eq!(Error::UnserializableParams("x".into()).kind(), ErrorKind::InvalidParams);
    }

    #[test]
    fn test_error_object_from_kind() {
        let error = ErrorObject::from(ErrorKind::InvalidResponseId);
        assert_eq!(error.code, -32050);
        assert_eq!(error.message, "Invalid Response id");
        assert!(error.data.is_none());
        assert_eq!(error.kind(), Some(ErrorKind::InvalidResponseId));
    }

    #[test]
    fn test_error_object_custom_code_has_no_kind() {
        let error = ErrorObject::new(1001, "Insufficient funds");
        assert_eq!(error.kind(), None);
    }

    #[test]
    fn test_error_object_skips_missing_data() {
        let serialized = serde_json::to_string(&ErrorObject::new(-32000, "Custom error")).unwrap();
        assert_eq!(serialized, r#"{"code":-32000,"message":"Custom error"}"#);
    }

    #[test]
    fn test_error_object_with_data_serialization() {
        let error = ErrorObject::with_data(-32602, "Invalid params", json!({"missing": ["a"]}));
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: ErrorObject = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized, error);
    }

    #[test]
    fn test_error_object_display() {
        let display = ErrorObject::from(ErrorKind::MethodNotFound).to_string();
        assert_eq!(display, "[-32601] Method not found");
    }
}
