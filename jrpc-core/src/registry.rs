//! Error code catalog for jrpc
//!
//! Every failure this crate reports is drawn from a fixed catalog of nine
//! named JSON-RPC errors. The catalog is a static table; the reverse index
//! from integer code to entry is derived from it once, on first use, and is
//! read-only afterwards.
//!
//! # Reserved Code Space
//!
//! JSON-RPC 2.0 reserves `-32768..=-32000` for the protocol. Within that,
//! `-32099..=-32000` is the implementation-defined "server error" range.
//! [`valid_code`] keeps any code from the catalog or from the server error
//! range, and collapses everything else to `UNKNOWN_ERROR` (-32000).
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::registry::{valid_code, ErrorKind};
//!
//! assert_eq!(valid_code(-32700), -32700);
//! assert_eq!(valid_code(-32080), -32080);
//! assert_eq!(valid_code(12345), ErrorKind::UnknownError.code());
//!
//! assert_eq!(ErrorKind::from_code(-32050), Some(ErrorKind::InvalidResponseId));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Lower bound of the implementation-defined server error range
pub const SERVER_ERROR_MIN: i32 = -32099;

/// Upper bound of the implementation-defined server error range
pub const SERVER_ERROR_MAX: i32 = -32000;

/// A named error from the catalog
///
/// Each variant maps to exactly one [`ErrorCatalogEntry`]. `ErrorKind` is the
/// error half of every validation outcome, so it is `Copy` and implements
/// `std::error::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid JSON was received (-32700)
    ParseError,
    /// The JSON is not a valid request object (-32600)
    InvalidRequest,
    /// The method does not exist (-32601)
    MethodNotFound,
    /// Invalid method parameters (-32602)
    InvalidParams,
    /// Internal JSON-RPC error (-32603)
    InternalError,
    /// Catch-all for codes outside the catalog (-32000)
    UnknownError,
    /// The `jsonrpc` member is missing or not "2.0" (-32001)
    VersionNotMatch,
    /// A response carries an id of the wrong type (-32050)
    InvalidResponseId,
    /// A call timed out; raised by transports, never by this crate (-32051)
    TimeOut,
}

/// One row of the error catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCatalogEntry {
    /// Upper snake case name, e.g. `PARSE_ERROR`
    pub name: &'static str,
    /// Integer error code
    pub code: i32,
    /// Default human readable message
    pub message: &'static str,
}

/// The error catalog, in declaration order
pub static CATALOG: [ErrorCatalogEntry; 9] = [
    ErrorCatalogEntry { name: "PARSE_ERROR", code: -32700, message: "Parse error" },
    ErrorCatalogEntry { name: "INVALID_REQUEST", code: -32600, message: "Invalid Request" },
    ErrorCatalogEntry { name: "METHOD_NOT_FOUND", code: -32601, message: "Method not found" },
    ErrorCatalogEntry { name: "INVALID_PARAMS", code: -32602, message: "Invalid params" },
    ErrorCatalogEntry { name: "INTERNAL_ERROR", code: -32603, message: "Internal error" },
    ErrorCatalogEntry { name: "UNKNOWN_ERROR", code: -32000, message: "Unknown error" },
    ErrorCatalogEntry { name: "VERSION_NOT_MATCH", code: -32001, message: "Only support version 2.0" },
    ErrorCatalogEntry { name: "INVALID_RESPONSE_ID", code: -32050, message: "Invalid Response id" },
    ErrorCatalogEntry { name: "TIME_OUT", code: -32051, message: "Time out" },
];

const KINDS: [ErrorKind; 9] = [
    ErrorKind::ParseError,
    ErrorKind::InvalidRequest,
    ErrorKind::MethodNotFound,
    ErrorKind::InvalidParams,
    ErrorKind::InternalError,
    ErrorKind::UnknownError,
    ErrorKind::VersionNotMatch,
    ErrorKind::InvalidResponseId,
    ErrorKind::TimeOut,
];

// Code -> kind, derived from CATALOG exactly once.
static ERROR_INDEX: LazyLock<HashMap<i32, ErrorKind>> = LazyLock::new(|| {
    CATALOG
        .iter()
        .zip(KINDS)
        .map(|(entry, kind)| (entry.code, kind))
        .collect()
});

impl ErrorKind {
    /// All catalog errors, in catalog order
    pub fn all() -> &'static [ErrorKind] {
        &KINDS
    }

    /// Look up the catalog error with exactly this code
    pub fn from_code(code: i32) -> Option<ErrorKind> {
        ERROR_INDEX.get(&code).copied()
    }

    /// The catalog row for this error
    pub fn entry(self) -> &'static ErrorCatalogEntry {
        &CATALOG[self as usize]
    }

    /// Integer wire code
    pub fn code(self) -> i32 {
        self.entry().code
    }

    /// Default message from the catalog
    pub fn message(self) -> &'static str {
        self.entry().message
    }

    /// Catalog name, e.g. `INVALID_REQUEST`
    pub fn name(self) -> &'static str {
        self.entry().name
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for ErrorKind {}

impl From<ErrorKind> for i32 {
    fn from(kind: ErrorKind) -> Self {
        kind.code()
    }
}

/// Whether `code` lies in the implementation-defined server error range
pub fn is_reserved(code: i64) -> bool {
    (SERVER_ERROR_MIN as i64..=SERVER_ERROR_MAX as i64).contains(&code)
}

/// Normalize an arbitrary error code into one this crate will emit
///
/// Catalog codes and codes in `-32099..=-32000` are returned unchanged.
/// Anything else becomes `UNKNOWN_ERROR` (-32000). This never fails.
pub fn valid_code(code: i64) -> i32 {
    match i32::try_from(code) {
        Ok(code) if ErrorKind::from_code(code).is_some() => code,
        Ok(code) if is_reserved(code as i64) => code,
        _ => ErrorKind::UnknownError.code(),
    }
}

/// Catalog message for `code`, or `UNKNOWN_ERROR`'s message when the code
/// has no catalog entry
pub fn message_for(code: i32) -> &'static str {
    ErrorKind::from_code(code)
        .unwrap_or(ErrorKind::UnknownError)
        .message()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_codes() {
        let expected = [
            (ErrorKind::ParseError, -32700),
            (ErrorKind::InvalidRequest, -32600),
            (ErrorKind::MethodNotFound, -32601),
            (ErrorKind::InvalidParams, -32602),
            (ErrorKind::InternalError, -32603),
            (ErrorKind::UnknownError, -32000),
            (ErrorKind::VersionNotMatch, -32001),
            (ErrorKind::InvalidResponseId, -32050),
            (ErrorKind::TimeOut, -32051),
        ];

        for (kind, code) in expected {
            assert_eq!(kind.code(), code);
            assert!(!kind.message().is_empty());
        }
    }

    #[test]
    fn test_index_matches_catalog() {
        for kind in ErrorKind::all() {
            assert_eq!(ErrorKind::from_code(kind.code()), Some(*kind));
        }
        assert_eq!(ErrorKind::from_code(-32080), None);
        assert_eq!(ErrorKind::from_code(0), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(ErrorKind::ParseError.name(), "PARSE_ERROR");
        assert_eq!(ErrorKind::InvalidResponseId.name(), "INVALID_RESPONSE_ID");
        assert_eq!(ErrorKind::TimeOut.name(), "TIME_OUT");
    }

    #[test]
    fn test_valid_code_catalog_match() {
        assert_eq!(valid_code(-32700), -32700);
        assert_eq!(valid_code(-32050), -32050);
        assert_eq!(valid_code(-32601), -32601);
    }

    #[test]
    fn test_valid_code_reserved_range() {
        assert_eq!(valid_code(-32080), -32080);
        assert_eq!(valid_code(-32099), -32099);
        assert_eq!(valid_code(-32000), -32000);
    }

    #[test]
    fn test_valid_code_out_of_range() {
        assert_eq!(valid_code(12345), -32000);
        assert_eq!(valid_code(-32100), -32000);
        assert_eq!(valid_code(-31999), -32000);
        assert_eq!(valid_code(0), -32000);
        assert_eq!(valid_code(i64::MIN), -32000);
    }

    #[test]
    fn test_message_for() {
        assert_eq!(message_for(-32601), "Method not found");
        assert_eq!(message_for(-32080), "Unknown error");
    }

    #[test]
    fn test_display() {
        let display = ErrorKind::VersionNotMatch.to_string();
        assert!(display.contains("-32001"));
        assert!(display.contains("version 2.0"));
    }
}
