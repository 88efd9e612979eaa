//! Core JSON-RPC 2.0 message processing for jrpc
//!
//! This crate implements the message-level contract of JSON-RPC 2.0 and
//! nothing else. It includes:
//!
//! - **Registry**: the fixed catalog of protocol errors and code normalization
//! - **Validation**: request/response shape rules over decoded JSON values
//! - **Codec**: raw text to validated message(s), single or batch
//! - **Formatting**: request, response, error and batch envelopes as text
//! - **Types**: typed requests, responses and ids for validated messages
//! - **Observability**: tracing subscriber and OpenTelemetry setup
//!
//! # Architecture
//!
//! The crate is transport-agnostic. A transport hands it text or decoded
//! values and gets back either the accepted message or a catalog error code;
//! in the other direction it gets serialized envelopes ready to send. No
//! operation panics or returns a Rust error for malformed input: failures are
//! values ([`ErrorKind`]) the caller branches on.
//!
//! # Example
//!
//! ```rust
//! use jrpc_core::{codec, format, ErrorKind, Parsed};
//! use serde_json::json;
//!
//! // Incoming text
//! match codec::parse(r#"{"jsonrpc":"2.0","method":"sum","params":[1,2],"id":1}"#, None) {
//!     Parsed::Single(Ok(request)) => {
//!         let sum: i64 = request["params"].as_array().unwrap().iter().filter_map(|v| v.as_i64()).sum();
//!         let reply = format::response(json!(sum), &request["id"]);
//!         assert!(reply.contains("\"result\":3"));
//!     }
//!     Parsed::Single(Err(kind)) => {
//!         let reply = format::error_response_from_entry(&kind.into(), &json!(null), None);
//!         assert!(reply.contains(&kind.code().to_string()));
//!     }
//!     Parsed::Batch(_) => unreachable!(),
//! }
//!
//! // Broken text
//! assert_eq!(codec::parse("{", None), Parsed::Single(Err(ErrorKind::ParseError)));
//! ```

pub mod codec;
pub mod error;
mod finite;
pub mod format;
pub mod metrics;
pub mod observability;
pub mod processor;
pub mod registry;
pub mod types;
pub mod validate;

pub use codec::{parse, Parsed};
pub use error::{Error, ErrorObject, Result};
pub use metrics::ProcessorMetrics;
pub use observability::{init_observability, shutdown_observability, ObservabilityConfig};
pub use processor::{MessageProcessor, ProcessorConfig};
pub use registry::{valid_code, ErrorCatalogEntry, ErrorKind, CATALOG};
pub use types::{Id, Message, Request, Response};
pub use validate::{valid, Outcome, Shape, JSONRPC_VERSION};
