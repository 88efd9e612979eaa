//! JRPC - JSON-RPC 2.0 messages
//!
//! This is the convenience crate re-exporting `jrpc-core`. Use it for a
//! single dependency covering validation, parsing and envelope formatting.
//!
//! # Quick Start - Incoming
//!
//! ```rust
//! use jrpc::{MessageProcessor, Parsed, Shape};
//!
//! let processor = MessageProcessor::default();
//! let raw = r#"[{"jsonrpc":"2.0","method":"a","id":1},{"jsonrpc":"2.0"}]"#;
//!
//! if let Parsed::Batch(outcomes) = processor.parse(raw, Some(Shape::Request)) {
//!     assert!(outcomes[0].is_ok());
//!     assert_eq!(outcomes[1], Err(jrpc::ErrorKind::InvalidRequest));
//! }
//! ```
//!
//! # Quick Start - Outgoing
//!
//! ```rust
//! use jrpc::MessageProcessor;
//! use serde_json::json;
//!
//! let processor = MessageProcessor::default();
//! let batch = processor.request_batch(vec![
//!     ("sum", json!([1, 2]), Some(1)),
//!     ("log", json!({"line": "hi"}), None),
//! ]);
//! assert!(batch.starts_with('['));
//! ```
//!
//! The free functions of the core crate are available at the root too:
//!
//! ```rust
//! use serde_json::json;
//!
//! assert_eq!(jrpc::valid_code(-32080), -32080);
//! assert_eq!(jrpc::valid_code(12345), -32000);
//!
//! let request = json!({"jsonrpc": jrpc::JSONRPC_VERSION, "method": "ping", "params": null});
//! assert!(jrpc::valid(&request, None).is_ok());
//! ```

// Re-export the core crate as a module and its common types at the root
pub use jrpc_core as core;

pub use jrpc_core::{
    codec, error, format, metrics, observability, processor, registry, types, validate,
};

pub use jrpc_core::{
    init_observability, parse, shutdown_observability, valid, valid_code, Error,
    ErrorCatalogEntry, ErrorKind, ErrorObject, Id, Message, MessageProcessor, ObservabilityConfig,
    Outcome, Parsed, ProcessorConfig, ProcessorMetrics, Request, Response, Result, Shape, CATALOG,
    JSONRPC_VERSION,
};
