//! Configurable message processor
//!
//! [`MessageProcessor`] bundles the validator, parser, registry and formatter
//! behind one value that carries configuration and optional metrics. The free
//! functions in [`crate::validate`], [`crate::codec`] and [`crate::format`]
//! behave like a processor built with `ProcessorConfig::default()` and no
//! metrics.
//!
//! # Batch Size Limit
//!
//! Batches are unlimited by default. With `max_batch_size` set, a batch with
//! more elements than the limit is rejected as a whole with
//! `INVALID_REQUEST`, before any element is validated.
//!
//! # Examples
//!
//! ```rust
//! use jrpc_core::{MessageProcessor, ProcessorConfig, Parsed, ErrorKind};
//!
//! let processor = MessageProcessor::new(ProcessorConfig::new().with_max_batch_size(2));
//!
//! let raw = r#"[{"jsonrpc":"2.0","method":"a"},{"jsonrpc":"2.0","method":"b"},{"jsonrpc":"2.0","method":"c"}]"#;
//! assert_eq!(processor.parse(raw, None), Parsed::Single(Err(ErrorKind::InvalidRequest)));
//! ```

use crate::codec::{self, Parsed};
use crate::error::{ErrorObject, Result};
use crate::format;
use crate::metrics::ProcessorMetrics;
use crate::registry::{self, ErrorKind};
use crate::validate::{self, Outcome, Shape};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Configuration for a [`MessageProcessor`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Largest batch accepted by `parse`; `None` means unlimited
    pub max_batch_size: Option<usize>,
    /// Shape used when a call does not name one; `None` infers per message
    pub default_shape: Option<Shape>,
}

impl ProcessorConfig {
    /// Create a configuration with no batch limit and shape inference
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject batches with more than `max` elements
    pub fn with_max_batch_size(mut self, max: usize) -> Self {
        self.max_batch_size = Some(max);
        self
    }

    /// Check messages against `shape` unless a call overrides it
    pub fn with_default_shape(mut self, shape: Shape) -> Self {
        self.default_shape = Some(shape);
        self
    }
}

/// JSON-RPC 2.0 message processor
#[derive(Clone, Default)]
pub struct MessageProcessor {
    config: ProcessorConfig,
    metrics: Option<Arc<ProcessorMetrics>>,
}

impl MessageProcessor {
    /// Create a processor with the given configuration
    pub fn new(config: ProcessorConfig) -> Self {
        Self { config, metrics: None }
    }

    /// Record outcomes and formatted envelopes into `metrics`
    pub fn with_metrics(mut self, metrics: ProcessorMetrics) -> Self {
        self.metrics = Some(Arc::new(metrics));
        self
    }

    /// The active configuration
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    fn shape(&self, shape: Option<Shape>) -> Option<Shape> {
        shape.or(self.config.default_shape)
    }

    fn record_outcome<T>(&self, outcome: &Outcome<T>) {
        if let Some(metrics) = &self.metrics {
            metrics.record_outcome(outcome);
        }
    }

    fn record_envelope(&self, kind: &'static str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_envelope(kind);
        }
    }

    /// Validate one decoded message, see [`validate::valid`]
    pub fn valid<'a>(&self, message: &'a Value, shape: Option<Shape>) -> Outcome<&'a Value> {
        let outcome = validate::valid(message, self.shape(shape));
        if let Err(kind) = outcome {
            tracing::debug!(code = kind.code(), reason = kind.name(), "Rejected JSON-RPC message");
        }
        self.record_outcome(&outcome);
        outcome
    }

    /// Parse raw text into validated message(s), see [`codec::parse`]
    #[tracing::instrument(skip(self, raw), fields(len = raw.len()))]
    pub fn parse(&self, raw: &str, shape: Option<Shape>) -> Parsed {
        let shape = self.shape(shape);

        let parsed = match codec::decode(raw) {
            Ok(Value::Array(items)) => match self.config.max_batch_size {
                Some(max_size) if items.len() > max_size => {
                    tracing::warn!(batch_size = items.len(), max_size = max_size, "Batch size exceeded");
                    Parsed::Single(Err(ErrorKind::InvalidRequest))
                }
                _ => {
                    if let Some(metrics) = &self.metrics {
                        metrics.record_batch(items.len());
                    }
                    codec::validate_batch(items, shape)
                }
            },
            Ok(message) => Parsed::Single(codec::validate_owned(message, shape)),
            Err(kind) => Parsed::Single(Err(kind)),
        };

        match &parsed {
            Parsed::Single(outcome) => self.record_outcome(outcome),
            Parsed::Batch(outcomes) => outcomes.iter().for_each(|o| self.record_outcome(o)),
        }
        parsed
    }

    /// Normalize an error code, see [`registry::valid_code`]
    pub fn valid_code(&self, code: i64) -> i32 {
        registry::valid_code(code)
    }

    /// Stamp the version and serialize, see [`format::format`]
    pub fn format(&self, message: Value) -> String {
        self.record_envelope("message");
        format::format(message)
    }

    /// Build a success response, see [`format::response`]
    ///
    /// Counted as an error envelope when `id` is not a number, since the
    /// output is then an `INVALID_RESPONSE_ID` error response.
    pub fn response(&self, result: Value, id: &Value) -> String {
        self.record_envelope(response_envelope_kind(id));
        format::response(result, id)
    }

    /// Build an error response from a code, see [`format::error_response_from_code`]
    pub fn error_response_from_code(
        &self,
        code: i64,
        message: Option<&str>,
        id: &Value,
        data: Option<Value>,
    ) -> String {
        self.record_envelope("error");
        format::error_response_from_code(code, message, id, data)
    }

    /// Build an error response from an error object, see [`format::error_response_from_entry`]
    pub fn error_response_from_entry(&self, entry: &ErrorObject, id: &Value, data: Option<Value>) -> String {
        self.record_envelope("error");
        format::error_response_from_entry(entry, id, data)
    }

    /// Build a request envelope, see [`format::request`]
    pub fn request<P: Serialize + ?Sized>(&self, method: &str, params: &P, id: Option<i64>) -> String {
        self.record_envelope("request");
        format::request(method, params, id)
    }

    /// Build a request envelope strictly, see [`format::try_request`]
    pub fn try_request<P: Serialize + ?Sized>(&self, method: &str, params: &P, id: Option<i64>) -> Result<String> {
        let text = format::try_request(method, params, id)?;
        self.record_envelope("request");
        Ok(text)
    }

    /// Build a batch of request envelopes, see [`format::request_batch`]
    pub fn request_batch<I, M, P>(&self, calls: I) -> String
    where
        I: IntoIterator<Item = (M, P, Option<i64>)>,
        M: AsRef<str>,
        P: Serialize,
    {
        self.record_envelope("batch");
        format::request_batch(calls)
    }
}

fn response_envelope_kind(id: &Value) -> &'static str {
    if id.is_number() {
        "response"
    } else {
        "error"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_processor_matches_free_functions() {
        let processor = MessageProcessor::default();
        let raw = r#"[{"jsonrpc":"2.0","method":"a"},{"jsonrpc":"2.0"}]"#;

        assert_eq!(processor.parse(raw, Some(Shape::Request)), codec::parse(raw, Some(Shape::Request)));
        assert_eq!(processor.valid_code(-32080), -32080);
    }

    #[test]
    fn test_batch_limit() {
        let processor = MessageProcessor::new(ProcessorConfig::new().with_max_batch_size(1));

        let within = r#"[{"jsonrpc":"2.0","method":"a"}]"#;
        assert!(processor.parse(within, None).is_batch());

        let over = r#"[{"jsonrpc":"2.0","method":"a"},{"jsonrpc":"2.0","method":"b"}]"#;
        assert_eq!(processor.parse(over, None), Parsed::Single(Err(ErrorKind::InvalidRequest)));
    }

    #[test]
    fn test_batch_limit_ignores_single_messages() {
        let processor = MessageProcessor::new(ProcessorConfig::new().with_max_batch_size(0));
        let parsed = processor.parse(r#"{"jsonrpc":"2.0","method":"a"}"#, None);
        assert!(matches!(parsed, Parsed::Single(Ok(_))));
    }

    #[test]
    fn test_default_shape() {
        let processor = MessageProcessor::new(ProcessorConfig::new().with_default_shape(Shape::Request));
        let message = json!({"jsonrpc": "2.0", "result": 1, "id": 1});

        assert_eq!(processor.valid(&message, None), Err(ErrorKind::InvalidRequest));
        assert!(processor.valid(&message, Some(Shape::Response)).is_ok());
    }

    #[test]
    fn test_valid_returns_same_reference() {
        let processor = MessageProcessor::default();
        let message = json!({"jsonrpc": "2.0", "method": "a", "id": "x"});
        assert!(std::ptr::eq(processor.valid(&message, None).unwrap(), &message));
    }

    #[test]
    fn test_formatting_with_metrics() {
        let processor = MessageProcessor::default().with_metrics(ProcessorMetrics::new());

        let text = processor.request("sum", &json!([1, 2]), Some(1));
        assert!(text.contains("\"method\":\"sum\""));

        let text = processor.error_response_from_entry(&ErrorKind::MethodNotFound.into(), &json!(1), None);
        assert!(text.contains("-32601"));

        let text = processor.request_batch(vec![("a", json!(null), Some(1)), ("b", json!(null), None)]);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_degraded_response_counted_as_error() {
        assert_eq!(response_envelope_kind(&json!(1)), "response");
        assert_eq!(response_envelope_kind(&json!("x")), "error");
        assert_eq!(response_envelope_kind(&Value::Null), "error");

        let processor = MessageProcessor::default().with_metrics(ProcessorMetrics::new());
        let text = processor.response(json!(42), &json!("x"));
        assert!(text.contains("-32050"));
    }

    #[test]
    fn test_config_builder() {
        let config = ProcessorConfig::new()
            .with_max_batch_size(50)
            .with_default_shape(Shape::Response);

        assert_eq!(config.max_batch_size, Some(50));
        assert_eq!(config.default_shape, Some(Shape::Response));
        assert_eq!(ProcessorConfig::default().max_batch_size, None);
    }
}
