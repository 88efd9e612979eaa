//! Message processing metrics
//!
//! OpenTelemetry instruments recording what a [`crate::MessageProcessor`]
//! accepts, rejects and emits. They are exported through whatever meter
//! provider is installed globally (see [`crate::init_observability`]); with
//! no provider installed every recording is a no-op.
//!
//! # Metrics Collected
//!
//! - **jrpc.messages.validated**: messages that passed validation (counter)
//! - **jrpc.messages.rejected**: messages that failed, by `code` (counter)
//! - **jrpc.batch.size**: number of elements in parsed batches (histogram)
//! - **jrpc.envelopes.formatted**: envelopes produced, by `kind` (counter)

use crate::registry::ErrorKind;
use opentelemetry::{
    global,
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};

/// Metrics instruments for a message processor
pub struct ProcessorMetrics {
    /// Messages that passed validation
    pub messages_validated: Counter<u64>,
    /// Messages rejected, with a `code` attribute
    pub messages_rejected: Counter<u64>,
    /// Batch size distribution
    pub batch_size: Histogram<u64>,
    /// Envelopes formatted, with a `kind` attribute
    pub envelopes_formatted: Counter<u64>,
}

impl ProcessorMetrics {
    /// Create instruments from the global meter provider
    pub fn new() -> Self {
        Self::new_with_meter(&global::meter("jrpc"))
    }

    /// Create instruments from a specific meter
    pub fn new_with_meter(meter: &Meter) -> Self {
        Self {
            messages_validated: meter
                .u64_counter("jrpc.messages.validated")
                .with_description("Number of messages that passed validation")
                .build(),
            messages_rejected: meter
                .u64_counter("jrpc.messages.rejected")
                .with_description("Number of messages rejected, by error code")
                .build(),
            batch_size: meter
                .u64_histogram("jrpc.batch.size")
                .with_description("Number of messages in parsed batches")
                .build(),
            envelopes_formatted: meter
                .u64_counter("jrpc.envelopes.formatted")
                .with_description("Number of envelopes formatted, by kind")
                .build(),
        }
    }

    /// Record the outcome of validating one message
    pub fn record_outcome<T>(&self, outcome: &Result<T, ErrorKind>) {
        match outcome {
            Ok(_) => self.messages_validated.add(1, &[]),
            Err(kind) => self.messages_rejected.add(
                1,
                &[
                    KeyValue::new("code", kind.code() as i64),
                    KeyValue::new("reason", kind.name()),
                ],
            ),
        }
    }

    /// Record a parsed batch
    pub fn record_batch(&self, size: usize) {
        self.batch_size.record(size as u64, &[]);
    }

    /// Record a formatted envelope of the given kind
    pub fn record_envelope(&self, kind: &'static str) {
        self.envelopes_formatted.add(1, &[KeyValue::new("kind", kind)]);
    }
}

impl Default for ProcessorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_provider() {
        // The global meter is a no-op until a provider is installed.
        let metrics = ProcessorMetrics::new();
        metrics.record_outcome(&Ok::<(), ErrorKind>(()));
        metrics.record_outcome(&Err::<(), ErrorKind>(ErrorKind::ParseError));
        metrics.record_batch(3);
        metrics.record_envelope("request");
    }
}
