//! Logging, tracing and metrics setup
//!
//! jrpc logs through the `tracing` macros and records metrics through the
//! global OpenTelemetry meter. Neither does anything until the application
//! installs a subscriber and providers. This module does that in one call.
//!
//! # Pipeline
//!
//! - **Logs**: `tracing-subscriber` registry with an `EnvFilter` and a JSON
//!   fmt layer on stdout
//! - **Traces** (optional): spans exported over OTLP/gRPC via
//!   `tracing-opentelemetry`
//! - **Metrics** (optional): a periodic OTLP/gRPC metric reader feeding the
//!   global meter provider used by [`crate::ProcessorMetrics`]
//!
//! # Environment Variables
//!
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: collector endpoint
//! - `RUST_LOG`: log filter directives, e.g. "info" or "jrpc_core=debug"
//!
//! # Examples
//!
//! ```rust,no_run
//! use jrpc_core::ObservabilityConfig;
//!
//! let config = ObservabilityConfig::new("rpc-gateway")
//!     .with_log_level("debug")
//!     .with_traces(false)
//!     .with_metrics(false);
//!
//! jrpc_core::init_observability(config).expect("Failed to init observability");
//! tracing::info!("ready");
//! jrpc_core::shutdown_observability().expect("Failed to flush telemetry");
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use std::sync::OnceLock;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Observability configuration
///
/// # Defaults
///
/// - Service name: "jrpc"
/// - Service version: the crate version
/// - OTLP endpoint: `$OTEL_EXPORTER_OTLP_ENDPOINT` or "http://localhost:4317"
/// - Traces and metrics enabled
/// - Log level: `$RUST_LOG` or "info"
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name attached to all telemetry
    pub service_name: String,
    /// Service version attached to all telemetry
    pub service_version: String,
    /// OTLP/gRPC collector endpoint
    pub otlp_endpoint: String,
    /// Export spans over OTLP
    pub enable_traces: bool,
    /// Export metrics over OTLP
    pub enable_metrics: bool,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "jrpc".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
            enable_traces: true,
            enable_metrics: true,
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl ObservabilityConfig {
    /// Create a configuration with a custom service name and defaults otherwise
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set the OTLP collector endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = endpoint.into();
        self
    }

    /// Set the log filter
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the service version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = version.into();
        self
    }

    /// Enable or disable span export
    pub fn with_traces(mut self, enable: bool) -> Self {
        self.enable_traces = enable;
        self
    }

    /// Enable or disable metric export
    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }
}

// Providers installed by a successful `init_observability`, kept for shutdown.
static PROVIDERS: OnceLock<Providers> = OnceLock::new();

#[derive(Default)]
struct Providers {
    tracer: Option<SdkTracerProvider>,
    meter: Option<SdkMeterProvider>,
}

impl Providers {
    fn shutdown(&self) -> Result<(), BoxError> {
        let traces = self.tracer.as_ref().map_or(Ok(()), |provider| provider.shutdown());
        let metrics = self.meter.as_ref().map_or(Ok(()), |provider| provider.shutdown());
        traces?;
        metrics?;
        Ok(())
    }

    // Stop exporters that never became global.
    fn discard(self) {
        if let Err(e) = self.shutdown() {
            tracing::warn!(error = %e, "Failed to stop unused telemetry providers");
        }
    }
}

/// Install the tracing subscriber and, if enabled, the OTLP providers
///
/// Call once at startup. The OTLP exporters use tonic and must be created
/// inside a Tokio runtime when traces or metrics are enabled.
///
/// Nothing global changes unless the whole call succeeds: providers are
/// only registered with `opentelemetry::global` after the subscriber is in
/// place, and are stopped again on any failure.
///
/// # Errors
///
/// Fails if an exporter cannot be built, the log filter is invalid, or a
/// global subscriber is already installed.
pub fn init_observability(config: ObservabilityConfig) -> Result<(), BoxError> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.log_level))?;

    let mut providers = Providers::default();
    if config.enable_traces {
        providers.tracer = Some(tracer_provider(&config)?);
    }
    if config.enable_metrics {
        match meter_provider(&config) {
            Ok(provider) => providers.meter = Some(provider),
            Err(e) => {
                providers.discard();
                return Err(e);
            }
        }
    }

    let telemetry_layer = providers.tracer.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(config.service_name.clone()))
    });
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .json();

    let installed = tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
    if let Err(e) = installed {
        providers.discard();
        return Err(e.into());
    }

    if let Some(provider) = &providers.tracer {
        global::set_tracer_provider(provider.clone());
    }
    if let Some(provider) = &providers.meter {
        global::set_meter_provider(provider.clone());
    }
    // The subscriber can only be installed once, so this slot is still empty.
    let _ = PROVIDERS.set(providers);

    tracing::info!(
        service_name = %config.service_name,
        otlp_endpoint = %config.otlp_endpoint,
        traces = config.enable_traces,
        metrics = config.enable_metrics,
        "Observability initialized"
    );

    Ok(())
}

fn resource(config: &ObservabilityConfig) -> Resource {
    Resource::builder_empty()
        .with_attributes(vec![
            KeyValue::new(
                opentelemetry_semantic_conventions::resource::SERVICE_NAME,
                config.service_name.clone(),
            ),
            KeyValue::new(
                opentelemetry_semantic_conventions::resource::SERVICE_VERSION,
                config.service_version.clone(),
            ),
        ])
        .build()
}

fn tracer_provider(config: &ObservabilityConfig) -> Result<SdkTracerProvider, BoxError> {
    use opentelemetry_sdk::trace::{RandomIdGenerator, Sampler};

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource(config))
        .with_sampler(Sampler::AlwaysOn)
        .with_id_generator(RandomIdGenerator::default())
        .build())
}

fn meter_provider(config: &ObservabilityConfig) -> Result<SdkMeterProvider, BoxError> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_tonic()
        .with_endpoint(config.otlp_endpoint.clone())
        .build()?;

    let reader = opentelemetry_sdk::metrics::PeriodicReader::builder(exporter)
        .with_interval(Duration::from_secs(30))
        .build();

    Ok(SdkMeterProvider::builder()
        .with_reader(reader)
        .with_resource(resource(config))
        .build())
}

/// Flush and stop the OTLP providers installed by [`init_observability`]
///
/// Buffered spans and the last metric interval are exported before this
/// returns. Does nothing when no providers were installed.
///
/// # Errors
///
/// Returns the first provider shutdown failure, for example when called a
/// second time.
pub fn shutdown_observability() -> Result<(), BoxError> {
    tracing::info!("Observability shutdown");
    match PROVIDERS.get() {
        Some(providers) => providers.shutdown(),
        None => Ok(()),
    }
}
