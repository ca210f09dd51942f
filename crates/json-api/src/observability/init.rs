//! Observability lifecycle: install once at startup, flush on shutdown.

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace::SdkTracerProvider};
use tracing::{error, info};

use crate::config::ServerConfig;

use super::{ObservabilityError, logging, otel, settings};

/// Holds the tracer provider so buffered spans can be flushed before exit.
#[derive(Debug)]
pub(crate) struct Observability {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Observability {
    /// Install the global subscriber, exporting spans over OTLP when enabled.
    pub(crate) fn init(config: &ServerConfig) -> Result<Self, ObservabilityError> {
        let observability = &config.observability;

        settings::configure(observability);

        let tracer_provider = observability
            .otel_enabled
            .then(|| {
                global::set_text_map_propagator(TraceContextPropagator::new());

                otel::build_tracer_provider(config)
            })
            .transpose()?;

        logging::init_subscriber(
            &config.logging,
            &observability.otel_service_name,
            tracer_provider.as_ref(),
        )?;

        info!(
            service = %observability.otel_service_name,
            otel_enabled = observability.otel_enabled,
            log_format = ?config.logging.log_format,
            "observability initialised"
        );

        Ok(Self { tracer_provider })
    }

    /// Flush pending spans. A no-op when export is disabled.
    pub(crate) fn shutdown(self) {
        if let Some(provider) = self.tracer_provider
            && let Err(source) = provider.shutdown()
        {
            error!("failed to flush tracer provider: {source}");
        }
    }
}
