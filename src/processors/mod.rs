//! Telemetry processors
//!
//! A processor inspects one outgoing envelope, may enrich it in place, and
//! returns `true` to keep it or `false` to drop it. Processors never fail:
//! malformed or missing fields resolve to "keep, untouched".

mod enrich;
mod log_unwrap;
mod suppress;

pub use enrich::{api_key_name_on_request, user_agent_on_request};
pub use log_unwrap::unpack_structured_log;
pub use suppress::{skip_monitor_requests, skip_static_requests};

use crate::envelope::{Envelope, ProcessorContext};
use crate::telemetry::Metrics;
use std::sync::Arc;
use tracing::trace;

/// Signature shared by every processor.
pub type ProcessorFn = fn(&mut Envelope, Option<&ProcessorContext>) -> bool;

/// The standard processors in registration order.
///
/// Enrichers run first; the two suppression rules are independent of each
/// other and of the enrichers.
pub const STANDARD_PROCESSORS: [(&str, ProcessorFn); 5] = [
    ("user_agent_on_request", user_agent_on_request),
    ("api_key_name_on_request", api_key_name_on_request),
    ("unpack_structured_log", unpack_structured_log),
    ("skip_static_requests", skip_static_requests),
    ("skip_monitor_requests", skip_monitor_requests),
];

/// An ordered processor chain.
///
/// Clients that accept processor callbacks run them the same way; this type
/// does it in-process for hosts that drive their own exporter.
#[derive(Clone, Default)]
pub struct TelemetryPipeline {
    processors: Vec<(&'static str, ProcessorFn)>,
    metrics: Option<Arc<Metrics>>,
}

impl TelemetryPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline holding [`STANDARD_PROCESSORS`].
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        for (name, processor) in STANDARD_PROCESSORS {
            pipeline.register(name, processor);
        }
        pipeline
    }

    /// Record keep/discard decisions into `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Append a processor to the end of the chain.
    pub fn register(&mut self, name: &'static str, processor: ProcessorFn) {
        self.processors.push((name, processor));
    }

    /// Registered processor names, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|(name, _)| *name).collect()
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Run the envelope through the chain.
    ///
    /// Stops at the first processor that returns `false`; later processors
    /// never see a discarded envelope.
    pub fn process(&self, envelope: &mut Envelope, context: Option<&ProcessorContext>) -> bool {
        for (name, processor) in &self.processors {
            let keep = processor(envelope, context);
            if let Some(metrics) = &self.metrics {
                metrics.record_processor(name, keep);
            }
            if !keep {
                trace!(processor = %name, "envelope discarded");
                return false;
            }
        }
        true
    }
}

impl std::fmt::Debug for TelemetryPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryPipeline")
            .field("processors", &self.names())
            .finish()
    }
}
