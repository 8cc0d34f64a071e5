//! Telemetry client collaborator traits
//!
//! The Application Insights SDK owns transport, batching, sampling and
//! retry. This crate only talks to it through these traits, so the SDK can
//! be swapped for a recording double in tests.

use crate::envelope::RequestTelemetry;
use crate::processors::ProcessorFn;
use crate::telemetry::{CorrelationContext, SpanContext};

/// Context tag naming the deployable unit.
pub const TAG_CLOUD_ROLE: &str = "ai.cloud.role";

/// Context tag naming the running instance.
pub const TAG_CLOUD_ROLE_INSTANCE: &str = "ai.cloud.roleInstance";

/// Setup surface of the SDK client, used once at startup.
pub trait TelemetryClient {
    /// Configure the client. `None` lets the SDK read its own environment.
    fn setup(&mut self, credential: Option<&str>);

    /// Toggle console auto-collection.
    fn set_auto_collect_console(&mut self, collect_console: bool, collect_console_log: bool);

    /// Start collection and export.
    fn start(&mut self);

    /// Set a context tag sent with every envelope.
    fn set_tag(&mut self, key: &str, value: String);

    /// Override the SDK's sampling rate.
    fn set_sampling_percentage(&mut self, percentage: f64);

    /// Append a processor run for every outgoing envelope, in registration order.
    fn add_telemetry_processor(&mut self, processor: ProcessorFn);
}

/// Runtime surface of the SDK client used for tracked operations.
pub trait OperationSink: Send + Sync {
    /// Emit a request record.
    fn track_request(&self, request: RequestTelemetry);

    /// Start a correlation context scoped to `span`.
    ///
    /// Returning `None` means the operation cannot be correlated and will run
    /// untracked.
    fn start_operation(
        &self,
        span: &SpanContext,
        operation_name: &str,
    ) -> Option<CorrelationContext> {
        Some(CorrelationContext::from_span(span, operation_name))
    }
}

/// Produces span contexts for new operations.
pub trait Tracer: Send + Sync {
    fn start_span(&self, name: &str) -> Option<SpanContext>;
}
