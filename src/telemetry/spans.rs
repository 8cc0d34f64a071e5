//! Span helpers for tracked job runs.

use super::correlation::SpanContext;
use crate::client::Tracer;
use tracing::Span;

/// Helper for job request spans.
pub struct JobSpan;

impl JobSpan {
    /// Create a span for one job run.
    pub fn new(operation_name: &str) -> Span {
        tracing::info_span!(
            "job_request",
            operation = %operation_name,
            operation_id = tracing::field::Empty,
            success = tracing::field::Empty,
            duration_ms = tracing::field::Empty
        )
    }
}

/// Extension trait for spans.
pub trait SpanExt {
    /// Record success status on the span.
    fn record_success(&self, success: bool);

    /// Record duration in milliseconds on the span.
    fn record_duration_ms(&self, duration_ms: i64);
}

impl SpanExt for Span {
    fn record_success(&self, success: bool) {
        self.record("success", success);
    }

    fn record_duration_ms(&self, duration_ms: i64) {
        self.record("duration_ms", duration_ms);
    }
}

/// In-process tracer that hands out locally generated span identities.
///
/// Used when the host does not export spans to a tracing backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTracer;

impl Tracer for LocalTracer {
    fn start_span(&self, _name: &str) -> Option<SpanContext> {
        Some(SpanContext::generate())
    }
}
