//! Correlation context for tracked operations.
//!
//! A context is derived from a span and scoped to one task with
//! [`scope`]. Telemetry produced inside the scope reads it back with
//! [`current`] to attach the operation identity.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Counter for unique IDs within a session
static COUNTER: AtomicU64 = AtomicU64::new(1);

tokio::task_local! {
    static CURRENT: CorrelationContext;
}

/// Identity of a started span.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpanContext {
    /// 32 hex characters
    pub trace_id: String,
    /// 16 hex characters
    pub span_id: String,
    pub trace_flags: u8,
}

impl SpanContext {
    /// Generate a fresh span identity.
    ///
    /// Format: `{timestamp_ns}{counter}` in hex, unique within the process.
    pub fn generate() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64;
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self {
            trace_id: format!("{timestamp:016x}{counter:016x}"),
            span_id: format!("{:08x}{:08x}", timestamp as u32, counter as u32),
            trace_flags: 0,
        }
    }
}

/// Links telemetry emitted during an operation to that operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationContext {
    /// Trace the operation belongs to
    pub operation_id: String,
    /// Span telemetry inside the operation is parented to
    pub parent_id: String,
    pub operation_name: String,
}

impl CorrelationContext {
    /// Derive a context from a started span.
    pub fn from_span(span: &SpanContext, operation_name: &str) -> Self {
        Self {
            operation_id: span.trace_id.clone(),
            parent_id: span.span_id.clone(),
            operation_name: operation_name.to_string(),
        }
    }
}

impl std::fmt::Display for CorrelationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.operation_id, self.parent_id)
    }
}

/// Run `future` with `context` as the current correlation context.
pub async fn scope<F: Future>(context: CorrelationContext, future: F) -> F::Output {
    CURRENT.scope(context, future).await
}

/// The correlation context of the running task, if inside [`scope`].
pub fn current() -> Option<CorrelationContext> {
    CURRENT.try_with(Clone::clone).ok()
}

/// Extension trait for adding correlation identity to tracing spans.
pub trait CorrelationExt {
    /// Record the operation id on the span.
    fn record_correlation(&self, context: &CorrelationContext);
}

impl CorrelationExt for tracing::Span {
    fn record_correlation(&self, context: &CorrelationContext) {
        self.record("operation_id", context.operation_id.as_str());
    }
}
