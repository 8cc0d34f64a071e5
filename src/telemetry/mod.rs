//! Correlation, spans, logging and local metrics.
//!
//! - Correlation contexts scoped to a task, so telemetry emitted inside a
//!   tracked operation can be attributed to it
//! - Span helpers for job runs via the `tracing` crate
//! - Logging subscriber setup
//! - Local metrics for processor decisions and job runs
//!
//! # Feature Flags
//!
//! - `release-logs`: Strip debug/trace at compile time
//! - `max-perf`: Disable all tracing for maximum performance

pub mod correlation;
mod init;
pub mod metrics;
mod spans;

pub use correlation::{CorrelationContext, CorrelationExt, SpanContext};
pub use init::{init_logging, scoped_logging, LoggingConfig};
pub use metrics::{Histogram, JobMetrics, Metrics, MetricsSnapshot, ProcessorMetrics};
pub use spans::{JobSpan, LocalTracer, SpanExt};
