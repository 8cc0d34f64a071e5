//! Application Insights setup and telemetry shaping.
//!
//! - [`setup`]: conditional client initialization from options or environment
//! - [`processors`]: envelope enrichment and suppression filters
//! - [`jobs`]: request tracking for background job runs
//! - [`telemetry`]: correlation scope, spans, logging and local metrics

pub mod client;
pub mod config;
pub mod envelope;
pub mod jobs;
pub mod processors;
pub mod setup;
pub mod telemetry;
pub mod util;

pub use client::{OperationSink, TelemetryClient, Tracer};
pub use config::{AppInsightsOptions, ConfigError, EnvCredentials};
pub use envelope::{Envelope, ProcessorContext, RequestTelemetry};
pub use jobs::{Job, JobDone, JobHandler, JobTracker, TrackedJob};
pub use processors::{ProcessorFn, TelemetryPipeline, STANDARD_PROCESSORS};
pub use setup::{init, init_from_env, InitOutcome};
