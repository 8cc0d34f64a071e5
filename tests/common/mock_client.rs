//! Recording doubles for the telemetry SDK collaborators.
//!
//! Everything is kept in memory so tests can assert on exactly which SDK
//! entry points were called, in which order, with which arguments.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use kth_appinsights::client::{OperationSink, TelemetryClient, Tracer};
use kth_appinsights::envelope::{Envelope, ProcessorContext, RequestTelemetry};
use kth_appinsights::processors::ProcessorFn;
use kth_appinsights::telemetry::{CorrelationContext, SpanContext};
use kth_appinsights::util::Clock;

/// Records every setup call made during initialization.
#[derive(Default)]
pub struct RecordingClient {
    /// Arguments of each `setup` call
    pub setup_calls: Vec<Option<String>>,
    pub auto_collect_console: Option<(bool, bool)>,
    pub start_calls: usize,
    pub tags: BTreeMap<String, String>,
    pub sampling_percentage: Option<f64>,
    pub processors: Vec<ProcessorFn>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any SDK entry point was touched.
    pub fn was_touched(&self) -> bool {
        !self.setup_calls.is_empty()
            || self.auto_collect_console.is_some()
            || self.start_calls > 0
            || !self.tags.is_empty()
            || self.sampling_percentage.is_some()
            || !self.processors.is_empty()
    }

    /// Run registered processors the way the SDK does before export.
    pub fn process(&self, envelope: &mut Envelope, context: Option<&ProcessorContext>) -> bool {
        self.processors
            .iter()
            .all(|processor| processor(envelope, context))
    }
}

impl TelemetryClient for RecordingClient {
    fn setup(&mut self, credential: Option<&str>) {
        self.setup_calls.push(credential.map(str::to_string));
    }

    fn set_auto_collect_console(&mut self, collect_console: bool, collect_console_log: bool) {
        self.auto_collect_console = Some((collect_console, collect_console_log));
    }

    fn start(&mut self) {
        self.start_calls += 1;
    }

    fn set_tag(&mut self, key: &str, value: String) {
        self.tags.insert(key.to_string(), value);
    }

    fn set_sampling_percentage(&mut self, percentage: f64) {
        self.sampling_percentage = Some(percentage);
    }

    fn add_telemetry_processor(&mut self, processor: ProcessorFn) {
        self.processors.push(processor);
    }
}

/// Records tracked requests and the spans operations were started from.
#[derive(Default)]
pub struct RecordingSink {
    pub requests: Mutex<Vec<RequestTelemetry>>,
    pub started: Mutex<Vec<(SpanContext, String)>>,
    /// Refuse to start operations, as an SDK without context support does
    pub refuse_operations: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing() -> Self {
        Self {
            refuse_operations: true,
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<RequestTelemetry> {
        self.requests.lock().unwrap().clone()
    }

    pub fn started(&self) -> Vec<(SpanContext, String)> {
        self.started.lock().unwrap().clone()
    }
}

impl OperationSink for RecordingSink {
    fn track_request(&self, request: RequestTelemetry) {
        self.requests.lock().unwrap().push(request);
    }

    fn start_operation(
        &self,
        span: &SpanContext,
        operation_name: &str,
    ) -> Option<CorrelationContext> {
        self.started
            .lock()
            .unwrap()
            .push((span.clone(), operation_name.to_string()));
        if self.refuse_operations {
            None
        } else {
            Some(CorrelationContext::from_span(span, operation_name))
        }
    }
}

/// Tracer that hands out one fixed span, or none at all.
pub struct FixedTracer {
    pub span: Option<SpanContext>,
    pub names: Mutex<Vec<String>>,
}

impl FixedTracer {
    pub fn new() -> Self {
        Self {
            span: Some(SpanContext {
                trace_id: "01234567890123456789012345678901".to_string(),
                span_id: "0123456789012345".to_string(),
                trace_flags: 0,
            }),
            names: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            span: None,
            names: Mutex::new(Vec::new()),
        }
    }
}

impl Tracer for FixedTracer {
    fn start_span(&self, name: &str) -> Option<SpanContext> {
        self.names.lock().unwrap().push(name.to_string());
        self.span.clone()
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        let mut now = self.now.lock().unwrap();
        *now += Duration::milliseconds(ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}
