//! Request tracking for job runs.

use super::{Job, JobDone, JobHandler};
use crate::client::{OperationSink, Tracer};
use crate::envelope::RequestTelemetry;
use crate::telemetry::{
    correlation, CorrelationContext, CorrelationExt, JobSpan, LocalTracer, Metrics, SpanExt,
};
use crate::util::{Clock, SystemClock};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, Instrument};

/// Prefix of the reported operation name.
pub const DEFAULT_OPERATION_PREFIX: &str = "AGENDA";

/// Shared collaborators for tracked jobs.
///
/// Cheap to clone; every wrapped handler keeps its own copy.
#[derive(Clone)]
pub struct JobTracker {
    sink: Option<Arc<dyn OperationSink>>,
    tracer: Arc<dyn Tracer>,
    clock: Arc<dyn Clock>,
    prefix: String,
    metrics: Option<Arc<Metrics>>,
}

impl JobTracker {
    /// Track runs into `sink`, with a local tracer and the system clock.
    ///
    /// `None` means telemetry is not configured; wrapped handlers then run
    /// untracked.
    pub fn new(sink: Option<Arc<dyn OperationSink>>) -> Self {
        Self {
            sink,
            tracer: Arc::new(LocalTracer),
            clock: Arc::new(SystemClock),
            prefix: DEFAULT_OPERATION_PREFIX.to_string(),
            metrics: None,
        }
    }

    /// A tracker without a sink.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn with_tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Wrap `handler` so each run of job `name` is reported.
    pub fn wrap<H: JobHandler>(&self, name: impl Into<String>, handler: H) -> TrackedJob<H> {
        let name = name.into();
        TrackedJob {
            operation_name: format!("{} {}", self.prefix, name),
            name,
            handler,
            tracker: self.clone(),
        }
    }

    /// Start a span and a correlation context for one run.
    fn start_operation(
        &self,
        operation_name: &str,
    ) -> Option<(Arc<dyn OperationSink>, CorrelationContext)> {
        let sink = self.sink.as_ref()?;
        let span = self.tracer.start_span(operation_name)?;
        let context = sink.start_operation(&span, operation_name)?;
        Some((Arc::clone(sink), context))
    }
}

impl std::fmt::Debug for JobTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobTracker")
            .field("enabled", &self.is_enabled())
            .field("prefix", &self.prefix)
            .finish()
    }
}

/// A handler whose runs are reported as requests.
pub struct TrackedJob<H> {
    name: String,
    operation_name: String,
    handler: H,
    tracker: JobTracker,
}

impl<H> TrackedJob<H> {
    /// Job name as defined with the scheduler.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name reported on the request record.
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    pub fn inner(&self) -> &H {
        &self.handler
    }
}

#[async_trait]
impl<H: JobHandler> JobHandler for TrackedJob<H> {
    type Error = H::Error;

    async fn run(&self, job: &mut Job, done: JobDone) -> Result<(), H::Error> {
        let start = self.tracker.clock.now();

        let Some((sink, context)) = self.tracker.start_operation(&self.operation_name) else {
            debug!(job = %self.name, "tracking unavailable, running untracked");
            return self.handler.run(job, done).await;
        };

        let span = JobSpan::new(&self.operation_name);
        span.record_correlation(&context);

        correlation::scope(context, self.handler.run(job, done))
            .instrument(span.clone())
            .await?;

        let duration = (self.tracker.clock.now() - start).num_milliseconds();
        let success = !job.attrs.last_run_failed();
        span.record_duration_ms(duration);
        span.record_success(success);

        if let Some(metrics) = &self.tracker.metrics {
            let elapsed = std::time::Duration::from_millis(duration.max(0) as u64);
            metrics.record_job(&self.operation_name, elapsed, success);
        }

        let repeat_interval = job.attrs.repeat_interval.clone().unwrap_or(Value::Null);
        sink.track_request(RequestTelemetry {
            time: start,
            duration,
            name: self.operation_name.clone(),
            properties: BTreeMap::from([("repeatInterval".to_string(), repeat_interval)]),
            url: String::new(),
            result_code: String::new(),
            success,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        requests: Mutex<Vec<RequestTelemetry>>,
    }

    impl OperationSink for Recorder {
        fn track_request(&self, request: RequestTelemetry) {
            self.requests.lock().unwrap().push(request);
        }
    }

    struct Noop;

    #[async_trait]
    impl JobHandler for Noop {
        type Error = std::convert::Infallible;

        async fn run(&self, _job: &mut Job, _done: JobDone) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_operation_name() {
        let tracked = JobTracker::disabled().wrap("JobName", Noop);
        assert_eq!(tracked.name(), "JobName");
        assert_eq!(tracked.operation_name(), "AGENDA JobName");

        let custom = JobTracker::disabled().with_prefix("CRON").wrap("JobName", Noop);
        assert_eq!(custom.operation_name(), "CRON JobName");
    }

    #[tokio::test]
    async fn test_reports_one_request() {
        let recorder = Arc::new(Recorder::default());
        let tracker = JobTracker::new(Some(recorder.clone() as Arc<dyn OperationSink>));
        let tracked = tracker.wrap("JobName", Noop);

        let mut job = Job::new("JobName").with_repeat_interval(3600);
        tracked.run(&mut job, JobDone::detached()).await.unwrap();

        let requests = recorder.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, "AGENDA JobName");
        assert_eq!(requests[0].properties["repeatInterval"], Value::from(3600));
        assert!(requests[0].success);
        assert!(requests[0].url.is_empty());
        assert!(requests[0].result_code.is_empty());
    }
}
