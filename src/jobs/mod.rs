//! Background job handlers and request tracking
//!
//! A job scheduler invokes handlers as `run(&mut job, done)`. Wrapping a
//! handler with [`JobTracker::wrap`] keeps that calling convention and
//! reports every run as a request under its own correlation context.

mod tracker;

pub use tracker::{JobTracker, TrackedJob, DEFAULT_OPERATION_PREFIX};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;

/// A scheduled job as handed to its handler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Job {
    pub attrs: JobAttributes,
}

/// Scheduler bookkeeping for a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAttributes {
    #[serde(default)]
    pub name: Option<String>,
    /// Interval between runs; a number of milliseconds or a human string
    #[serde(default)]
    pub repeat_interval: Option<Value>,
    #[serde(default)]
    pub last_run_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub failed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fail_reason: Option<String>,
    #[serde(default)]
    pub fail_count: u32,
    #[serde(default)]
    pub data: Value,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            attrs: JobAttributes {
                name: Some(name.into()),
                ..JobAttributes::default()
            },
        }
    }

    pub fn with_repeat_interval(mut self, interval: impl Into<Value>) -> Self {
        self.attrs.repeat_interval = Some(interval.into());
        self
    }
}

impl JobAttributes {
    /// Whether the most recent run failed.
    ///
    /// A failure stamp older than the last finish belongs to an earlier run.
    pub fn last_run_failed(&self) -> bool {
        match self.failed_at {
            Some(failed_at) => self.last_finished_at != Some(failed_at),
            None => false,
        }
    }
}

/// Completion handle a handler may signal when its work is done.
#[derive(Debug)]
pub struct JobDone {
    tx: Option<oneshot::Sender<Result<(), String>>>,
}

impl JobDone {
    /// A handle plus the receiver the scheduler waits on.
    pub fn channel() -> (Self, oneshot::Receiver<Result<(), String>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A handle nobody listens to.
    pub fn detached() -> Self {
        Self { tx: None }
    }

    /// Report completion; a no-op when nobody listens.
    pub fn complete(mut self, outcome: Result<(), String>) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(outcome);
        }
    }
}

/// An asynchronous job handler.
#[async_trait]
pub trait JobHandler: Send + Sync {
    type Error: Send;

    async fn run(&self, job: &mut Job, done: JobDone) -> Result<(), Self::Error>;
}

/// Closure-backed [`JobHandler`], see [`handler_fn`].
pub struct FnHandler<F> {
    f: F,
}

/// Adapt a closure returning a boxed future into a [`JobHandler`].
///
/// ```rust,ignore
/// let handler = handler_fn(|job, done| Box::pin(async move {
///     job.attrs.fail_count = 0;
///     done.complete(Ok(()));
///     Ok::<_, std::io::Error>(())
/// }));
/// ```
pub fn handler_fn<F, E>(f: F) -> FnHandler<F>
where
    F: for<'a> Fn(&'a mut Job, JobDone) -> BoxFuture<'a, Result<(), E>> + Send + Sync,
    E: Send,
{
    FnHandler { f }
}

#[async_trait]
impl<F, E> JobHandler for FnHandler<F>
where
    F: for<'a> Fn(&'a mut Job, JobDone) -> BoxFuture<'a, Result<(), E>> + Send + Sync,
    E: Send,
{
    type Error = E;

    async fn run(&self, job: &mut Job, done: JobDone) -> Result<(), E> {
        (self.f)(job, done).await
    }
}
