//! Local counters for processor decisions and tracked job runs.
//!
//! Every entry is fixed-size, so a scheduler that has been up for months
//! holds as much as one that just started. Recording never panics: a lock
//! poisoned by another thread is recovered, not propagated.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Upper bounds of the duration buckets in milliseconds. Runs slower than the
/// last bound land in an extra open bucket.
pub const BUCKET_BOUNDS_MS: [u64; 10] = [
    5, 10, 50, 100, 500, 1_000, 5_000, 10_000, 60_000, 300_000,
];

const BUCKETS: usize = BUCKET_BOUNDS_MS.len() + 1;

/// Processor and job counters, shared through `Arc`.
#[derive(Debug, Default)]
pub struct Metrics {
    processors: Mutex<HashMap<String, ProcessorMetrics>>,
    jobs: Mutex<HashMap<String, JobMetrics>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one keep/discard decision of `processor`.
    pub fn record_processor(&self, processor: &str, kept: bool) {
        lock(&self.processors)
            .entry(processor.to_string())
            .or_default()
            .record(kept);
    }

    /// Count one finished run of `operation`.
    pub fn record_job(&self, operation: &str, duration: Duration, success: bool) {
        lock(&self.jobs)
            .entry(operation.to_string())
            .or_default()
            .record(duration, success);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            processors: lock(&self.processors).clone(),
            jobs: lock(&self.jobs).clone(),
        }
    }

    pub fn reset(&self) {
        lock(&self.processors).clear();
        lock(&self.jobs).clear();
    }
}

/// Keep/discard counts of one processor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorMetrics {
    pub kept: u64,
    pub discarded: u64,
}

impl ProcessorMetrics {
    pub fn record(&mut self, kept: bool) {
        if kept {
            self.kept += 1;
        } else {
            self.discarded += 1;
        }
    }

    pub fn invocations(&self) -> u64 {
        self.kept + self.discarded
    }

    /// Share of envelopes discarded, as a percentage.
    pub fn discard_rate(&self) -> f64 {
        match self.invocations() {
            0 => 0.0,
            n => self.discarded as f64 * 100.0 / n as f64,
        }
    }
}

/// Outcome and duration counts of one job.
#[derive(Debug, Clone, Default)]
pub struct JobMetrics {
    pub runs: u64,
    pub failures: u64,
    pub total_duration: Duration,
    pub slowest: Duration,
    pub durations: Histogram,
}

impl JobMetrics {
    pub fn record(&mut self, duration: Duration, success: bool) {
        self.runs += 1;
        if !success {
            self.failures += 1;
        }
        self.total_duration = self.total_duration.saturating_add(duration);
        self.slowest = self.slowest.max(duration);
        self.durations.record(duration);
    }

    /// Mean run duration; zero before the first run.
    pub fn mean_duration(&self) -> Duration {
        match u32::try_from(self.runs) {
            Ok(0) => Duration::ZERO,
            Ok(runs) => self.total_duration / runs,
            Err(_) => Duration::from_secs_f64(self.total_duration.as_secs_f64() / self.runs as f64),
        }
    }

    /// Successful runs as a percentage; 100 before the first run.
    pub fn success_rate(&self) -> f64 {
        match self.runs {
            0 => 100.0,
            n => (n - self.failures) as f64 * 100.0 / n as f64,
        }
    }
}

/// Fixed-bucket duration histogram, see [`BUCKET_BOUNDS_MS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; BUCKETS],
    total: u64,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, duration: Duration) {
        let ms = duration.as_millis();
        let bucket = BUCKET_BOUNDS_MS
            .iter()
            .position(|bound| ms <= u128::from(*bound))
            .unwrap_or(BUCKET_BOUNDS_MS.len());
        self.counts[bucket] += 1;
        self.total += 1;
    }

    /// Number of recorded samples.
    pub fn count(&self) -> u64 {
        self.total
    }

    /// Per-bucket counts, the open bucket last.
    pub fn buckets(&self) -> &[u64] {
        &self.counts
    }

    /// Upper bound of the bucket holding the `p`th percentile.
    ///
    /// Samples in the open bucket report the last bound.
    pub fn percentile(&self, p: u8) -> Option<Duration> {
        if self.total == 0 {
            return None;
        }
        let rank = ((f64::from(p.min(100)) / 100.0) * self.total as f64).ceil().max(1.0) as u64;
        let mut seen = 0;
        for (bucket, count) in self.counts.iter().enumerate() {
            seen += count;
            if seen >= rank {
                let bound = BUCKET_BOUNDS_MS[bucket.min(BUCKET_BOUNDS_MS.len() - 1)];
                return Some(Duration::from_millis(bound));
            }
        }
        None
    }
}

/// Copy of the counters at one point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub processors: HashMap<String, ProcessorMetrics>,
    pub jobs: HashMap<String, JobMetrics>,
}

impl MetricsSnapshot {
    /// Plain-text summary, entries sorted by name.
    pub fn format_report(&self) -> String {
        let mut lines = Vec::new();

        let mut processors: Vec<_> = self.processors.iter().collect();
        processors.sort_by_key(|(name, _)| name.as_str());
        for (name, m) in processors {
            lines.push(format!(
                "processor {name}: kept={} discarded={} ({:.1}% discarded)",
                m.kept,
                m.discarded,
                m.discard_rate()
            ));
        }

        let mut jobs: Vec<_> = self.jobs.iter().collect();
        jobs.sort_by_key(|(name, _)| name.as_str());
        for (name, m) in jobs {
            let p50 = m.durations.percentile(50).unwrap_or_default();
            lines.push(format!(
                "job {name}: runs={} failures={} mean={}ms p50<={}ms",
                m.runs,
                m.failures,
                m.mean_duration().as_millis(),
                p50.as_millis()
            ));
        }

        lines.join("\n")
    }
}
