//! Log subscriber setup for hosts that do not install their own.
//!
//! The crate itself only emits `tracing` events; a host that already has a
//! subscriber needs none of this.

use tracing::{Level, Subscriber};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// How events from this crate and its host are rendered.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level for everything not named in `RUST_LOG`
    pub level: Level,
    /// Full filter directive; replaces `level` and `RUST_LOG` when set
    pub directive: Option<String>,
    pub ansi: bool,
    /// Print source file and line of each event
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            directive: None,
            ansi: true,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Verbose local output, processor and job decisions included.
    pub fn development() -> Self {
        Self {
            level: Level::TRACE,
            source_location: true,
            ..Self::default()
        }
    }

    /// Warnings only, no colors, for log collectors.
    pub fn production() -> Self {
        Self {
            level: Level::WARN,
            ansi: false,
            ..Self::default()
        }
    }

    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = Some(directive.into());
        self
    }

    /// Build the event filter.
    ///
    /// Fails on a malformed `directive`; a malformed `RUST_LOG` is ignored
    /// by `EnvFilter` itself.
    pub fn env_filter(&self) -> anyhow::Result<EnvFilter> {
        match &self.directive {
            Some(directive) => Ok(EnvFilter::try_new(directive)?),
            None => Ok(EnvFilter::builder()
                .with_default_directive(self.level.into())
                .from_env_lossy()),
        }
    }

    fn subscriber(&self) -> anyhow::Result<impl Subscriber + Send + Sync + 'static> {
        let output = fmt::layer()
            .compact()
            .with_ansi(self.ansi)
            .with_file(self.source_location)
            .with_line_number(self.source_location);
        Ok(tracing_subscriber::registry()
            .with(self.env_filter()?)
            .with(output))
    }
}

/// Install the subscriber process-wide.
///
/// Fails if the directive is malformed or a global subscriber already exists.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(config.subscriber()?)?;
    Ok(())
}

/// Install the subscriber for the current thread until the guard drops.
pub fn scoped_logging(
    config: &LoggingConfig,
) -> anyhow::Result<tracing::subscriber::DefaultGuard> {
    Ok(tracing::subscriber::set_default(config.subscriber()?))
}
