//! Client initialization
//!
//! Starts the SDK only when some credential is available, then applies role
//! tags, sampling and the standard processors.

use crate::client::{TelemetryClient, TAG_CLOUD_ROLE, TAG_CLOUD_ROLE_INSTANCE};
use crate::config::{AppInsightsOptions, EnvCredentials};
use crate::processors::STANDARD_PROCESSORS;
use crate::util::resolve_hostname;
use tracing::{debug, info, warn};

/// Result of [`init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// No credential anywhere; the client was not touched.
    Skipped,
    /// The client was set up and started.
    Started(CredentialSource),
}

/// Where the credential used to start the client came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Options,
    Environment,
}

/// Initialize `client` from `options`, falling back to `env`.
///
/// `hostname` feeds the role instance tag; pass `None` when it cannot be
/// resolved.
pub fn init<C>(
    client: &mut C,
    options: &AppInsightsOptions,
    env: &EnvCredentials,
    hostname: Option<&str>,
) -> InitOutcome
where
    C: TelemetryClient + ?Sized,
{
    let explicit = options.explicit_credential();
    if explicit.is_none() && !env.is_present() {
        debug!("no Application Insights credentials, telemetry disabled");
        return InitOutcome::Skipped;
    }

    client.setup(explicit);
    client.set_auto_collect_console(true, false);
    client.start();

    if let Some(name) = options.role_name() {
        client.set_tag(TAG_CLOUD_ROLE, name.to_string());
        match hostname.filter(|h| !h.is_empty()) {
            Some(host) => client.set_tag(TAG_CLOUD_ROLE_INSTANCE, format!("{name}-{host}")),
            None => debug!("hostname not resolvable, role instance not tagged"),
        }
    }

    match options.sampling_percentage {
        Some(percentage) if percentage > 0.0 && percentage <= 100.0 => {
            client.set_sampling_percentage(percentage);
        }
        Some(percentage) if percentage != 0.0 => {
            warn!(percentage, "ignoring out-of-range sampling percentage");
        }
        _ => {}
    }

    for (_, processor) in STANDARD_PROCESSORS {
        client.add_telemetry_processor(processor);
    }

    let source = if explicit.is_some() {
        CredentialSource::Options
    } else {
        CredentialSource::Environment
    };
    info!(role = options.role_name().unwrap_or_default(), ?source, "telemetry started");
    InitOutcome::Started(source)
}

/// [`init`] with credentials and hostname taken from the process environment.
pub fn init_from_env<C>(client: &mut C, options: &AppInsightsOptions) -> InitOutcome
where
    C: TelemetryClient + ?Sized,
{
    let hostname = resolve_hostname();
    init(client, options, &EnvCredentials::from_env(), hostname.as_deref())
}
