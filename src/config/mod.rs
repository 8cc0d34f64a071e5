//! Initialization options and credentials
//!
//! Options come from the host application (usually its own config file);
//! credentials may also come from the environment the SDK reads itself.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding a full connection string.
pub const ENV_CONNECTION_STRING: &str = "APPLICATIONINSIGHTS_CONNECTION_STRING";

/// Environment variable holding a bare instrumentation key.
pub const ENV_INSTRUMENTATION_KEY: &str = "APPINSIGHTS_INSTRUMENTATIONKEY";

/// Errors that can occur when loading options
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse options JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Explicit initialization options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInsightsOptions {
    /// Cloud role name; also the prefix of the role instance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Overrides the environment; wins over `instrumentation_key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
    /// Overrides the environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrumentation_key: Option<String>,
    /// Overrides the SDK's sampling rate (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_percentage: Option<f64>,
}

impl AppInsightsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    pub fn with_instrumentation_key(mut self, key: impl Into<String>) -> Self {
        self.instrumentation_key = Some(key.into());
        self
    }

    pub fn with_sampling_percentage(mut self, percentage: f64) -> Self {
        self.sampling_percentage = Some(percentage);
        self
    }

    /// Parse and validate options from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(percentage) = self.sampling_percentage {
            if !(0.0..=100.0).contains(&percentage) {
                return Err(ConfigError::ValidationError(format!(
                    "samplingPercentage must be between 0 and 100, got {percentage}"
                )));
            }
        }
        Ok(())
    }

    /// Credential passed to the SDK explicitly, if any.
    ///
    /// Connection string wins over instrumentation key. Empty strings count
    /// as unset.
    pub fn explicit_credential(&self) -> Option<&str> {
        non_empty(self.connection_string.as_deref())
            .or_else(|| non_empty(self.instrumentation_key.as_deref()))
    }

    /// Role name, if set and non-empty.
    pub fn role_name(&self) -> Option<&str> {
        non_empty(self.name.as_deref())
    }
}

/// Credentials visible in the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvCredentials {
    pub connection_string: Option<String>,
    pub instrumentation_key: Option<String>,
}

impl EnvCredentials {
    /// Read both credential variables.
    pub fn from_env() -> Self {
        Self {
            connection_string: std::env::var(ENV_CONNECTION_STRING).ok(),
            instrumentation_key: std::env::var(ENV_INSTRUMENTATION_KEY).ok(),
        }
    }

    /// No credentials at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether the SDK could configure itself from the environment.
    pub fn is_present(&self) -> bool {
        non_empty(self.connection_string.as_deref()).is_some()
            || non_empty(self.instrumentation_key.as_deref()).is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
