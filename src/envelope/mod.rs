//! Telemetry envelope model
//!
//! Mirrors the Application Insights wire layout closely enough for the
//! processors to inspect and enrich outgoing records. Everything is optional:
//! a missing field is the common case, not an error.

mod context;

pub use context::{ApiClient, ProcessorContext, ServerRequest};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// `baseType` of incoming request telemetry.
pub const REQUEST_DATA: &str = "RequestData";

/// `baseType` of trace/log message telemetry.
pub const MESSAGE_DATA: &str = "MessageData";

/// One telemetry record about to be emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "iKey", default, skip_serializing_if = "Option::is_none")]
    pub i_key: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EnvelopeData>,
}

/// Type discriminant plus the type-specific payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_data: Option<BaseData>,
}

/// Type-specific payload.
///
/// `name`, `url` and `message` are kept as raw JSON values because the
/// producer does not guarantee they are strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    /// Custom properties. Enrichers write strings; other values already
    /// present are carried through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    /// Any other field, preserved as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// Create an envelope with the given `baseType` and payload.
    pub fn new(base_type: &str, base_data: BaseData) -> Self {
        Self {
            data: Some(EnvelopeData {
                base_type: Some(base_type.to_string()),
                base_data: Some(base_data),
            }),
            ..Self::default()
        }
    }

    /// Parse an envelope from its JSON representation.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// The `baseType` discriminant, if any.
    pub fn base_type(&self) -> Option<&str> {
        self.data.as_ref()?.base_type.as_deref()
    }

    pub fn is_request(&self) -> bool {
        self.base_type() == Some(REQUEST_DATA)
    }

    pub fn is_message(&self) -> bool {
        self.base_type() == Some(MESSAGE_DATA)
    }

    pub fn base_data(&self) -> Option<&BaseData> {
        self.data.as_ref()?.base_data.as_ref()
    }

    pub fn base_data_mut(&mut self) -> Option<&mut BaseData> {
        self.data.as_mut()?.base_data.as_mut()
    }

    /// Request name, only when it is a string.
    pub fn request_name(&self) -> Option<&str> {
        self.base_data()?.name.as_ref()?.as_str()
    }

    /// Request url, only when it is a string.
    pub fn url(&self) -> Option<&str> {
        self.base_data()?.url.as_ref()?.as_str()
    }

    /// Look up a custom string property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.base_data()?.properties.as_ref()?.get(key)?.as_str()
    }

    /// Set a custom property, creating `data`, `baseData` and `properties`
    /// on the way when they are missing. Sibling fields are left alone.
    pub fn set_property(&mut self, key: &str, value: impl Into<String>) {
        self.data
            .get_or_insert_with(EnvelopeData::default)
            .base_data
            .get_or_insert_with(BaseData::default)
            .properties
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), Value::String(value.into()));
    }
}

impl BaseData {
    /// Payload of a request envelope.
    pub fn request(name: &str, url: &str) -> Self {
        Self {
            name: Some(Value::String(name.to_string())),
            url: Some(Value::String(url.to_string())),
            ..Self::default()
        }
    }

    /// Payload of a message envelope.
    pub fn message(message: impl Into<Value>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Synthetic request record reported for one tracked job run.
///
/// `url` and `result_code` are always empty; the ingestion schema requires
/// them but a job run has neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestTelemetry {
    pub time: DateTime<Utc>,
    /// Milliseconds between start and completion.
    pub duration: i64,
    pub name: String,
    pub properties: BTreeMap<String, Value>,
    pub url: String,
    pub result_code: String,
    pub success: bool,
}
