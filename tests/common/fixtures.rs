//! Envelope and context fixtures.
//!
//! Envelopes are built from their JSON wire form, the same shape the SDK
//! hands to processors.

use chrono::{DateTime, TimeZone, Utc};
use kth_appinsights::envelope::{ApiClient, Envelope, ProcessorContext, ServerRequest};
use serde_json::{json, Value};

/// A request envelope with the given name and url.
pub fn request(name: &str, url: &str) -> Envelope {
    envelope(json!({
        "data": {
            "baseType": "RequestData",
            "baseData": { "name": name, "url": url }
        }
    }))
}

/// A message envelope carrying `message`.
pub fn message(message: Value) -> Envelope {
    envelope(json!({
        "data": {
            "baseType": "MessageData",
            "baseData": { "message": message }
        }
    }))
}

/// Parse an envelope from a JSON value.
pub fn envelope(value: Value) -> Envelope {
    serde_json::from_value(value).expect("fixture envelope is valid")
}

/// Context of a request carrying the given headers.
pub fn with_headers(headers: &[(&str, &str)]) -> ProcessorContext {
    let request = headers
        .iter()
        .fold(ServerRequest::new(), |req, (name, value)| {
            req.with_header(name, *value)
        });
    ProcessorContext::new().with_request(request)
}

/// Context of a request authenticated as API client `name`.
pub fn with_api_client(name: &str) -> ProcessorContext {
    ProcessorContext::new()
        .with_request(ServerRequest::new().with_api_client(ApiClient::named(name)))
}

/// A fixed point in time.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}
