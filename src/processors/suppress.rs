//! Suppression of page-load noise.
//!
//! Only top-level `GET` requests are candidates. API calls that happen to
//! share a url shape are always kept.

use crate::envelope::{Envelope, ProcessorContext};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// A path segment followed by a `static` or `assets` directory and a file.
/// Word characters are ASCII only.
static STATIC_RESOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?-u)[\w.-]+/(?:static|assets)/\w+").expect("static resource pattern is valid")
});

const MONITOR_PATH: &str = "/_monitor";

/// Request name prefix of page loads. Case-sensitive on purpose.
const GET_PREFIX: &str = "GET ";

/// Drop `GET` requests for bundled static files and assets.
pub fn skip_static_requests(envelope: &mut Envelope, _context: Option<&ProcessorContext>) -> bool {
    let Some(url) = get_request_url(envelope) else {
        return true;
    };
    if STATIC_RESOURCE.is_match(url) {
        trace!(%url, "skipping static resource request");
        return false;
    }
    true
}

/// Drop `GET` requests to the health-check endpoint.
pub fn skip_monitor_requests(envelope: &mut Envelope, _context: Option<&ProcessorContext>) -> bool {
    let Some(url) = get_request_url(envelope) else {
        return true;
    };
    if url.contains(MONITOR_PATH) {
        trace!(%url, "skipping monitor request");
        return false;
    }
    true
}

/// The url of a well-formed `GET` request envelope.
fn get_request_url(envelope: &Envelope) -> Option<&str> {
    if !envelope.is_request() {
        return None;
    }
    if !envelope.request_name()?.starts_with(GET_PREFIX) {
        return None;
    }
    envelope.url()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{BaseData, REQUEST_DATA};
    use serde_json::json;

    fn request(name: &str, url: &str) -> Envelope {
        Envelope::new(REQUEST_DATA, BaseData::request(name, url))
    }

    // ── static ──────────────────────────────────────────────────

    #[test]
    fn test_skips_get_static() {
        assert!(!skip_static_requests(
            &mut request("GET <any_request_name>", "my-server/endpoint/static/media"),
            None
        ));
    }

    #[test]
    fn test_skips_get_assets() {
        assert!(!skip_static_requests(
            &mut request("GET <any_request_name>", "my-server/endpoint/assets/media"),
            None
        ));
    }

    #[test]
    fn test_keeps_lookalike_segments() {
        for url in [
            "my-server/profile/static-man/publications",
            "my-server/profile/assets-man/publications",
            "my-server/endpoint/static/",
            "my-server/endpoint/assets/",
        ] {
            assert!(
                skip_static_requests(&mut request("GET <any_request_name>", url), None),
                "{url} should be kept"
            );
        }
    }

    #[test]
    fn test_word_characters_are_ascii() {
        for url in ["svc/a/static/\u{e4}", "svc/\u{e4}/static/x", "svc/a/assets/\u{1d7d9}"] {
            assert!(
                skip_static_requests(&mut request("GET /a", url), None),
                "{url} should be kept"
            );
        }
        assert!(!skip_static_requests(
            &mut request("GET /a", "svc/\u{e4}a/static/x"),
            None
        ));
    }

    #[test]
    fn test_keeps_non_get_static() {
        for name in ["POST <any_request_name>", "get /lowercase", "GET/no-space"] {
            assert!(
                skip_static_requests(&mut request(name, "my-server/endpoint/static/media"), None),
                "{name} should be kept"
            );
        }
    }

    #[test]
    fn test_static_keeps_malformed_name() {
        let mut envelope = Envelope::new(
            REQUEST_DATA,
            BaseData {
                name: Some(json!({"message": "this is not a valid string"})),
                url: Some(json!("my-server/endpoint/static/media")),
                ..BaseData::default()
            },
        );
        assert!(skip_static_requests(&mut envelope, None));
    }

    #[test]
    fn test_static_keeps_missing_fields() {
        assert!(skip_static_requests(&mut Envelope::default(), None));
        assert!(skip_static_requests(
            &mut Envelope::new(REQUEST_DATA, BaseData::default()),
            None
        ));
    }

    // ── monitor ─────────────────────────────────────────────────

    #[test]
    fn test_skips_get_monitor() {
        assert!(!skip_monitor_requests(
            &mut request("GET <any_request_name>", "my-server/endpoint/_monitor"),
            None
        ));
    }

    #[test]
    fn test_skips_monitor_with_query() {
        assert!(!skip_monitor_requests(
            &mut request(
                "GET <any_request_name>",
                "my-server/endpoint/_monitor?query=my-param"
            ),
            None
        ));
    }

    #[test]
    fn test_keeps_non_get_monitor() {
        assert!(skip_monitor_requests(
            &mut request("POST <any_request_name>", "my-server/endpoint/_monitor"),
            None
        ));
    }

    #[test]
    fn test_monitor_keeps_malformed_name() {
        let mut envelope = Envelope::new(
            REQUEST_DATA,
            BaseData {
                name: Some(json!(42)),
                url: Some(json!("my-server/endpoint/_monitor")),
                ..BaseData::default()
            },
        );
        assert!(skip_monitor_requests(&mut envelope, None));
    }

    #[test]
    fn test_suppression_ignores_non_request_types() {
        let mut envelope = Envelope::new(
            crate::envelope::MESSAGE_DATA,
            BaseData::request("GET /", "svc/_monitor/static/x"),
        );
        assert!(skip_static_requests(&mut envelope, None));
        assert!(skip_monitor_requests(&mut envelope, None));
    }
}
