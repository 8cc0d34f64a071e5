//! Per-request context handed to processors alongside an envelope.

use std::collections::HashMap;

/// Context the client passes with each envelope.
///
/// Empty for telemetry that was not produced while serving a request.
#[derive(Debug, Clone, Default)]
pub struct ProcessorContext {
    pub request: Option<ServerRequest>,
}

impl ProcessorContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the incoming server request.
    pub fn with_request(mut self, request: ServerRequest) -> Self {
        self.request = Some(request);
        self
    }
}

/// The incoming HTTP request being served.
#[derive(Debug, Clone, Default)]
pub struct ServerRequest {
    /// Header values keyed by lowercased name
    headers: HashMap<String, String>,
    /// Client resolved by API-key authentication, if any
    pub api_client: Option<ApiClient>,
}

impl ServerRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_api_client(mut self, client: ApiClient) -> Self {
        self.api_client = Some(client);
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// API client descriptor attached by the authentication layer.
#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    pub name: Option<String>,
}

impl ApiClient {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}
