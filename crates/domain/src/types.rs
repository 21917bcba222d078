//! Request descriptors handed to the orchestration layer

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_wire_name_conversions;

/// HTTP methods the catalog API is called with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl_wire_name_conversions!(HttpMethod {
    Get => "GET",
    Post => "POST",
});

/// One logical call against the catalog API.
///
/// Built by the caller and never mutated once handed to the client. The
/// endpoint is relative to the API base (`me/tracks`, `users/{id}`); a leading
/// slash is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    method: HttpMethod,
    endpoint: String,
    params: Vec<(String, String)>,
    body: Option<Value>,
}

impl RequestDescriptor {
    /// Create a descriptor for the given method and endpoint.
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        let endpoint = endpoint.trim_start_matches('/').to_string();
        Self { method, endpoint, params: Vec::new(), body: None }
    }

    /// Shorthand for a GET descriptor.
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    /// Shorthand for a POST descriptor.
    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    /// Append one query parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Append several query parameters, keeping their order.
    #[must_use]
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params.extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Attach a JSON body (sent only for POST).
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}
