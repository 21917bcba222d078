//! Single authenticated request against the catalog API
//!
//! [`RequestExecutor`] performs exactly one HTTP exchange per call: governor
//! wait, bearer token, send, classify. It never retries; that is the job of
//! [`RetryOrchestrator`](super::retry::RetryOrchestrator).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::{AUTHORIZATION, RETRY_AFTER};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use tunewire_common::auth::bearer_authorization;
use tunewire_common::resilience::RateGovernor;
use tunewire_core::{is_paginated, CredentialProvider, ErrorSink};
use tunewire_domain::{ClientConfig, Endpoints, HttpMethod, RequestDescriptor};

use super::errors::ApiError;
use crate::http::HttpClient;

/// Successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// First page of a paginated listing (an object carrying `limit`)
    Page(Value),
    /// Any other JSON body; an empty body is `null`
    Document(Value),
}

impl Payload {
    /// Sort a decoded body into page or document.
    pub fn from_body(body: Value) -> Self {
        if is_paginated(&body) {
            Self::Page(body)
        } else {
            Self::Document(body)
        }
    }

    /// The JSON body, whichever kind it is.
    pub fn into_value(self) -> Value {
        match self {
            Self::Page(value) | Self::Document(value) => value,
        }
    }

    /// Whether this is a paginated listing.
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page(_))
    }
}

/// One attempt at a request.
#[async_trait]
pub trait Execute: Send + Sync {
    /// Perform the request, returning the decoded body or a classified error.
    async fn execute(&self, request: &RequestDescriptor) -> Result<Payload, ApiError>;
}

/// Issues authenticated, rate-governed requests.
pub struct RequestExecutor {
    http: HttpClient,
    endpoints: Endpoints,
    governor: RateGovernor,
    credentials: Arc<dyn CredentialProvider>,
    error_sink: Option<Arc<dyn ErrorSink>>,
    server_error_cooldown: Duration,
    most_recent_endpoint: Mutex<Option<String>>,
}

impl RequestExecutor {
    /// Build an executor for `config`, authenticating through `credentials`.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HttpClient: {err}")))?;

        Ok(Self {
            http,
            endpoints: config.endpoints.clone(),
            governor: RateGovernor::new(config.min_request_interval),
            credentials,
            error_sink: None,
            server_error_cooldown: config.server_error_cooldown,
            most_recent_endpoint: Mutex::new(None),
        })
    }

    /// Record every classified HTTP failure to `sink`.
    #[must_use]
    pub fn with_error_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.error_sink = Some(sink);
        self
    }

    /// Endpoint of the last request issued, if any.
    pub fn most_recent_endpoint(&self) -> Option<String> {
        self.most_recent_endpoint.lock().clone()
    }

    /// Upstream locations this executor talks to.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn report(&self, error: &ApiError) {
        let Some(details) = error.details() else {
            return;
        };

        warn!(
            status = details.status,
            endpoint = %details.endpoint,
            message = %details.message,
            "Catalog API returned an error"
        );

        if let Some(sink) = &self.error_sink {
            if let Err(err) = sink.record(details.status, &details.message, &details.endpoint).await
            {
                warn!(error = %err, "Failed to write error log entry");
            }
        }
    }
}

#[async_trait]
impl Execute for RequestExecutor {
    async fn execute(&self, request: &RequestDescriptor) -> Result<Payload, ApiError> {
        let endpoint = request.endpoint();
        let url = self.endpoints.api_url(endpoint);

        self.governor.wait_if_needed().await;
        *self.most_recent_endpoint.lock() = Some(endpoint.to_string());

        let token = self.credentials.access_token().await?;

        let method = match request.method() {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };
        let mut builder = self
            .http
            .request(method, &url)
            .header(AUTHORIZATION, bearer_authorization(&token))
            .query(request.params());
        if let (HttpMethod::Post, Some(body)) = (request.method(), request.body()) {
            builder = builder.json(body);
        }

        debug!(method = %request.method(), %endpoint, "Executing catalog request");
        let response =
            self.http.send(builder).await.map_err(|err| ApiError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Transport(format!("failed to read response body: {err}")))?;

        if let Some(error) = ApiError::from_response(
            status,
            retry_after.as_deref(),
            &body,
            endpoint,
            self.server_error_cooldown,
        ) {
            self.report(&error).await;

            if matches!(error, ApiError::AuthExpired(_)) {
                debug!(%endpoint, "Access token rejected, refreshing credentials");
                self.credentials.refresh().await?;
            }
            return Err(error);
        }

        let value = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body)
                .map_err(|err| ApiError::Decode(format!("{endpoint} returned invalid JSON: {err}")))?
        };

        Ok(Payload::from_body(value))
    }
}
