//! Client configuration
//!
//! Values only: loading them from the environment or from files is done by
//! `tunewire_infra::config`.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    API_BASE_URL, AUTHORIZE_URL, DEFAULT_MAX_RETRY_ATTEMPTS, DEFAULT_MIN_REQUEST_INTERVAL_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SCOPES, DEFAULT_SERVER_ERROR_COOLDOWN_SECS,
    DEFAULT_TOKEN_PATH, TOKEN_URL,
};
use crate::errors::{Result, TuneWireError};

/// Locations of the upstream services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Versioned API base, always ending in `/`
    pub api_base_url: String,
    /// OAuth token endpoint
    pub token_url: String,
    /// OAuth authorize endpoint (user-delegated flow only)
    pub authorize_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base_url: API_BASE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            authorize_url: AUTHORIZE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Endpoints laid out under a single root, as a mock server would serve
    /// them: `{root}/v1/`, `{root}/api/token`, `{root}/authorize`.
    pub fn under_root(root: &str) -> Self {
        let root = root.trim_end_matches('/');
        Self {
            api_base_url: format!("{root}/v1/"),
            token_url: format!("{root}/api/token"),
            authorize_url: format!("{root}/authorize"),
        }
    }

    /// Join an endpoint onto the API base.
    pub fn api_url(&self, endpoint: &str) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        format!("{}/{}", base, endpoint.trim_start_matches('/'))
    }

    /// Turn an absolute "next page" link back into an endpoint. Links that are
    /// already relative come back unchanged.
    pub fn relative_endpoint<'a>(&self, link: &'a str) -> &'a str {
        let base = self.api_base_url.trim_end_matches('/');
        match link.strip_prefix(base) {
            Some(rest) => rest.trim_start_matches('/'),
            None => link.trim_start_matches('/'),
        }
    }
}

/// Configuration for a catalog client instance
#[derive(Clone)]
pub struct ClientConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URI registered for the user-delegated flow
    pub callback_url: Option<String>,
    /// Permissions requested by the user-delegated flow, in order
    pub scopes: Vec<String>,
    pub min_request_interval: Duration,
    pub max_retry_attempts: u32,
    /// Wait applied after a 5xx response before the next attempt
    pub server_error_cooldown: Duration,
    pub request_timeout: Duration,
    /// Where the user-delegated token is persisted
    pub token_path: PathBuf,
    /// `status|message|endpoint` log of upstream errors, if wanted
    pub error_log_path: Option<PathBuf>,
    pub endpoints: Endpoints,
}

impl ClientConfig {
    /// Configuration with every optional value at its default.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            callback_url: None,
            scopes: DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect(),
            min_request_interval: Duration::from_secs(DEFAULT_MIN_REQUEST_INTERVAL_SECS),
            max_retry_attempts: DEFAULT_MAX_RETRY_ATTEMPTS,
            server_error_cooldown: Duration::from_secs(DEFAULT_SERVER_ERROR_COOLDOWN_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            error_log_path: None,
            endpoints: Endpoints::default(),
        }
    }

    #[must_use]
    pub fn with_callback_url(mut self, url: impl Into<String>) -> Self {
        self.callback_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    #[must_use]
    pub fn with_max_retry_attempts(mut self, attempts: u32) -> Self {
        self.max_retry_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_server_error_cooldown(mut self, cooldown: Duration) -> Self {
        self.server_error_cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    #[must_use]
    pub fn with_error_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.error_log_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Space-separated scope string as sent to the authorize endpoint.
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }

    /// Check the values the client cannot work without.
    ///
    /// # Errors
    /// Returns `TuneWireError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(TuneWireError::Config("client_id must not be empty".into()));
        }
        if self.client_secret.trim().is_empty() {
            return Err(TuneWireError::Config("client_secret must not be empty".into()));
        }
        if self.max_retry_attempts == 0 {
            return Err(TuneWireError::Config("max_retry_attempts must be at least 1".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(TuneWireError::Config("request_timeout must be greater than zero".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("callback_url", &self.callback_url)
            .field("scopes", &self.scopes)
            .field("min_request_interval", &self.min_request_interval)
            .field("max_retry_attempts", &self.max_retry_attempts)
            .field("server_error_cooldown", &self.server_error_cooldown)
            .field("request_timeout", &self.request_timeout)
            .field("token_path", &self.token_path)
            .field("error_log_path", &self.error_log_path)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}
