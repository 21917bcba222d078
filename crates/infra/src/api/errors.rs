//! API-specific error types
//!
//! Every non-2xx response from the catalog API is classified into exactly one
//! HTTP variant of [`ApiError`]. The remaining variants cover failures that
//! never produced an HTTP status (credentials, transport, decoding) and the
//! orchestrator's own [`ApiError::RetriesExhausted`].

use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tunewire_common::resilience::{RetryDecision, Retryable};
use tunewire_domain::constants::DEFAULT_RETRY_AFTER_SECS;
use tunewire_domain::TuneWireError;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401, or the credential provider itself failed
    Authentication,
    /// 429 - retry after the advertised delay
    RateLimit,
    /// 5xx - retry after the cooldown
    Server,
    /// 400/404 - non-retryable
    Client,
    /// Unclassified statuses
    Unknown,
    /// Connection or timeout failures
    Network,
    /// Response bodies that do not have the expected shape
    Protocol,
    /// Configuration errors - non-retryable
    Config,
}

/// Status, message and endpoint carried by every HTTP-derived error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    /// Upstream HTTP status
    pub status: u16,
    /// Human-readable message (upstream error message when available)
    pub message: String,
    /// Endpoint of the most recent request
    pub endpoint: String,
}

impl ErrorDetails {
    /// Bundle the three fields.
    pub fn new(status: u16, message: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self { status, message: message.into(), endpoint: endpoint.into() }
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (endpoint: {})", self.status, self.message, self.endpoint)
    }
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400
    #[error("Invalid request: {0}")]
    InvalidRequest(ErrorDetails),

    /// 404
    #[error("Not found: {0}")]
    NotFound(ErrorDetails),

    /// 429, with the delay requested by the `Retry-After` header
    #[error("Rate limited for {retry_after:?}: {details}")]
    RateLimited {
        /// How long to wait before the next attempt
        retry_after: Duration,
        /// Upstream details
        details: ErrorDetails,
    },

    /// 401; the credential provider has already been asked to refresh
    #[error("Access token expired: {0}")]
    AuthExpired(ErrorDetails),

    /// 5xx
    #[error("Server error: {details}")]
    ServerError {
        /// Wait before the next attempt
        cooldown: Duration,
        /// Upstream details
        details: ErrorDetails,
    },

    /// Any other non-2xx status
    #[error("Unexpected response: {details}")]
    Unknown {
        /// Upstream details
        details: ErrorDetails,
        /// Raw response body
        body: String,
    },

    /// The attempt budget ran out; `last` is the final observed error
    #[error("Giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Attempts made
        attempts: u32,
        /// Error from the final attempt
        #[source]
        last: Box<ApiError>,
    },

    /// Acquiring or refreshing credentials failed
    #[error("Credential error: {0}")]
    Credentials(#[from] TuneWireError),

    /// Connection failure or timeout
    #[error("Transport error: {0}")]
    Transport(String),

    /// A success response whose body is not valid JSON, or does not fit the
    /// requested type
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A page in a paginated listing had an unexpected shape
    #[error("Pagination error: {0}")]
    Pagination(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Classify an HTTP response. Returns `None` for statuses below 400.
    ///
    /// `retry_after` is the raw `Retry-After` header value, if any; `cooldown`
    /// is the wait attached to server errors.
    pub fn from_response(
        status: u16,
        retry_after: Option<&str>,
        body: &str,
        endpoint: &str,
        cooldown: Duration,
    ) -> Option<Self> {
        if status < 400 {
            return None;
        }

        let details = ErrorDetails::new(status, extract_message(status, body), endpoint);

        let error = match status {
            400 => Self::InvalidRequest(details),
            401 => Self::AuthExpired(details),
            404 => Self::NotFound(details),
            429 => Self::RateLimited { retry_after: parse_retry_after(retry_after), details },
            500..=u16::MAX => Self::ServerError { cooldown, details },
            _ => Self::Unknown { details, body: body.to_string() },
        };

        Some(error)
    }

    /// Status, message and endpoint for HTTP-derived errors.
    ///
    /// For [`ApiError::RetriesExhausted`] this is the last error's details.
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            Self::InvalidRequest(details)
            | Self::NotFound(details)
            | Self::AuthExpired(details)
            | Self::RateLimited { details, .. }
            | Self::ServerError { details, .. }
            | Self::Unknown { details, .. } => Some(details),
            Self::RetriesExhausted { last, .. } => last.details(),
            Self::Credentials(_)
            | Self::Transport(_)
            | Self::Decode(_)
            | Self::Pagination(_)
            | Self::Config(_) => None,
        }
    }

    /// Upstream HTTP status, if this error came from a response.
    pub fn status_code(&self) -> Option<u16> {
        self.details().map(|details| details.status)
    }

    /// Human-readable message.
    pub fn message(&self) -> String {
        match self.details() {
            Some(details) => details.message.clone(),
            None => match self {
                Self::Credentials(err) => err.to_string(),
                Self::Transport(message)
                | Self::Decode(message)
                | Self::Pagination(message)
                | Self::Config(message) => message.clone(),
                other => other.to_string(),
            },
        }
    }

    /// Endpoint of the request that failed, if known.
    pub fn endpoint(&self) -> Option<&str> {
        self.details().map(|details| details.endpoint.as_str())
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::InvalidRequest(_) | Self::NotFound(_) => ApiErrorCategory::Client,
            Self::RateLimited { .. } => ApiErrorCategory::RateLimit,
            Self::AuthExpired(_) | Self::Credentials(_) => ApiErrorCategory::Authentication,
            Self::ServerError { .. } => ApiErrorCategory::Server,
            Self::Unknown { .. } => ApiErrorCategory::Unknown,
            Self::RetriesExhausted { last, .. } => last.category(),
            Self::Transport(_) => ApiErrorCategory::Network,
            Self::Decode(_) | Self::Pagination(_) => ApiErrorCategory::Protocol,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Check if this error should be retried
    pub fn should_retry(&self) -> bool {
        self.retry_decision().should_retry()
    }
}

impl Retryable for ApiError {
    fn retry_decision(&self) -> RetryDecision {
        match self {
            Self::RateLimited { retry_after, .. } => RetryDecision::RetryAfter(*retry_after),
            Self::ServerError { cooldown, .. } => RetryDecision::RetryAfter(*cooldown),
            Self::AuthExpired(_) | Self::Unknown { .. } => RetryDecision::Retry,
            Self::InvalidRequest(_)
            | Self::NotFound(_)
            | Self::RetriesExhausted { .. }
            | Self::Credentials(_)
            | Self::Transport(_)
            | Self::Decode(_)
            | Self::Pagination(_)
            | Self::Config(_) => RetryDecision::Stop,
        }
    }
}

/// Pull a message out of `{"error": {"status": N, "message": "..."}}`,
/// falling back to the raw body and then the reason phrase.
fn extract_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = match value.get("error") {
            Some(Value::Object(error)) => error.get("message").and_then(Value::as_str),
            Some(Value::String(error)) => value
                .get("error_description")
                .and_then(Value::as_str)
                .or(Some(error.as_str())),
            _ => None,
        };
        if let Some(message) = message.filter(|message| !message.is_empty()) {
            return message.to_string();
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    StatusCode::from_u16(status)
        .ok()
        .and_then(|status| status.canonical_reason())
        .unwrap_or("unknown status")
        .to_string()
}

fn parse_retry_after(value: Option<&str>) -> Duration {
    let seconds = value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
    Duration::from_secs(seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_secs(60);

    fn classify(status: u16) -> ApiError {
        ApiError::from_response(status, None, "", "me/tracks", COOLDOWN).expect("error status")
    }

    #[test]
    fn success_and_redirect_statuses_are_not_errors() {
        for status in [200, 201, 204, 304, 399] {
            assert!(ApiError::from_response(status, None, "", "x", COOLDOWN).is_none());
        }
    }

    #[test]
    fn status_codes_map_to_variants() {
        assert!(matches!(classify(400), ApiError::InvalidRequest(_)));
        assert!(matches!(classify(401), ApiError::AuthExpired(_)));
        assert!(matches!(classify(404), ApiError::NotFound(_)));
        assert!(matches!(classify(429), ApiError::RateLimited { .. }));
        assert!(matches!(classify(500), ApiError::ServerError { .. }));
        assert!(matches!(classify(599), ApiError::ServerError { .. }));
        assert!(matches!(classify(403), ApiError::Unknown { .. }));
        assert!(matches!(classify(418), ApiError::Unknown { .. }));
    }

    #[test]
    fn every_http_error_exposes_status_message_and_endpoint() {
        for status in [400, 401, 403, 404, 429, 500, 503] {
            let error = classify(status);
            assert_eq!(error.status_code(), Some(status));
            assert_eq!(error.endpoint(), Some("me/tracks"));
            assert!(!error.message().is_empty());
        }
    }

    #[test]
    fn retry_after_header_is_parsed() {
        let error =
            ApiError::from_response(429, Some(" 7 "), "", "search", COOLDOWN).expect("error");
        match error {
            ApiError::RateLimited { retry_after, .. } => {
                assert_eq!(retry_after, Duration::from_secs(7))
            }
            other => panic!("expected rate limit, got {other:?}"),
        }
    }

    #[test]
    fn missing_or_garbled_retry_after_defaults_to_one_second() {
        for header in [None, Some("soon"), Some("")] {
            let error = ApiError::from_response(429, header, "", "search", COOLDOWN).unwrap();
            assert_eq!(error.retry_decision(), RetryDecision::RetryAfter(Duration::from_secs(1)));
        }
    }

    #[test]
    fn server_error_carries_configured_cooldown() {
        let cooldown = Duration::from_millis(250);
        let error = ApiError::from_response(502, None, "", "x", cooldown).unwrap();
        assert_eq!(error.retry_decision(), RetryDecision::RetryAfter(cooldown));
    }

    #[test]
    fn message_is_taken_from_error_envelope() {
        let body = r#"{"error":{"status":404,"message":"Non existing id: 'xyz'"}}"#;
        let error = ApiError::from_response(404, None, body, "tracks/xyz", COOLDOWN).unwrap();
        assert_eq!(error.message(), "Non existing id: 'xyz'");
    }

    #[test]
    fn message_falls_back_to_body_then_reason_phrase() {
        let error = ApiError::from_response(400, None, "bad things\n", "x", COOLDOWN).unwrap();
        assert_eq!(error.message(), "bad things");

        let error = ApiError::from_response(404, None, "", "x", COOLDOWN).unwrap();
        assert_eq!(error.message(), "Not Found");
    }

    #[test]
    fn oauth_style_error_body_uses_description() {
        let body = r#"{"error":"invalid_client","error_description":"Invalid client secret"}"#;
        let error = ApiError::from_response(400, None, body, "x", COOLDOWN).unwrap();
        assert_eq!(error.message(), "Invalid client secret");
    }

    #[test]
    fn unknown_keeps_raw_body() {
        let error = ApiError::from_response(409, None, "conflict!", "x", COOLDOWN).unwrap();
        match error {
            ApiError::Unknown { body, details } => {
                assert_eq!(body, "conflict!");
                assert_eq!(details.status, 409);
            }
            other => panic!("expected unknown, got {other:?}"),
        }
    }

    #[test]
    fn retry_decisions_follow_the_taxonomy() {
        assert_eq!(classify(401).retry_decision(), RetryDecision::Retry);
        assert_eq!(classify(418).retry_decision(), RetryDecision::Retry);
        assert_eq!(classify(400).retry_decision(), RetryDecision::Stop);
        assert_eq!(classify(404).retry_decision(), RetryDecision::Stop);
        assert!(!ApiError::Transport("timeout".into()).should_retry());
        assert!(!ApiError::Credentials(TuneWireError::Network("down".into())).should_retry());
        assert!(!ApiError::Decode("eof".into()).should_retry());
    }

    #[test]
    fn error_categories() {
        assert_eq!(classify(400).category(), ApiErrorCategory::Client);
        assert_eq!(classify(401).category(), ApiErrorCategory::Authentication);
        assert_eq!(classify(429).category(), ApiErrorCategory::RateLimit);
        assert_eq!(classify(500).category(), ApiErrorCategory::Server);
        assert_eq!(ApiError::Transport("x".into()).category(), ApiErrorCategory::Network);
        assert_eq!(ApiError::Pagination("x".into()).category(), ApiErrorCategory::Protocol);
    }

    #[test]
    fn exhausted_error_delegates_to_last() {
        let error = ApiError::RetriesExhausted { attempts: 5, last: Box::new(classify(503)) };

        assert_eq!(error.status_code(), Some(503));
        assert_eq!(error.endpoint(), Some("me/tracks"));
        assert_eq!(error.category(), ApiErrorCategory::Server);
        assert_eq!(error.retry_decision(), RetryDecision::Stop);
        assert!(error.to_string().starts_with("Giving up after 5 attempts"));
    }

    #[test]
    fn non_http_errors_have_no_status() {
        let error = ApiError::Credentials(TuneWireError::Auth("invalid_client".into()));
        assert_eq!(error.status_code(), None);
        assert_eq!(error.endpoint(), None);
        assert_eq!(error.message(), "Authentication error: invalid_client");
    }
}
