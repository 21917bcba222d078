//! OAuth 2.0 token types
//!
//! Data structures shared by the token endpoint client, the credential
//! providers and the token stores. A [`TokenSet`] is what gets held in memory
//! and persisted; a [`TokenResponse`] is what the authorization server sends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access token plus the metadata needed to refresh it.
///
/// `refresh_token` is only issued by the authorization-code grant; app-only
/// (client-credentials) tokens carry `None` and are re-acquired instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer token attached to every API request
    pub access_token: String,

    /// Refresh token for the `refresh_token` grant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token type (always "Bearer" for this API)
    pub token_type: String,

    /// Access token lifetime in seconds (0 when the server did not say)
    pub expires_in: i64,

    /// Absolute expiration timestamp (UTC), derived from `expires_in`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Granted scopes (space-separated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// `now + seconds`, or `None` when the result is out of range.
#[must_use]
pub fn expiry_after(seconds: i64) -> Option<DateTime<Utc>> {
    chrono::Duration::try_seconds(seconds).and_then(|delta| Utc::now().checked_add_signed(delta))
}

impl TokenSet {
    /// Create a new `TokenSet`, computing `expires_at` from `expires_in`.
    ///
    /// A lifetime too large to represent leaves `expires_at` unset.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_in: i64,
        scope: Option<String>,
    ) -> Self {
        let expires_at = if expires_in > 0 { expiry_after(expires_in) } else { None };

        Self {
            access_token: access_token.into(),
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in,
            expires_at,
            scope,
        }
    }

    /// Check if the access token is expired or will expire within
    /// `threshold_seconds`.
    ///
    /// Tokens without an expiry are treated as valid until the API rejects
    /// them.
    #[must_use]
    pub fn is_expired(&self, threshold_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => expiry_after(threshold_seconds).map_or(true, |t| t >= expires_at),
            None => false,
        }
    }

    /// Seconds until expiry, if an expiry is known.
    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|expires_at| (expires_at - Utc::now()).num_seconds())
    }

    /// Whether this token can be renewed without user interaction.
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// Carry over the refresh token from `previous` when this token was
    /// issued without one.
    ///
    /// The refresh grant may omit `refresh_token`, in which case the old one
    /// stays valid.
    #[must_use]
    pub fn inherit_refresh_token(mut self, previous: &TokenSet) -> Self {
        if self.refresh_token.is_none() {
            self.refresh_token.clone_from(&previous.refresh_token);
        }
        self
    }
}

/// Token endpoint success body (RFC 6749 section 5.1).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Issued access token
    pub access_token: String,
    /// Refresh token (authorization-code and refresh grants only)
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token type
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: i64,
    /// Granted scopes
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        let mut token = Self::new(
            response.access_token,
            response.refresh_token,
            response.expires_in,
            response.scope.filter(|scope| !scope.is_empty()),
        );
        token.token_type = response.token_type;
        token
    }
}

/// Token endpoint error body (RFC 6749 section 5.2).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthErrorBody {
    /// Error code, e.g. `invalid_client`
    pub error: String,
    /// Human-readable description
    #[serde(default)]
    pub error_description: Option<String>,
}

impl std::fmt::Display for OAuthErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "{}: {}", self.error, description),
            None => write!(f, "{}", self.error),
        }
    }
}
