//! Authorization-code handshake helpers
//!
//! [`AuthorizationRequest`] builds the URL the user opens in a browser;
//! [`parse_authorization_response`] pulls the `code` back out of whatever the
//! user pastes (either the bare code or the full redirect URL).

use thiserror::Error;
use url::Url;

/// Parameters of the `/authorize` redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    authorize_url: String,
    client_id: String,
    redirect_uri: String,
    scopes: Vec<String>,
    state: Option<String>,
}

impl AuthorizationRequest {
    /// Create a request for `client_id` redirecting to `redirect_uri`.
    pub fn new(
        authorize_url: impl Into<String>,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            authorize_url: authorize_url.into(),
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scopes: Vec::new(),
            state: None,
        }
    }

    /// Requested scopes, joined with spaces in the URL.
    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Opaque `state` echoed back on the redirect.
    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Render the full authorization URL.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the configured authorize endpoint is not an
    /// absolute URL.
    pub fn to_url(&self) -> Result<String, url::ParseError> {
        let mut url = Url::parse(&self.authorize_url)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.client_id)
                .append_pair("response_type", "code")
                .append_pair("redirect_uri", &self.redirect_uri);
            if !self.scopes.is_empty() {
                query.append_pair("scope", &self.scopes.join(" "));
            }
            if let Some(state) = &self.state {
                query.append_pair("state", state);
            }
        }
        Ok(url.into())
    }
}

/// Why a pasted authorization response did not yield a code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationResponseError {
    /// Nothing was entered
    #[error("no authorization code entered")]
    Empty,
    /// The redirect carried `error=...` (typically `access_denied`)
    #[error("authorization denied: {0}")]
    Denied(String),
    /// A redirect URL without a `code` parameter
    #[error("redirect URL has no code parameter")]
    MissingCode,
}

/// Extract the authorization code from user input.
///
/// Accepts the bare code, or the full redirect URL
/// (`https://app/callback?code=...&state=...`).
///
/// # Errors
///
/// See [`AuthorizationResponseError`].
pub fn parse_authorization_response(input: &str) -> Result<String, AuthorizationResponseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AuthorizationResponseError::Empty);
    }

    let Ok(url) = Url::parse(input) else {
        return Ok(input.to_string());
    };

    let mut code = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "error" => return Err(AuthorizationResponseError::Denied(value.into_owned())),
            "code" => code = Some(value.into_owned()),
            _ => {}
        }
    }

    code.filter(|code| !code.is_empty()).ok_or(AuthorizationResponseError::MissingCode)
}
