//! Accounts-service token endpoint client
//!
//! Performs the three grants TuneWire uses, always authenticating the
//! application with `Authorization: Basic base64(client_id:client_secret)` and
//! a form-encoded body.

use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use tracing::{debug, instrument};
use tunewire_common::auth::{
    basic_authorization, expiry_after, GrantType, OAuthErrorBody, TokenResponse, TokenSet,
};
use tunewire_domain::{ClientConfig, Result, TuneWireError};

use crate::http::HttpClient;

/// Client for `POST {token_url}`.
#[derive(Clone)]
pub struct TokenEndpoint {
    http: HttpClient,
    token_url: String,
    basic_credential: String,
}

impl TokenEndpoint {
    /// Build an endpoint client from the client configuration.
    ///
    /// # Errors
    /// Returns `TuneWireError::Config` if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = HttpClient::builder().timeout(config.request_timeout).build()?;
        Ok(Self::new(http, &config.endpoints.token_url, &config.client_id, &config.client_secret))
    }

    /// Build an endpoint client around an existing HTTP client.
    pub fn new(http: HttpClient, token_url: &str, client_id: &str, client_secret: &str) -> Self {
        Self {
            http,
            token_url: token_url.to_string(),
            basic_credential: basic_authorization(client_id, client_secret),
        }
    }

    /// `grant_type=client_credentials`
    ///
    /// # Errors
    /// See [`TokenEndpoint::request_token`].
    pub async fn client_credentials(&self) -> Result<TokenSet> {
        self.request_token(GrantType::ClientCredentials, GrantType::client_credentials_form()).await
    }

    /// `grant_type=authorization_code`
    ///
    /// # Errors
    /// See [`TokenEndpoint::request_token`].
    pub async fn authorization_code(&self, code: &str, redirect_uri: &str) -> Result<TokenSet> {
        self.request_token(
            GrantType::AuthorizationCode,
            GrantType::authorization_code_form(code, redirect_uri),
        )
        .await
    }

    /// `grant_type=refresh_token`
    ///
    /// # Errors
    /// See [`TokenEndpoint::request_token`].
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenSet> {
        self.request_token(GrantType::RefreshToken, GrantType::refresh_token_form(refresh_token))
            .await
    }

    /// Post one grant and decode the token response.
    ///
    /// # Errors
    /// - `TuneWireError::Network` when the endpoint cannot be reached
    /// - `TuneWireError::Auth` when the endpoint rejects the grant
    /// - `TuneWireError::Config` when a success response is malformed
    #[instrument(skip(self, form))]
    async fn request_token(
        &self,
        grant: GrantType,
        form: Vec<(&'static str, String)>,
    ) -> Result<TokenSet> {
        let request = self
            .http
            .request(Method::POST, &self.token_url)
            .header(AUTHORIZATION, &self.basic_credential)
            .form(&form);

        let response = self.http.send(request).await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TuneWireError::Network(format!("failed to read token response: {err}")))?;

        if !status.is_success() {
            let reason = match serde_json::from_str::<OAuthErrorBody>(&body) {
                Ok(error) => error.to_string(),
                Err(_) if body.trim().is_empty() => status.to_string(),
                Err(_) => format!("{status}: {}", body.trim()),
            };
            return Err(TuneWireError::Auth(format!("{grant} grant rejected: {reason}")));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|err| {
            TuneWireError::Config(format!("malformed token response for {grant} grant: {err}"))
        })?;

        if token.access_token.is_empty() {
            return Err(TuneWireError::Config(format!(
                "token response for {grant} grant has an empty access_token"
            )));
        }

        if token.expires_in > 0 && expiry_after(token.expires_in).is_none() {
            return Err(TuneWireError::Config(format!(
                "token response for {grant} grant has an out-of-range expires_in"
            )));
        }

        debug!(expires_in = token.expires_in, "token endpoint issued a token");
        Ok(token.into())
    }
}

impl std::fmt::Debug for TokenEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEndpoint").field("token_url", &self.token_url).finish_non_exhaustive()
    }
}
