//! User-delegated (authorization-code) credential provider
//!
//! Token lifecycle:
//! 1. On connect, load the persisted token from the [`TokenStore`]
//! 2. If none is stored, run the handshake: build the authorize URL, hand it
//!    to the [`AuthorizationCompleter`], exchange the returned code, persist
//! 3. Expired tokens are renewed before use
//! 4. Renewal tries the `refresh_token` grant first; if the accounts service
//!    rejects it, the store is cleared and the handshake runs again

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use tunewire_common::auth::{AuthorizationRequest, TokenSet};
use tunewire_core::{AuthorizationCompleter, CredentialProvider, TokenStore};
use tunewire_domain::{ClientConfig, Result, TuneWireError};

use super::token_endpoint::TokenEndpoint;

/// Credential provider acting on behalf of a user.
pub struct UserDelegatedProvider {
    endpoint: TokenEndpoint,
    authorization: AuthorizationRequest,
    redirect_uri: String,
    store: Arc<dyn TokenStore>,
    completer: Arc<dyn AuthorizationCompleter>,
    token: RwLock<Option<TokenSet>>,
    refresh_lock: Mutex<()>,
}

impl UserDelegatedProvider {
    /// Create a provider without touching the store.
    ///
    /// # Errors
    /// Returns `TuneWireError::Config` when `callback_url` is not configured.
    pub fn new(
        config: &ClientConfig,
        store: Arc<dyn TokenStore>,
        completer: Arc<dyn AuthorizationCompleter>,
    ) -> Result<Self> {
        let redirect_uri = config.callback_url.clone().ok_or_else(|| {
            TuneWireError::Config("callback_url is required for user-delegated access".into())
        })?;

        let authorization = AuthorizationRequest::new(
            &config.endpoints.authorize_url,
            &config.client_id,
            &redirect_uri,
        )
        .with_scopes(config.scopes.iter().cloned());

        Ok(Self {
            endpoint: TokenEndpoint::from_config(config)?,
            authorization,
            redirect_uri,
            store,
            completer,
            token: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    /// Create a provider and make sure it holds a token, loading it from the
    /// store or running the interactive handshake.
    ///
    /// # Errors
    /// Fails if the store cannot be read, or the handshake fails.
    pub async fn connect(
        config: &ClientConfig,
        store: Arc<dyn TokenStore>,
        completer: Arc<dyn AuthorizationCompleter>,
    ) -> Result<Self> {
        let provider = Self::new(config, store, completer)?;
        provider.initialize().await?;
        Ok(provider)
    }

    /// Load the persisted token into memory, running the handshake when the
    /// store is empty. Returns `true` if a stored token was found.
    ///
    /// # Errors
    /// Fails if the store cannot be read, or the handshake fails.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<bool> {
        let _guard = self.refresh_lock.lock().await;
        self.load_or_authorize().await
    }

    /// URL the user must visit to approve access.
    ///
    /// # Errors
    /// Returns `TuneWireError::Config` if the authorize endpoint is not a valid
    /// URL.
    pub fn authorize_url(&self) -> Result<String> {
        self.authorization
            .to_url()
            .map_err(|err| TuneWireError::Config(format!("invalid authorize URL: {err}")))
    }

    /// Exchange an authorization code for a token, persist it and hold it.
    ///
    /// # Errors
    /// Fails if the exchange is rejected or the token cannot be saved.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet> {
        let token = self.endpoint.authorization_code(code, &self.redirect_uri).await?;
        self.store.save(&token).await?;
        info!(scope = token.scope.as_deref().unwrap_or(""), "Stored user-delegated access token");
        *self.token.write().await = Some(token.clone());
        Ok(token)
    }

    /// Token currently held, if any.
    pub async fn current_token(&self) -> Option<TokenSet> {
        self.token.read().await.clone()
    }

    async fn load_or_authorize(&self) -> Result<bool> {
        if let Some(token) = self.store.load().await? {
            debug!("Loaded persisted user token");
            *self.token.write().await = Some(token);
            return Ok(true);
        }

        debug!("No persisted user token, starting authorization");
        self.authorize_interactively().await?;
        Ok(false)
    }

    async fn authorize_interactively(&self) -> Result<()> {
        let url = self.authorize_url()?;
        let code = self.completer.authorization_code(&url).await?;
        self.exchange_code(&code).await.map(|_| ())
    }

    /// Renew the held token. Caller must hold `refresh_lock`.
    async fn renew(&self) -> Result<()> {
        let current = self.token.read().await.clone();

        if let Some(current) = current.filter(TokenSet::can_refresh) {
            let refresh_token = current.refresh_token.as_deref().unwrap_or_default();
            match self.endpoint.refresh_token(refresh_token).await {
                Ok(token) => {
                    let token = token.inherit_refresh_token(&current);
                    self.store.save(&token).await?;
                    info!(expires_in = token.expires_in, "Refreshed user-delegated access token");
                    *self.token.write().await = Some(token);
                    return Ok(());
                }
                Err(TuneWireError::Auth(reason)) => {
                    warn!(%reason, "Refresh token rejected, re-authorizing");
                }
                Err(other) => return Err(other),
            }
        }

        self.token.write().await.take();
        self.store.clear().await?;
        self.authorize_interactively().await
    }
}

#[async_trait]
impl CredentialProvider for UserDelegatedProvider {
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref().filter(|token| !token.is_expired(0)) {
            return Ok(token.access_token.clone());
        }

        let _guard = self.refresh_lock.lock().await;
        let held = self.token.read().await.clone();
        match held {
            Some(token) if !token.is_expired(0) => return Ok(token.access_token),
            Some(_) => {
                debug!("Held user token expired, renewing");
                self.renew().await?;
            }
            None => {
                self.load_or_authorize().await?;
                let reloaded = self.token.read().await.clone();
                if reloaded.as_ref().is_some_and(|token| token.is_expired(0)) {
                    self.renew().await?;
                }
            }
        }

        self.token
            .read()
            .await
            .as_ref()
            .map(|token| token.access_token.clone())
            .ok_or_else(|| TuneWireError::Auth("no user token available".into()))
    }

    #[instrument(skip(self))]
    async fn refresh(&self) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;
        self.renew().await
    }
}
