//! App-only (client-credentials) credential provider

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};
use tunewire_common::auth::TokenSet;
use tunewire_core::CredentialProvider;
use tunewire_domain::{ClientConfig, Result};

use super::token_endpoint::TokenEndpoint;

/// Holds an application token obtained with the client-credentials grant.
///
/// There is no refresh token in this flow; a rejected or expired token is
/// simply re-acquired.
pub struct AppOnlyProvider {
    endpoint: TokenEndpoint,
    token: RwLock<Option<TokenSet>>,
    refresh_lock: Mutex<()>,
}

impl AppOnlyProvider {
    /// Create a provider without acquiring a token yet.
    pub fn new(endpoint: TokenEndpoint) -> Self {
        Self { endpoint, token: RwLock::new(None), refresh_lock: Mutex::new(()) }
    }

    /// Create a provider and acquire the first token eagerly.
    ///
    /// # Errors
    /// Fails if the token endpoint cannot be reached or rejects the client.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        let provider = Self::new(TokenEndpoint::from_config(config)?);
        provider.refresh().await?;
        Ok(provider)
    }

    /// Token currently held, if any.
    pub async fn current_token(&self) -> Option<TokenSet> {
        self.token.read().await.clone()
    }

    async fn acquire(&self) -> Result<String> {
        let token = self.endpoint.client_credentials().await?;
        let access_token = token.access_token.clone();
        info!(expires_in = token.expires_in, "Acquired app-only access token");
        *self.token.write().await = Some(token);
        Ok(access_token)
    }
}

#[async_trait]
impl CredentialProvider for AppOnlyProvider {
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref().filter(|token| !token.is_expired(0)) {
            return Ok(token.access_token.clone());
        }

        let _guard = self.refresh_lock.lock().await;
        // Another caller may have acquired while we waited.
        if let Some(token) = self.token.read().await.as_ref().filter(|token| !token.is_expired(0)) {
            return Ok(token.access_token.clone());
        }
        self.acquire().await
    }

    #[instrument(skip(self))]
    async fn refresh(&self) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;
        self.token.write().await.take();
        self.acquire().await.map(|_| ())
    }
}
