//! Port interfaces for credential management
//!
//! These traits define the boundaries between the request pipeline and the
//! infrastructure that obtains, stores and renews access tokens.

use async_trait::async_trait;
use tunewire_common::auth::TokenSet;
use tunewire_domain::Result;

/// Produces a valid bearer token for API requests.
///
/// Implementations own the credential state exclusively; callers only ever
/// see the token string.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current access token, acquiring one first if none is held.
    async fn access_token(&self) -> Result<String>;

    /// Discard the held token and obtain a new one.
    ///
    /// Called after the API rejected the current token with 401.
    async fn refresh(&self) -> Result<()>;
}

/// Persistence for user-delegated tokens.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the persisted token; `Ok(None)` when nothing has been stored.
    async fn load(&self) -> Result<Option<TokenSet>>;

    /// Persist `token`, replacing any previous one.
    async fn save(&self, token: &TokenSet) -> Result<()>;

    /// Remove the persisted token. Succeeds when nothing is stored.
    async fn clear(&self) -> Result<()>;
}

/// Completes the interactive half of the authorization-code flow.
#[async_trait]
pub trait AuthorizationCompleter: Send + Sync {
    /// Present `authorize_url` to the user and return the authorization code
    /// they obtained.
    async fn authorization_code(&self, authorize_url: &str) -> Result<String>;
}
