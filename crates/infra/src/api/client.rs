//! Catalog API client facade
//!
//! Composes the pipeline: [`RetryOrchestrator`] → [`RequestExecutor`] →
//! (rate governor, credential provider) → network, with paginated listings
//! expanded by the [`Pager`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, instrument};
use tunewire_core::{AuthorizationCompleter, CredentialProvider, ErrorSink, TokenStore};
use tunewire_domain::{ClientConfig, RequestDescriptor};

use super::errors::ApiError;
use super::executor::{Payload, RequestExecutor};
use super::pager::Pager;
use super::retry::RetryOrchestrator;
use crate::auth::{AppOnlyProvider, UserDelegatedProvider};
use crate::diagnostics::ErrorLogFile;

/// Rate-limited, retrying, paginating client for the catalog API.
///
/// Cheap to share behind an `Arc`; concurrent calls on one instance are
/// spaced by the same rate governor.
pub struct CatalogClient {
    orchestrator: RetryOrchestrator<RequestExecutor>,
}

impl CatalogClient {
    /// Client with app-only credentials. Acquires the first token before
    /// returning.
    ///
    /// # Errors
    /// `ApiError::Config` for invalid configuration, `ApiError::Credentials`
    /// if the token cannot be acquired.
    #[instrument(skip(config), fields(client_id = %config.client_id))]
    pub async fn app_only(config: ClientConfig) -> Result<Self, ApiError> {
        validate(&config)?;
        let provider = AppOnlyProvider::connect(&config).await?;
        info!("Catalog client ready (app-only)");
        Self::with_credentials(config, Arc::new(provider))
    }

    /// Client acting on behalf of a user. Loads the token from `store`,
    /// running the handshake through `completer` when none is stored.
    ///
    /// # Errors
    /// `ApiError::Config` for invalid configuration (including a missing
    /// `callback_url`), `ApiError::Credentials` if no token can be obtained.
    #[instrument(skip(config, store, completer), fields(client_id = %config.client_id))]
    pub async fn user_delegated(
        config: ClientConfig,
        store: Arc<dyn TokenStore>,
        completer: Arc<dyn AuthorizationCompleter>,
    ) -> Result<Self, ApiError> {
        validate(&config)?;
        if config.callback_url.is_none() {
            return Err(ApiError::Config("callback_url is required for user authorization".into()));
        }
        let provider = UserDelegatedProvider::connect(&config, store, completer).await?;
        info!("Catalog client ready (user-delegated)");
        Self::with_credentials(config, Arc::new(provider))
    }

    /// Client using an already constructed credential provider.
    ///
    /// If `config.error_log_path` is set, failures are also appended there.
    ///
    /// # Errors
    /// `ApiError::Config` for invalid configuration.
    pub fn with_credentials(
        config: ClientConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiError> {
        validate(&config)?;

        let mut executor = RequestExecutor::new(&config, credentials)?;
        if let Some(path) = &config.error_log_path {
            executor = executor.with_error_sink(Arc::new(ErrorLogFile::new(path)));
        }

        Ok(Self { orchestrator: RetryOrchestrator::new(executor, config.max_retry_attempts) })
    }

    /// Replace the error sink.
    #[must_use]
    pub fn with_error_sink(self, sink: Arc<dyn ErrorSink>) -> Self {
        let max_attempts = self.orchestrator.max_attempts();
        let executor = self.orchestrator.into_executor().with_error_sink(sink);
        Self { orchestrator: RetryOrchestrator::new(executor, max_attempts) }
    }

    /// GET `endpoint` with query `params`.
    ///
    /// Paginated listings are walked to the end and returned as one JSON
    /// array.
    ///
    /// # Errors
    /// Any [`ApiError`]; partial listings are never returned.
    pub async fn get<I, K, V>(&self, endpoint: &str, params: I) -> Result<Value, ApiError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.send(&RequestDescriptor::get(endpoint).with_params(params)).await
    }

    /// POST `body` as JSON to `endpoint`.
    ///
    /// # Errors
    /// Any [`ApiError`].
    pub async fn post(&self, endpoint: &str, body: Value) -> Result<Value, ApiError> {
        self.send(&RequestDescriptor::post(endpoint).with_body(body)).await
    }

    /// GET `endpoint` and deserialize the (possibly aggregated) result.
    ///
    /// # Errors
    /// Any [`ApiError`]; `ApiError::Decode` if the result does not fit `T`.
    pub async fn get_json<T, I, K, V>(&self, endpoint: &str, params: I) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let value = self.get(endpoint, params).await?;
        serde_json::from_value(value)
            .map_err(|err| ApiError::Decode(format!("{endpoint}: unexpected response shape: {err}")))
    }

    /// Run an arbitrary request through the full pipeline.
    ///
    /// # Errors
    /// Any [`ApiError`].
    #[instrument(skip(self, request), fields(method = %request.method(), endpoint = %request.endpoint()))]
    pub async fn send(&self, request: &RequestDescriptor) -> Result<Value, ApiError> {
        match self.orchestrator.run(request).await? {
            Payload::Document(value) => Ok(value),
            Payload::Page(first_page) => {
                let items = Pager::new(&self.orchestrator, self.orchestrator.executor().endpoints())
                    .collect(first_page)
                    .await?;
                Ok(Value::Array(items))
            }
        }
    }

    /// Endpoint of the most recent request, as used in error reports.
    pub fn most_recent_endpoint(&self) -> Option<String> {
        self.orchestrator.executor().most_recent_endpoint()
    }
}

fn validate(config: &ClientConfig) -> Result<(), ApiError> {
    config.validate().map_err(|err| ApiError::Config(err.to_string()))
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("max_attempts", &self.orchestrator.max_attempts())
            .field("most_recent_endpoint", &self.most_recent_endpoint())
            .finish()
    }
}
