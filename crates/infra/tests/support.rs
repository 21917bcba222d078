//! Shared fixtures for the infra integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tunewire_common::TokenSet;
use tunewire_core::{AuthorizationCompleter, TokenStore};
use tunewire_domain::{ClientConfig, Endpoints, Result, TuneWireError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const CALLBACK_URL: &str = "http://localhost:8888/callback";

/// Configuration pointing every endpoint at `server`, with no request spacing
/// and a short server-error cooldown.
pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::new("test-client", "test-secret")
        .with_callback_url(CALLBACK_URL)
        .with_endpoints(Endpoints::under_root(&server.uri()))
        .with_min_request_interval(Duration::ZERO)
        .with_server_error_cooldown(Duration::from_millis(10))
        .with_request_timeout(Duration::from_secs(5))
}

/// Token endpoint body as the accounts service returns it.
pub fn token_body(access: &str, refresh: Option<&str>) -> Value {
    let mut body = json!({
        "access_token": access,
        "token_type": "Bearer",
        "expires_in": 3600,
    });
    if let Some(refresh) = refresh {
        body["refresh_token"] = json!(refresh);
    }
    body
}

/// Serve `tokens` from the token endpoint in order, repeating the last one.
/// Returns a counter of token requests.
pub async fn mount_token_sequence(server: &MockServer, tokens: &[&str]) -> Arc<AtomicUsize> {
    let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(move |_req: &Request| -> ResponseTemplate {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            let token = &tokens[n.min(tokens.len() - 1)];
            ResponseTemplate::new(200).set_body_json(token_body(token, Some("refresh-1")))
        })
        .mount(server)
        .await;

    calls
}

/// Token store held in memory, counting loads and saves.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<TokenSet>>,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl MemoryTokenStore {
    pub fn holding(token: TokenSet) -> Self {
        Self { token: Mutex::new(Some(token)), ..Self::default() }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> Option<TokenSet> {
        self.token.lock().clone()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<TokenSet>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.token.lock().clone())
    }

    async fn save(&self, token: &TokenSet) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.token.lock() = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.token.lock().take();
        Ok(())
    }
}

/// Completer answering every prompt with the next scripted code.
pub struct ScriptedCompleter {
    codes: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompleter {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().rev().map(|c| c.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl AuthorizationCompleter for ScriptedCompleter {
    async fn authorization_code(&self, authorize_url: &str) -> Result<String> {
        self.prompts.lock().push(authorize_url.to_string());
        self.codes
            .lock()
            .pop()
            .ok_or_else(|| TuneWireError::Auth("no scripted authorization code left".into()))
    }
}
