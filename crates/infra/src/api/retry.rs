//! Bounded retry loop around a single-attempt executor

use async_trait::async_trait;
use tracing::{debug, instrument, warn};
use tunewire_common::resilience::{RetryBudget, Retryable};
use tunewire_domain::RequestDescriptor;

use super::errors::ApiError;
use super::executor::{Execute, Payload};

/// Runs a request through an executor until it succeeds, fails
/// permanently, or the attempt budget is spent.
///
/// Each error decides its own reaction through [`Retryable::retry_decision`]:
/// rate limits and server errors wait before the next attempt, an expired
/// token (already refreshed by the executor) and unknown statuses retry at
/// once, everything else is returned as-is. No sleep follows the final
/// attempt.
#[derive(Debug)]
pub struct RetryOrchestrator<X> {
    executor: X,
    max_attempts: u32,
}

impl<X: Execute> RetryOrchestrator<X> {
    /// Wrap `executor`, allowing at most `max_attempts` attempts per call.
    pub fn new(executor: X, max_attempts: u32) -> Self {
        Self { executor, max_attempts: max_attempts.max(1) }
    }

    /// The wrapped executor.
    pub fn executor(&self) -> &X {
        &self.executor
    }

    /// Unwrap the executor.
    pub fn into_executor(self) -> X {
        self.executor
    }

    /// Attempts allowed per call.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `request` to completion.
    ///
    /// # Errors
    /// The first non-retryable error, or [`ApiError::RetriesExhausted`]
    /// wrapping the last error once the budget is spent.
    #[instrument(skip(self, request), fields(method = %request.method(), endpoint = %request.endpoint()))]
    pub async fn run(&self, request: &RequestDescriptor) -> Result<Payload, ApiError> {
        let mut budget = RetryBudget::new(self.max_attempts);

        while let Some(attempt) = budget.next_attempt() {
            debug!(attempt, max_attempts = self.max_attempts, "Attempting request");

            let error = match self.executor.execute(request).await {
                Ok(payload) => return Ok(payload),
                Err(error) => error,
            };

            let decision = error.retry_decision();
            if !decision.should_retry() {
                return Err(error);
            }

            if budget.is_exhausted() {
                warn!(attempts = attempt, error = %error, "Retry budget exhausted");
                return Err(ApiError::RetriesExhausted { attempts: attempt, last: Box::new(error) });
            }

            let delay = decision.delay();
            warn!(
                attempt,
                status = error.status_code(),
                endpoint = error.endpoint(),
                delay_ms = delay.as_millis() as u64,
                "Request failed, retrying"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Err(ApiError::Config("retry budget allows no attempts".into()))
    }
}

#[async_trait]
impl<X: Execute> Execute for RetryOrchestrator<X> {
    async fn execute(&self, request: &RequestDescriptor) -> Result<Payload, ApiError> {
        self.run(request).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::{Duration, Instant};

    use parking_lot::Mutex;
    use serde_json::json;
    use tunewire_domain::TuneWireError;

    use super::*;
    use crate::api::errors::ErrorDetails;

    /// Replays a fixed sequence of outcomes, one per attempt.
    struct ScriptedExecutor {
        script: Mutex<VecDeque<Result<Payload, ApiError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedExecutor {
        fn new(script: Vec<Result<Payload, ApiError>>) -> Self {
            Self { script: Mutex::new(script.into()), calls: Mutex::new(0) }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock()
        }
    }

    #[async_trait]
    impl Execute for ScriptedExecutor {
        async fn execute(&self, _request: &RequestDescriptor) -> Result<Payload, ApiError> {
            *self.calls.lock() += 1;
            self.script
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Config("script exhausted".into())))
        }
    }

    fn details(status: u16) -> ErrorDetails {
        ErrorDetails::new(status, "boom", "me/tracks")
    }

    fn ok() -> Result<Payload, ApiError> {
        Ok(Payload::Document(json!({"ok": true})))
    }

    fn rate_limited(millis: u64) -> Result<Payload, ApiError> {
        Err(ApiError::RateLimited { retry_after: Duration::from_millis(millis), details: details(429) })
    }

    fn server_error() -> Result<Payload, ApiError> {
        Err(ApiError::ServerError { cooldown: Duration::from_millis(1), details: details(500) })
    }

    fn request() -> RequestDescriptor {
        RequestDescriptor::get("me/tracks")
    }

    #[tokio::test]
    async fn success_needs_one_attempt() {
        let orchestrator = RetryOrchestrator::new(ScriptedExecutor::new(vec![ok()]), 5);

        assert!(orchestrator.run(&request()).await.is_ok());
        assert_eq!(orchestrator.executor().calls(), 1);
    }

    #[tokio::test]
    async fn rate_limit_waits_then_succeeds() {
        let orchestrator =
            RetryOrchestrator::new(ScriptedExecutor::new(vec![rate_limited(60), ok()]), 5);
        let started = Instant::now();

        assert!(orchestrator.run(&request()).await.is_ok());
        assert!(started.elapsed() >= Duration::from_millis(60));
        assert_eq!(orchestrator.executor().calls(), 2);
    }

    #[tokio::test]
    async fn auth_expired_retries_immediately() {
        let orchestrator = RetryOrchestrator::new(
            ScriptedExecutor::new(vec![Err(ApiError::AuthExpired(details(401))), ok()]),
            5,
        );

        assert!(orchestrator.run(&request()).await.is_ok());
        assert_eq!(orchestrator.executor().calls(), 2);
    }

    #[tokio::test]
    async fn not_found_and_invalid_fail_fast() {
        for error in [ApiError::NotFound(details(404)), ApiError::InvalidRequest(details(400))] {
            let orchestrator = RetryOrchestrator::new(ScriptedExecutor::new(vec![Err(error)]), 5);

            let err = orchestrator.run(&request()).await.unwrap_err();

            assert!(matches!(err, ApiError::NotFound(_) | ApiError::InvalidRequest(_)));
            assert_eq!(orchestrator.executor().calls(), 1);
        }
    }

    #[tokio::test]
    async fn non_http_failures_fail_fast() {
        let orchestrator = RetryOrchestrator::new(
            ScriptedExecutor::new(vec![Err(ApiError::Credentials(TuneWireError::Network(
                "down".into(),
            )))]),
            5,
        );

        let err = orchestrator.run(&request()).await.unwrap_err();

        assert!(matches!(err, ApiError::Credentials(_)));
        assert_eq!(orchestrator.executor().calls(), 1);
    }

    #[tokio::test]
    async fn persistent_server_errors_exhaust_budget() {
        let script = (0..6).map(|_| server_error()).collect();
        let orchestrator = RetryOrchestrator::new(ScriptedExecutor::new(script), 5);

        let err = orchestrator.run(&request()).await.unwrap_err();

        match err {
            ApiError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 5);
                assert!(matches!(*last, ApiError::ServerError { .. }));
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
        assert_eq!(orchestrator.executor().calls(), 5);
    }

    #[tokio::test]
    async fn no_sleep_after_final_attempt() {
        let orchestrator = RetryOrchestrator::new(
            ScriptedExecutor::new(vec![rate_limited(10), rate_limited(5_000)]),
            2,
        );
        let started = Instant::now();

        let err = orchestrator.run(&request()).await.unwrap_err();

        assert!(matches!(err, ApiError::RetriesExhausted { attempts: 2, .. }));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn unknown_status_is_retried_within_budget() {
        let unknown = || -> Result<Payload, ApiError> {
            Err(ApiError::Unknown { details: details(418), body: String::new() })
        };
        let orchestrator =
            RetryOrchestrator::new(ScriptedExecutor::new(vec![unknown(), unknown(), ok()]), 3);

        assert!(orchestrator.run(&request()).await.is_ok());
        assert_eq!(orchestrator.executor().calls(), 3);
    }

    #[tokio::test]
    async fn orchestrator_is_itself_an_executor() {
        let orchestrator =
            RetryOrchestrator::new(ScriptedExecutor::new(vec![server_error(), ok()]), 5);

        let payload = orchestrator.execute(&request()).await.unwrap();

        assert_eq!(payload.into_value(), json!({"ok": true}));
    }
}
