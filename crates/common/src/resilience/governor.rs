//! Minimum-interval rate governor
//!
//! A leaky bucket of one: every call to [`RateGovernor::wait_if_needed`]
//! claims the next permitted send slot, suspending the caller until at least
//! `min_interval` has passed since the previously claimed slot. The slot is
//! claimed regardless of how the subsequent request turns out.

use std::fmt;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

use super::clock::{Clock, SystemClock};

/// Enforces spacing between consecutive requests of one client instance.
///
/// The lock is held across the sleep, so concurrent callers queue up and are
/// released one interval apart.
pub struct RateGovernor<C: Clock = SystemClock> {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
    clock: C,
}

impl RateGovernor<SystemClock> {
    /// Governor backed by the system clock.
    pub fn new(min_interval: Duration) -> Self {
        Self::with_clock(min_interval, SystemClock)
    }
}

impl<C: Clock> RateGovernor<C> {
    /// Governor reading time from `clock`.
    pub fn with_clock(min_interval: Duration, clock: C) -> Self {
        Self { min_interval, last_request: Mutex::new(None), clock }
    }

    /// Configured minimum spacing.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Suspend until the minimum interval since the last permitted request
    /// has elapsed, then record this request. Returns how long it waited.
    pub async fn wait_if_needed(&self) -> Duration {
        let mut last_request = self.last_request.lock().await;
        let now = self.clock.now();

        let wait = match *last_request {
            Some(last) => self.min_interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        };

        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "Rate governor delaying request");
            tokio::time::sleep(wait).await;
        }

        *last_request = Some(now + wait);
        wait
    }
}

impl Default for RateGovernor<SystemClock> {
    fn default() -> Self {
        Self::new(Duration::from_secs(tunewire_domain::constants::DEFAULT_MIN_REQUEST_INTERVAL_SECS))
    }
}

impl<C: Clock> fmt::Debug for RateGovernor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateGovernor").field("min_interval", &self.min_interval).finish()
    }
}
