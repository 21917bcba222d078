//! Resilience primitives used by the request pipeline
//!
//! - [`clock`]: time abstraction (`SystemClock`, `MockClock`)
//! - [`governor`]: minimum spacing between requests
//! - [`retry`]: retry decisions and bounded attempt budgets

pub mod clock;
pub mod governor;
pub mod retry;

pub use clock::{Clock, MockClock, SystemClock};
pub use governor::RateGovernor;
pub use retry::{RetryBudget, RetryDecision, Retryable};
