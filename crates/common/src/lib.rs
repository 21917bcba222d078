//! Reusable building blocks shared across TuneWire crates.
//!
//! - [`auth`]: OAuth token types, Basic/Bearer header values, authorize URL
//!   construction and redirect parsing
//! - [`resilience`]: clock abstraction, the minimum-interval rate governor and
//!   retry decisions

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod resilience;

// Re-export commonly used types and traits for convenience
pub use auth::{
    basic_authorization, bearer_authorization, parse_authorization_response,
    AuthorizationRequest, AuthorizationResponseError, GrantType, OAuthErrorBody, TokenResponse,
    TokenSet,
};
pub use resilience::{
    Clock, MockClock, RateGovernor, RetryBudget, RetryDecision, Retryable, SystemClock,
};
