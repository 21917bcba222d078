//! # TuneWire Infrastructure
//!
//! Implementations of the `tunewire-core` ports plus the HTTP pipeline that
//! talks to the Spotify Web API.
//!
//! This crate contains:
//! - The catalog client facade, request executor, retry orchestrator and
//!   pager (`api`)
//! - App-only and user-delegated credential providers (`auth`)
//! - File-backed token storage and error logging (`storage`, `diagnostics`)
//! - Configuration loading from the environment or files (`config`)
//!
//! ## Architecture
//! - Implements traits defined in `tunewire-core`
//! - Depends on `tunewire-common` for token types and resilience primitives
//! - Contains all I/O (network, filesystem, console)

pub mod api;
pub mod auth;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod http;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use api::{ApiError, ApiErrorCategory, CatalogClient, Execute, Pager, Payload};
pub use auth::{AppOnlyProvider, ConsoleCompleter, TokenEndpoint, UserDelegatedProvider};
pub use diagnostics::ErrorLogFile;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::init_tracing;
pub use storage::FileTokenStore;
