//! Catalog API request pipeline
//!
//! - [`errors`]: HTTP error taxonomy
//! - [`executor`]: one authenticated, rate-governed request
//! - [`retry`]: bounded retry loop reacting to error classes
//! - [`pager`]: aggregation of paginated listings
//! - [`client`]: the [`CatalogClient`] facade composing all of the above

pub mod client;
pub mod errors;
pub mod executor;
pub mod pager;
pub mod retry;

pub use client::CatalogClient;
pub use errors::{ApiError, ApiErrorCategory, ErrorDetails};
pub use executor::{Execute, Payload, RequestExecutor};
pub use pager::Pager;
pub use retry::RetryOrchestrator;
