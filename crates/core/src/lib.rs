//! # TuneWire Core
//!
//! Pure orchestration logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for credentials, token storage, interactive
//!   authorization and diagnostic logging
//! - Page-shape detection and item accumulation for paginated listings
//!
//! ## Architecture Principles
//! - Only depends on `tunewire-common` and `tunewire-domain`
//! - No HTTP, filesystem, or console code
//! - All external collaborators via traits

pub mod auth;
pub mod diagnostics_ports;
pub mod pagination;

pub use auth::ports::{AuthorizationCompleter, CredentialProvider, TokenStore};
pub use diagnostics_ports::ErrorSink;
pub use pagination::{is_paginated, PageError, PageShape, PageState};
