//! # TuneWire Domain
//!
//! Plain types shared by every TuneWire crate.
//!
//! This crate contains:
//! - The crate-spanning error type ([`TuneWireError`]) and `Result` alias
//! - Request descriptors handed to the orchestration layer
//! - Client configuration and upstream endpoint locations
//! - Constants (default scopes, intervals, URLs)
//!
//! ## Architecture
//! - No dependencies on other TuneWire crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::parse_catalog_timestamp;
