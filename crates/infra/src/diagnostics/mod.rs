//! Diagnostic sinks

pub mod error_log;

pub use error_log::{format_entry, ErrorLogFile};
