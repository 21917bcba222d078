//! Error types used throughout TuneWire

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for TuneWire
///
/// HTTP-level failures of catalog requests have their own taxonomy
/// (`tunewire_infra::api::ApiError`); this type covers everything around it:
/// configuration, credential exchange, token storage and local I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TuneWireError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for TuneWire operations
pub type Result<T> = std::result::Result<T, TuneWireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_prefix() {
        let err = TuneWireError::Config("missing client id".into());
        assert_eq!(err.to_string(), "Configuration error: missing client id");

        let err = TuneWireError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn serializes_with_type_tag() {
        let err = TuneWireError::Auth("invalid_client".into());
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["type"], "Auth");
        assert_eq!(json["message"], "invalid_client");

        let back: TuneWireError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }
}
