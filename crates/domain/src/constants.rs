//! Upstream locations and client defaults
//!
//! Centralized location for the constants used by the orchestration layer.

// Upstream endpoints
pub const API_BASE_URL: &str = "https://api.spotify.com/v1/";
pub const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";

// Request pacing and retry
pub const DEFAULT_MIN_REQUEST_INTERVAL_SECS: u64 = 1;
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 5;
pub const DEFAULT_SERVER_ERROR_COOLDOWN_SECS: u64 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Used when a 429 response carries no usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

// Local files
pub const DEFAULT_TOKEN_PATH: &str = "spotify-token.json";
pub const DEFAULT_ERROR_LOG_PATH: &str = "apierrors.log";

/// Format of timestamps returned by the catalog (e.g. `added_at`).
pub const CATALOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Scopes requested by the user-delegated flow unless the caller overrides
/// them.
pub const DEFAULT_SCOPES: &[&str] = &[
    "user-top-read",
    "user-library-read",
    "user-read-birthdate",
    "playlist-read-private",
    "user-read-private",
    "user-read-email",
    "playlist-modify-public",
    "playlist-modify-private",
    "user-follow-read",
];
