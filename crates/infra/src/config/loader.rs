//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment, if one exists
//! 2. Attempts to load from environment variables
//! 3. If the required credentials are missing, falls back to loading from a
//!    file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SPOTIFY_CLIENT_ID`: Application client id (required)
//! - `SPOTIFY_CLIENT_SECRET`: Application client secret (required)
//! - `SPOTIFY_CALLBACK_URL`: Redirect URI for the user-delegated flow
//! - `SPOTIFY_SCOPES`: Space-separated scopes
//! - `TUNEWIRE_MIN_REQUEST_INTERVAL_SECS`: Minimum spacing between requests
//! - `TUNEWIRE_MAX_RETRY_ATTEMPTS`: Attempts per logical call
//! - `TUNEWIRE_SERVER_ERROR_COOLDOWN_SECS`: Wait after a 5xx response
//! - `TUNEWIRE_REQUEST_TIMEOUT_SECS`: Per-request timeout
//! - `TUNEWIRE_TOKEN_PATH`: User token file
//! - `TUNEWIRE_ERROR_LOG_PATH`: Diagnostic error log file
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./tunewire.json` or `./tunewire.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tunewire_domain::constants::{
    DEFAULT_MAX_RETRY_ATTEMPTS, DEFAULT_MIN_REQUEST_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SCOPES, DEFAULT_SERVER_ERROR_COOLDOWN_SECS, DEFAULT_TOKEN_PATH,
};
use tunewire_domain::{ClientConfig, Endpoints, Result, TuneWireError};

use crate::errors::InfraError;

const CONFIG_FILE_NAMES: &[&str] = &["tunewire.json", "tunewire.toml", "config.json", "config.toml"];

/// On-disk configuration. Durations are whole seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Application client id
    pub client_id: String,
    /// Application client secret
    pub client_secret: String,
    /// Redirect URI for the user-delegated flow
    #[serde(default)]
    pub callback_url: Option<String>,
    /// Requested scopes
    #[serde(default)]
    pub scopes: Option<Vec<String>>,
    /// Minimum spacing between requests
    #[serde(default = "default_min_request_interval")]
    pub min_request_interval_seconds: u64,
    /// Attempts per logical call
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: u32,
    /// Wait after a 5xx response
    #[serde(default = "default_server_error_cooldown")]
    pub server_error_cooldown_seconds: u64,
    /// Per-request timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// User token file
    #[serde(default)]
    pub token_path: Option<PathBuf>,
    /// Diagnostic error log file
    #[serde(default)]
    pub error_log_path: Option<PathBuf>,
    /// Upstream locations (defaults to the public service)
    #[serde(default)]
    pub endpoints: Option<Endpoints>,
}

fn default_min_request_interval() -> u64 {
    DEFAULT_MIN_REQUEST_INTERVAL_SECS
}

fn default_max_retry_attempts() -> u32 {
    DEFAULT_MAX_RETRY_ATTEMPTS
}

fn default_server_error_cooldown() -> u64 {
    DEFAULT_SERVER_ERROR_COOLDOWN_SECS
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl From<FileConfig> for ClientConfig {
    fn from(file: FileConfig) -> Self {
        let mut config = ClientConfig::new(file.client_id, file.client_secret)
            .with_min_request_interval(Duration::from_secs(file.min_request_interval_seconds))
            .with_max_retry_attempts(file.max_retry_attempts)
            .with_server_error_cooldown(Duration::from_secs(file.server_error_cooldown_seconds))
            .with_request_timeout(Duration::from_secs(file.request_timeout_seconds))
            .with_token_path(file.token_path.unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_PATH)));

        if let Some(url) = file.callback_url {
            config = config.with_callback_url(url);
        }
        if let Some(scopes) = file.scopes {
            config = config.with_scopes(scopes);
        }
        if let Some(path) = file.error_log_path {
            config = config.with_error_log_path(path);
        }
        if let Some(endpoints) = file.endpoints {
            config = config.with_endpoints(endpoints);
        }
        config
    }
}

/// Load configuration with automatic fallback strategy
///
/// Loads `.env` if present, then tries environment variables. If the
/// required variables are missing, falls back to a config file.
///
/// # Errors
/// Returns `TuneWireError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The resulting configuration fails validation
pub fn load() -> Result<ClientConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `SPOTIFY_CLIENT_ID` and `SPOTIFY_CLIENT_SECRET` are required; everything
/// else falls back to the defaults.
///
/// # Errors
/// Returns `TuneWireError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<ClientConfig> {
    let client_id = env_var("SPOTIFY_CLIENT_ID")?;
    let client_secret = env_var("SPOTIFY_CLIENT_SECRET")?;

    let mut config = ClientConfig::new(client_id, client_secret);

    if let Some(url) = optional_env("SPOTIFY_CALLBACK_URL") {
        config = config.with_callback_url(url);
    }
    if let Some(scopes) = optional_env("SPOTIFY_SCOPES") {
        config = config.with_scopes(scopes.split_whitespace().map(str::to_owned));
    }
    if let Some(secs) = env_parse::<u64>("TUNEWIRE_MIN_REQUEST_INTERVAL_SECS")? {
        config = config.with_min_request_interval(Duration::from_secs(secs));
    }
    if let Some(attempts) = env_parse::<u32>("TUNEWIRE_MAX_RETRY_ATTEMPTS")? {
        config = config.with_max_retry_attempts(attempts);
    }
    if let Some(secs) = env_parse::<u64>("TUNEWIRE_SERVER_ERROR_COOLDOWN_SECS")? {
        config = config.with_server_error_cooldown(Duration::from_secs(secs));
    }
    if let Some(secs) = env_parse::<u64>("TUNEWIRE_REQUEST_TIMEOUT_SECS")? {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }
    if let Some(path) = optional_env("TUNEWIRE_TOKEN_PATH") {
        config = config.with_token_path(path);
    }
    if let Some(path) = optional_env("TUNEWIRE_ERROR_LOG_PATH") {
        config = config.with_error_log_path(path);
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `TuneWireError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TuneWireError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TuneWireError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TuneWireError::Config(format!("Failed to read config file: {}", e)))?;

    let config: ClientConfig = parse_config(&contents, &config_path)?.into();
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<FileConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| InfraError::from(e).into()),
        "json" => serde_json::from_str(contents).map_err(|e| InfraError::from(e).into()),
        _ => Err(TuneWireError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent and grandparent, and
/// the executable's directory for `tunewire.{json,toml}` and
/// `config.{json,toml}`.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `TuneWireError::Config` if the variable is not set or empty.
fn env_var(key: &str) -> Result<String> {
    optional_env(key).ok_or_else(|| {
        TuneWireError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

/// Parse an optional numeric environment variable.
///
/// # Errors
/// Returns `TuneWireError::Config` if the variable is set but not a number.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_env(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| TuneWireError::Config(format!("Invalid value for {}: {}", key, e)))
        })
        .transpose()
}
