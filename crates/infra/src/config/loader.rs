//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If required variables are missing, falls back to loading from file
//! 3. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ATLAS_DB_PATH`: Database file path (required)
//! - `ATLAS_DB_POOL_SIZE`: Connection pool size
//! - `ATLAS_DIRECTORY_BASE_URL`: Member directory base URL (required)
//! - `ATLAS_DIRECTORY_TOKEN`: Personal access token for the sync job
//! - `ATLAS_GEOCODER_BASE_URL`: Geocoding search API base URL
//! - `ATLAS_GEOCODER_USERNAME`: GeoNames account for the sync job
//! - `ATLAS_HTTP_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `ATLAS_BIND_ADDR`: Server listen address
//! - `ATLAS_AUTH_DISABLED`: Skip the session check (true/false)
//! - `ATLAS_SESSION_TTL_SECS`: Session lifetime in seconds
//! - `ATLAS_OAUTH_CLIENT_ID` / `ATLAS_OAUTH_CLIENT_SECRET` /
//!   `ATLAS_OAUTH_REDIRECT_URL`: OAuth application credentials
//!
//! ## File Locations
//! The loader probes `ATLAS_CONFIG` first, then `./atlas.toml` and
//! `./atlas.json` in the current working directory.

use std::path::{Path, PathBuf};

use atlas_domain::config::{
    Config, DatabaseConfig, DirectoryConfig, GeocoderConfig, OAuthConfig, ServerConfig,
};
use atlas_domain::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_DB_POOL_SIZE, DEFAULT_GEOCODER_BASE_URL,
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_SESSION_TTL_SECS,
};
use atlas_domain::{AtlasError, Result};
use url::Url;

/// Environment variables the env loader cannot do without. Their presence
/// decides between the env and file sources.
const REQUIRED_ENV_VARS: &[&str] = &["ATLAS_DB_PATH", "ATLAS_DIRECTORY_BASE_URL"];

/// Load configuration with automatic fallback strategy
///
/// Loads from environment variables when the required ones are set;
/// otherwise falls back to a config file. Malformed values in a present
/// environment are an error, not a reason to fall back, so a typo'd
/// environment can never be masked by a stale file.
///
/// # Errors
/// Returns `AtlasError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or base URLs are malformed
pub fn load() -> Result<Config> {
    let env_present = REQUIRED_ENV_VARS.iter().all(|key| std::env::var(key).is_ok());

    let config = if env_present {
        tracing::info!("Loading configuration from environment variables");
        load_from_env()?
    } else {
        tracing::debug!("Required environment variables missing, trying file");
        load_from_file(None)?
    };

    validate(&config)?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `AtlasError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("ATLAS_DB_PATH")?;
    let db_pool_size = env_parse("ATLAS_DB_POOL_SIZE", DEFAULT_DB_POOL_SIZE)?;

    let directory_base_url = env_var("ATLAS_DIRECTORY_BASE_URL")?;
    let directory_token = std::env::var("ATLAS_DIRECTORY_TOKEN").ok();

    let geocoder_base_url = std::env::var("ATLAS_GEOCODER_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_GEOCODER_BASE_URL.to_string());
    let geocoder_username = std::env::var("ATLAS_GEOCODER_USERNAME").ok();

    let timeout_secs = env_parse("ATLAS_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;

    let bind_addr =
        std::env::var("ATLAS_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let auth_disabled = env_bool("ATLAS_AUTH_DISABLED", false);
    let session_ttl_secs = env_parse("ATLAS_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;

    let oauth = match (
        std::env::var("ATLAS_OAUTH_CLIENT_ID").ok(),
        std::env::var("ATLAS_OAUTH_CLIENT_SECRET").ok(),
        std::env::var("ATLAS_OAUTH_REDIRECT_URL").ok(),
    ) {
        (Some(client_id), Some(client_secret), Some(redirect_url)) => {
            Some(OAuthConfig { client_id, client_secret, redirect_url })
        }
        (None, None, None) => None,
        _ => {
            return Err(AtlasError::Config(
                "ATLAS_OAUTH_CLIENT_ID, ATLAS_OAUTH_CLIENT_SECRET and \
                 ATLAS_OAUTH_REDIRECT_URL must be set together"
                    .into(),
            ))
        }
    };

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size: db_pool_size },
        directory: DirectoryConfig {
            base_url: directory_base_url,
            access_token: directory_token,
            timeout_secs,
        },
        geocoder: GeocoderConfig {
            base_url: geocoder_base_url,
            username: geocoder_username,
            timeout_secs,
        },
        server: ServerConfig { bind_addr, auth_disabled, session_ttl_secs, oauth },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes `ATLAS_CONFIG` and the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `AtlasError::Config` if the file is missing, the format is
/// invalid, or required fields are absent.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AtlasError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AtlasError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AtlasError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AtlasError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AtlasError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(AtlasError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file.
///
/// `ATLAS_CONFIG` wins when set; otherwise `./atlas.toml` then
/// `./atlas.json` in the current working directory.
pub fn probe_config_paths() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var("ATLAS_CONFIG") {
        let path = PathBuf::from(explicit);
        return path.exists().then_some(path);
    }

    let cwd = std::env::current_dir().ok()?;
    [cwd.join("atlas.toml"), cwd.join("atlas.json")].into_iter().find(|path| path.exists())
}

/// Check that the configured base URLs are well formed.
fn validate(config: &Config) -> Result<()> {
    validate_url("directory base URL", &config.directory.base_url)?;
    validate_url("geocoder base URL", &config.geocoder.base_url)?;
    if let Some(oauth) = &config.server.oauth {
        validate_url("OAuth redirect URL", &oauth.redirect_url)?;
    }
    Ok(())
}

fn validate_url(what: &str, value: &str) -> Result<()> {
    Url::parse(value)
        .map_err(|e| AtlasError::Config(format!("Invalid {what} '{value}': {e}")))
        .map(|_| ())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| AtlasError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse a numeric environment variable, using `default` when unset.
fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|e| AtlasError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
