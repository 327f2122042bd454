//! Application configuration structures.
//!
//! Pure data only; loading and validation live in the infra layer. Fields
//! that are only required by one of the two binaries (the sync job needs the
//! directory token and geocoder account, the server needs OAuth credentials)
//! are optional here and checked by the loader for the binary in question.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_DB_POOL_SIZE, DEFAULT_GEOCODER_BASE_URL,
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_SESSION_TTL_SECS,
};

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// SQLite database settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: String,
    /// Connection pool size.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// Member directory API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Base URL of the directory site, e.g. `https://www.recurse.com`.
    pub base_url: String,
    /// Personal access token used by the sync job.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Geocoding API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL of the geocoding search API.
    #[serde(default = "default_geocoder_base_url")]
    pub base_url: String,
    /// Account name passed with every lookup, required by the sync job.
    #[serde(default)]
    pub username: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_base_url(),
            username: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address, e.g. `127.0.0.1:8080`.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Skip the session check on protected routes (local development only).
    #[serde(default)]
    pub auth_disabled: bool,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// OAuth credentials, required unless `auth_disabled` is set.
    #[serde(default)]
    pub oauth: Option<OAuthConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            auth_disabled: false,
            session_ttl_secs: default_session_ttl_secs(),
            oauth: None,
        }
    }
}

/// OAuth application credentials for the directory's authorization server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Redirect URL registered with the OAuth application.
    pub redirect_url: String,
}

fn default_pool_size() -> u32 {
    DEFAULT_DB_POOL_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_geocoder_base_url() -> String {
    DEFAULT_GEOCODER_BASE_URL.to_string()
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}
