//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Sync pipeline
pub const DIRECTORY_PAGE_SIZE: i64 = 50;

// Configuration defaults
pub const DEFAULT_DB_POOL_SIZE: u32 = 4;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://secure.geonames.org";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

// Session cookie carried by the map front-end
pub const SESSION_COOKIE_NAME: &str = "atlas_session";
