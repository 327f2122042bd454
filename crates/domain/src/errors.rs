//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Atlas
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AtlasError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Remote API error: {0}")]
    RemoteApi(String),

    #[error("Geocode error: {0}")]
    Geocode(String),

    #[error("Duplicate location: {0}")]
    DuplicateLocation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AtlasError {
    /// Whether the sync run may continue past this error.
    ///
    /// Only geocode misses are recoverable: the affected profile is stored
    /// without a location and the run moves on. Everything else aborts the
    /// run and rolls the transaction back.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Geocode(_))
    }
}

/// Result type alias for Atlas operations
pub type Result<T> = std::result::Result<T, AtlasError>;
