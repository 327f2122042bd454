//! # Atlas Domain
//!
//! Business domain types and models for Atlas.
//!
//! This crate contains:
//! - Domain data types (Profile, Location, SyncReport, etc.)
//! - GeoJSON projection types served to the map front-end
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other Atlas crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod geojson;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
