//! # Atlas Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Database implementations (SQLite connection pool, sync unit of work,
//!   map read model)
//! - Member directory API client (paginated profile source, OAuth)
//! - GeoNames geocoding client
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `atlas-core`
//! - Depends on `atlas-domain` and `atlas-core`
//! - Contains all "impure" code (I/O, external services)

pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod integrations;

// Re-export commonly used items
pub use auth::*;
pub use database::*;
pub use errors::*;
pub use integrations::*;
