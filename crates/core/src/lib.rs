//! # Atlas Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits)
//! - The sync pipeline and map projection services
//!
//! ## Architecture Principles
//! - Only depends on `atlas-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod map;
pub mod sync;

// Re-export specific items to avoid ambiguity
pub use map::ports::MapRepository;
pub use map::MapService;
pub use sync::ports::{Geocoder, ProfileSource, ProfileStream, SyncStore, SyncUnitOfWork};
pub use sync::SyncService;
