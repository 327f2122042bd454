//! Database implementations

pub mod manager;
pub mod map_repository;
pub mod sync_session;

pub use manager::*;
pub use map_repository::*;
pub use sync_session::*;
