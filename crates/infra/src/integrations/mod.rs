//! External service integrations

pub mod directory;
pub mod geonames;

pub use directory::*;
pub use geonames::*;
