//! Map projection
//!
//! This module provides the port and service for projecting synced profiles
//! into the GeoJSON document served to the map front-end.

pub mod ports;
pub mod service;

pub use ports::MapRepository;
pub use service::MapService;
