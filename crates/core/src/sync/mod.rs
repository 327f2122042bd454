//! Directory synchronization
//!
//! This module provides the ports and the orchestrating service for pulling
//! profiles from the remote directory into the local store.

pub mod ports;
pub mod service;

pub use ports::{Geocoder, ProfileSource, ProfileStream, SyncStore, SyncUnitOfWork};
pub use service::SyncService;
