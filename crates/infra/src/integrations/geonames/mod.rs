//! GeoNames geocoding client

pub mod client;

pub use client::*;
