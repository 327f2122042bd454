//! Member directory API client

pub mod client;

pub use client::*;
