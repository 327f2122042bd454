//! Directory OAuth integration

pub mod oauth;

pub use oauth::*;
