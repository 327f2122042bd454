//! # Atlas API
//!
//! Delivery layer for the member map: the HTTP server, session handling,
//! and the application context both binaries are wired from.
//!
//! Binaries:
//! - `atlas-server`: serves the GeoJSON endpoint behind session auth plus
//!   the OAuth login flow
//! - `atlas-sync`: runs one directory sync pass and exits

pub mod context;
pub mod middleware;
pub mod routes;
pub mod sessions;

pub use context::AppContext;
pub use routes::build_router;
pub use sessions::SessionStore;
