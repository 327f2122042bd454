//! HTTP routes and router assembly.

pub mod auth;
pub mod geo;
pub mod health;

use std::sync::Arc;

use atlas_domain::AtlasError;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::context::AppContext;
use crate::middleware::require_session;

/// Build the application router.
///
/// Only the map data route sits behind the session check; the health probe
/// and the login flow must stay reachable without one.
pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/geo.json", get(geo::geo_json))
        .route_layer(from_fn_with_state(Arc::clone(&ctx), require_session))
        .route("/api/health", get(health::health))
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .with_state(ctx)
}

/// Error wrapper translating domain errors into HTTP responses.
pub struct ApiError(pub AtlasError);

impl From<AtlasError> for ApiError {
    fn from(err: AtlasError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AtlasError::Auth(detail) => {
                tracing::warn!(%detail, "authorization failure");
                (StatusCode::FORBIDDEN, "Access Denied")
            }
            AtlasError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            err => {
                tracing::error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        (status, Json(serde_json::json!({"message": message}))).into_response()
    }
}
