//! Health probe route.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::context::AppContext;

/// `GET /api/health` - reports whether the database is reachable.
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Response {
    let db = Arc::clone(&ctx.db);
    let db_ok = tokio::task::spawn_blocking(move || db.health_check())
        .await
        .map(|result| result.is_ok())
        .unwrap_or(false);

    if db_ok {
        (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
    } else {
        tracing::warn!("health check failed: database unreachable");
        (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({"status": "degraded"})))
            .into_response()
    }
}
