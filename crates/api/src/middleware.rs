//! Session authorization middleware.
//!
//! Applied to protected routes before their handlers run. A request passes
//! when it carries a valid session cookie, or when auth is disabled in
//! configuration (local development). Everything else receives the
//! directory-style `403 {"message": "Access Denied"}` payload.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use atlas_domain::constants::SESSION_COOKIE_NAME;

use crate::context::AppContext;

/// Reject the request unless it belongs to an authenticated session.
pub async fn require_session(
    State(ctx): State<Arc<AppContext>>,
    request: Request,
    next: Next,
) -> Response {
    if ctx.config.server.auth_disabled {
        return next.run(request).await;
    }

    let session = session_cookie(request.headers()).and_then(|token| ctx.sessions.get(&token));

    match session {
        Some(_) => next.run(request).await,
        None => access_denied(),
    }
}

/// The `403 Access Denied` response protected routes return.
pub fn access_denied() -> Response {
    (StatusCode::FORBIDDEN, Json(serde_json::json!({"message": "Access Denied"})))
        .into_response()
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers.get(header::COOKIE)?.to_str().ok()?.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE_NAME).then(|| value.to_string())
    })
}
