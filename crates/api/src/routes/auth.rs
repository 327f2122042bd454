//! OAuth login flow routes.
//!
//! `/auth/login` starts the handshake by redirecting the browser to the
//! directory's authorization page; `/auth/callback` receives the code,
//! exchanges it, identifies the member, and sets the session cookie.

use std::sync::Arc;

use atlas_domain::constants::SESSION_COOKIE_NAME;
use atlas_domain::AtlasError;
use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::context::AppContext;
use crate::routes::ApiError;

/// Query parameters the directory sends back to the redirect URL.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// `GET /auth/login` - redirect to the directory's authorization page.
pub async fn login(State(ctx): State<Arc<AppContext>>) -> Result<Redirect, ApiError> {
    let oauth = oauth_client(&ctx)?;
    let state = ctx.sessions.issue_state();
    let url = oauth.authorize_url(&state)?;
    Ok(Redirect::to(&url))
}

/// `GET /auth/callback` - complete the handshake and create the session.
pub async fn callback(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, ApiError> {
    let oauth = oauth_client(&ctx)?;

    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        return Err(AtlasError::Auth(format!(
            "authorization was refused: {error} {description}"
        ))
        .into());
    }

    let state = query
        .state
        .ok_or_else(|| AtlasError::Auth("callback is missing the state parameter".into()))?;
    if !ctx.sessions.take_state(&state) {
        return Err(AtlasError::Auth("unrecognised or expired state parameter".into()).into());
    }

    let code = query
        .code
        .ok_or_else(|| AtlasError::Auth("callback is missing the code parameter".into()))?;

    let access_token = oauth.exchange_code(&code).await?;
    let user = oauth.me(&access_token).await?;

    let token = ctx.sessions.create(user.id, user.name.clone());
    tracing::info!(member_id = user.id, "member logged in");

    let cookie = format!("{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax");
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to("/")).into_response())
}

fn oauth_client(ctx: &AppContext) -> Result<Arc<atlas_infra::auth::DirectoryOAuthClient>, ApiError> {
    ctx.oauth.clone().ok_or_else(|| {
        AtlasError::Auth("login is not available while auth is disabled".into()).into()
    })
}
