//! OAuth authorization-code flow against the member directory.
//!
//! The directory acts as its own OAuth provider: `/oauth/authorize` for the
//! browser redirect, `/oauth/token` for the code exchange, and
//! `/api/v1/profiles/me` to identify the member the token belongs to.

use std::time::Duration;

use atlas_domain::config::OAuthConfig;
use atlas_domain::{AtlasError, Result};
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::errors::InfraError;

/// OAuth client for the directory's authorization server.
pub struct DirectoryOAuthClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    redirect_url: String,
}

/// The member identity behind an access token.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryUser {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl DirectoryOAuthClient {
    /// Create a new client for the given directory and OAuth application.
    pub fn new(base_url: &str, config: &OAuthConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AtlasError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
        })
    }

    /// Build the browser authorization URL carrying the CSRF state.
    pub fn authorize_url(&self, state: &str) -> Result<String> {
        let mut url = Url::parse(&format!("{}/oauth/authorize", self.base_url))
            .map_err(|err| AtlasError::Config(format!("invalid directory base URL: {err}")))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_url)
            .append_pair("response_type", "code")
            .append_pair("state", state);

        Ok(url.into())
    }

    /// Exchange an authorization code for an access token.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> Result<String> {
        let url = format!("{}/oauth/token", self.base_url);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.redirect_url.as_str()),
            ])
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AtlasError::Auth(format!("token exchange failed with HTTP {status}")));
        }

        let token: TokenResponse = response.json().await.map_err(|err| {
            AtlasError::Auth(format!("failed to parse token response: {err}"))
        })?;

        Ok(token.access_token)
    }

    /// Look up the member the access token belongs to.
    #[instrument(skip(self, access_token))]
    pub async fn me(&self, access_token: &str) -> Result<DirectoryUser> {
        let url = format!("{}/api/v1/profiles/me", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AtlasError::Auth(format!("identity lookup failed with HTTP {status}")));
        }

        response.json().await.map_err(|err| {
            AtlasError::Auth(format!("failed to parse identity response: {err}"))
        })
    }
}
