//! Shared helpers for api integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use atlas_api::{build_router, AppContext};
use atlas_domain::config::{
    Config, DatabaseConfig, DirectoryConfig, GeocoderConfig, OAuthConfig, ServerConfig,
};
use tempfile::TempDir;

/// A running server instance bound to an ephemeral port, backed by a
/// temporary database.
pub struct TestServer {
    pub addr: SocketAddr,
    pub ctx: Arc<AppContext>,
    pub client: reqwest::Client,
    _temp_dir: TempDir,
}

impl TestServer {
    /// Spawn a server with auth enabled against the given directory URL.
    pub async fn spawn(directory_base_url: &str) -> Self {
        Self::spawn_with(directory_base_url, false).await
    }

    /// Spawn a server with the session check disabled.
    pub async fn spawn_auth_disabled() -> Self {
        Self::spawn_with("https://directory.test", true).await
    }

    async fn spawn_with(directory_base_url: &str, auth_disabled: bool) -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("atlas.db");

        let config = Config {
            database: DatabaseConfig {
                path: db_path.to_string_lossy().into_owned(),
                pool_size: 4,
            },
            directory: DirectoryConfig {
                base_url: directory_base_url.to_string(),
                access_token: None,
                timeout_secs: 5,
            },
            geocoder: GeocoderConfig::default(),
            server: ServerConfig {
                bind_addr: "127.0.0.1:0".into(),
                auth_disabled,
                session_ttl_secs: 3600,
                oauth: (!auth_disabled).then(|| OAuthConfig {
                    client_id: "atlas-client".into(),
                    client_secret: "secret".into(),
                    redirect_url: "http://localhost/auth/callback".into(),
                }),
            },
        };

        let ctx = Arc::new(AppContext::new(config).expect("context should build"));
        let router = build_router(Arc::clone(&ctx));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral port should bind");
        let addr = listener.local_addr().expect("bound address should be known");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server should run");
        });

        // Redirects are asserted on, never followed.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("client should build");

        Self { addr, ctx, client, _temp_dir: temp_dir }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Insert a location and a profile pointing at it.
    pub fn seed_placed_profile(
        &self,
        profile_id: i64,
        name: &str,
        location: &str,
        longitude: f64,
        latitude: f64,
    ) {
        let conn = self.ctx.db.get_connection().expect("connection should be available");
        conn.execute(
            "INSERT OR IGNORE INTO locations (name, longitude, latitude, geocode_result)
             VALUES (?1, ?2, ?3, '{}')",
            rusqlite::params![location, longitude, latitude],
        )
        .expect("location insert should succeed");
        conn.execute(
            "INSERT INTO profiles (profile_id, name, image_url, directory_url, location)
             VALUES (?1, ?2, NULL, ?3, ?4)",
            rusqlite::params![
                profile_id,
                name,
                format!("https://directory.test/directory/{profile_id}"),
                location
            ],
        )
        .expect("profile insert should succeed");
    }
}
