//! Application context - dependency injection container
//!
//! Built once at process start and shared by every handler. Components are
//! constructed here and nowhere else; there is no global state.

use std::sync::Arc;
use std::time::Duration;

use atlas_core::MapService;
use atlas_domain::{AtlasError, Config, Result};
use atlas_infra::auth::DirectoryOAuthClient;
use atlas_infra::database::{DbManager, SqliteMapRepository};

use crate::sessions::SessionStore;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub map_service: Arc<MapService>,
    pub sessions: Arc<SessionStore>,
    /// Absent only when auth is disabled for local development.
    pub oauth: Option<Arc<DirectoryOAuthClient>>,
}

impl AppContext {
    /// Initialize the application context from loaded configuration.
    ///
    /// Opens the database pool, applies the schema, and wires the map
    /// service, session store, and OAuth client. Fails with
    /// `AtlasError::Config` when OAuth credentials are missing while auth
    /// is enabled.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let map_repository = Arc::new(SqliteMapRepository::new(Arc::clone(&db)));
        let map_service = Arc::new(MapService::new(map_repository));

        let sessions =
            Arc::new(SessionStore::new(Duration::from_secs(config.server.session_ttl_secs)));

        let oauth = match &config.server.oauth {
            Some(oauth_config) => Some(Arc::new(DirectoryOAuthClient::new(
                &config.directory.base_url,
                oauth_config,
                Duration::from_secs(config.directory.timeout_secs),
            )?)),
            None if config.server.auth_disabled => None,
            None => {
                return Err(AtlasError::Config(
                    "OAuth credentials are required unless ATLAS_AUTH_DISABLED is set".into(),
                ))
            }
        };

        tracing::info!(
            db_path = %config.database.path,
            auth_disabled = config.server.auth_disabled,
            "application context initialised"
        );

        Ok(Self { config, db, map_service, sessions, oauth })
    }
}
