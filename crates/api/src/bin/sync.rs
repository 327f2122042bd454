//! `atlas-sync` - runs one directory sync pass and exits.
//!
//! Fetches every profile from the member directory, geocodes new locations,
//! and writes the result in a single transaction. A non-zero exit code means
//! the store was left untouched.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use atlas_core::SyncService;
use atlas_domain::{AtlasError, Result};
use atlas_infra::database::{DbManager, SqliteSyncStore};
use atlas_infra::integrations::{
    DirectoryClient, DirectoryClientConfig, GeoNamesClient, GeoNamesClientConfig,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ATLAS_LOG")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "sync failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = atlas_infra::config::load()?;

    // Fail on missing credentials before touching the network or database.
    let access_token = config.directory.access_token.clone().ok_or_else(|| {
        AtlasError::Config("ATLAS_DIRECTORY_TOKEN is required by the sync job".into())
    })?;
    let geocoder_username = config.geocoder.username.clone().ok_or_else(|| {
        AtlasError::Config("ATLAS_GEOCODER_USERNAME is required by the sync job".into())
    })?;

    let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
    db.run_migrations()?;

    let source = Arc::new(DirectoryClient::new(DirectoryClientConfig {
        base_url: config.directory.base_url.clone(),
        access_token,
        timeout: Duration::from_secs(config.directory.timeout_secs),
    })?);
    let geocoder = Arc::new(GeoNamesClient::new(GeoNamesClientConfig {
        base_url: config.geocoder.base_url.clone(),
        username: geocoder_username,
        timeout: Duration::from_secs(config.geocoder.timeout_secs),
    })?);
    let store = Arc::new(SqliteSyncStore::new(db));

    let service = SyncService::new(source, geocoder, store);
    let report = service.run().await?;

    tracing::info!(
        profiles = report.profiles_synced,
        locations_created = report.locations_created,
        locations_skipped = report.locations_skipped,
        "sync complete"
    );

    Ok(())
}
