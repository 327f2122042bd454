//! Transactional unit of work for sync runs.
//!
//! A sync run holds one dedicated pooled connection with an open
//! `BEGIN IMMEDIATE` transaction for its whole duration. Every store
//! operation sees the run's own uncommitted writes; nothing is visible to
//! other connections until `commit`. Dropping a session without committing
//! rolls the transaction back.

use std::sync::Arc;

use async_trait::async_trait;
use atlas_core::sync::ports::{SyncStore, SyncUnitOfWork};
use atlas_domain::{AtlasError, Location, Profile, Result};
use parking_lot::Mutex;
use rusqlite::params;
use tokio::task;
use tracing::warn;

use super::manager::{DbConnection, DbManager};
use crate::errors::{is_unique_violation, map_join_error, InfraError};

/// SQLite-backed implementation of `SyncStore`.
pub struct SqliteSyncStore {
    db: Arc<DbManager>,
}

impl SqliteSyncStore {
    /// Create a new store instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SyncStore for SqliteSyncStore {
    async fn begin(&self) -> Result<Box<dyn SyncUnitOfWork>> {
        let db = Arc::clone(&self.db);

        let conn = task::spawn_blocking(move || -> Result<DbConnection> {
            let conn = db.get_connection()?;
            // IMMEDIATE takes the write lock up front, so a concurrent run
            // fails fast here instead of deadlocking mid-stream.
            conn.execute_batch("BEGIN IMMEDIATE").map_err(InfraError::from)?;
            Ok(conn)
        })
        .await
        .map_err(map_join_error)??;

        Ok(Box::new(SqliteSyncSession { conn: Arc::new(Mutex::new(Some(conn))) }))
    }
}

/// One open transaction over the profile and location tables.
pub struct SqliteSyncSession {
    // None once the transaction has been committed or rolled back. The lock
    // is only ever taken inside spawn_blocking, never across an await.
    conn: Arc<Mutex<Option<DbConnection>>>,
}

impl SqliteSyncSession {
    async fn with_conn<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&DbConnection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        task::spawn_blocking(move || -> Result<T> {
            let guard = conn.lock();
            let conn = guard
                .as_ref()
                .ok_or_else(|| AtlasError::Internal("sync transaction already closed".into()))?;
            op(conn)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn finish(&self, statement: &'static str) -> Result<()> {
        let conn = Arc::clone(&self.conn);

        task::spawn_blocking(move || -> Result<()> {
            let mut guard = conn.lock();
            let conn = guard
                .take()
                .ok_or_else(|| AtlasError::Internal("sync transaction already closed".into()))?;
            close_transaction(conn, statement)
        })
        .await
        .map_err(map_join_error)?
    }
}

/// Close the open transaction and release the connection back to the pool.
///
/// A connection must never return to the pool mid-transaction: the next
/// checkout would silently operate inside it. If the closing statement
/// fails, the transaction is rolled back before the connection is released;
/// a connection that cannot be cleared is leaked instead of pooled.
fn close_transaction(conn: DbConnection, statement: &str) -> Result<()> {
    if let Err(err) = conn.execute_batch(statement) {
        if !conn.is_autocommit() && conn.execute_batch("ROLLBACK").is_err() {
            warn!("discarding a connection stuck mid-transaction");
            std::mem::forget(conn);
        }
        return Err(InfraError::from(err).into());
    }
    Ok(())
}

#[async_trait]
impl SyncUnitOfWork for SqliteSyncSession {
    async fn location_exists(&self, name: &str) -> Result<bool> {
        let name = name.to_string();

        self.with_conn(move |conn| {
            let found = conn
                .query_row("SELECT 1 FROM locations WHERE name = ?1", params![&name], |_| Ok(()))
                .map(|()| true)
                .or_else(|err| match err {
                    rusqlite::Error::QueryReturnedNoRows => Ok(false),
                    other => Err(InfraError::from(other)),
                })?;
            Ok(found)
        })
        .await
    }

    async fn insert_location(&self, location: &Location) -> Result<()> {
        let location = location.clone();

        self.with_conn(move |conn| {
            let raw = serde_json::to_string(&location.geocode_result).map_err(|err| {
                AtlasError::Internal(format!("failed to serialize geocode result: {err}"))
            })?;

            conn.execute(
                "INSERT INTO locations (name, longitude, latitude, geocode_result)
                 VALUES (?1, ?2, ?3, ?4)",
                params![&location.name, location.longitude, location.latitude, &raw],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    AtlasError::DuplicateLocation(location.name.clone())
                } else {
                    InfraError::from(err).into()
                }
            })?;
            Ok(())
        })
        .await
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<()> {
        let profile = profile.clone();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO profiles (profile_id, name, image_url, directory_url, location)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(profile_id) DO UPDATE SET
                    name = excluded.name,
                    image_url = excluded.image_url,
                    directory_url = excluded.directory_url,
                    location = excluded.location",
                params![
                    profile.profile_id,
                    &profile.name,
                    &profile.image_url,
                    &profile.directory_url,
                    &profile.location,
                ],
            )
            .map_err(InfraError::from)?;
            Ok(())
        })
        .await
    }

    async fn commit(&self) -> Result<()> {
        self.finish("COMMIT").await
    }

    async fn rollback(&self) -> Result<()> {
        self.finish("ROLLBACK").await
    }
}

impl Drop for SqliteSyncSession {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.lock().take() {
            if let Err(err) = close_transaction(conn, "ROLLBACK") {
                warn!(error = %err, "failed to roll back abandoned sync transaction");
            }
        }
    }
}
