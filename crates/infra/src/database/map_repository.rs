//! Map read model over committed profiles and locations.

use std::sync::Arc;

use async_trait::async_trait;
use atlas_core::map::ports::MapRepository;
use atlas_domain::{PlacedProfile, Result};
use rusqlite::Row;
use tokio::task;

use super::manager::DbManager;
use crate::errors::{map_join_error, InfraError};

/// SQLite-backed implementation of `MapRepository`.
pub struct SqliteMapRepository {
    db: Arc<DbManager>,
}

impl SqliteMapRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MapRepository for SqliteMapRepository {
    async fn placed_profiles(&self) -> Result<Vec<PlacedProfile>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<PlacedProfile>> {
            let conn = db.get_connection()?;

            let mut stmt = conn
                .prepare(
                    "SELECT p.name,
                            p.image_url,
                            p.directory_url,
                            l.name,
                            l.longitude,
                            l.latitude
                     FROM profiles AS p
                       INNER JOIN locations AS l
                         ON p.location = l.name
                     ORDER BY p.profile_id ASC",
                )
                .map_err(InfraError::from)?;

            let rows = stmt
                .query_map([], map_placed_profile_row)
                .map_err(InfraError::from)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(InfraError::from)?;

            Ok(rows)
        })
        .await
        .map_err(map_join_error)?
    }
}

/// Map a row to a PlacedProfile
fn map_placed_profile_row(row: &Row<'_>) -> rusqlite::Result<PlacedProfile> {
    Ok(PlacedProfile {
        name: row.get(0)?,
        image_url: row.get(1)?,
        directory_url: row.get(2)?,
        location_name: row.get(3)?,
        longitude: row.get(4)?,
        latitude: row.get(5)?,
    })
}
