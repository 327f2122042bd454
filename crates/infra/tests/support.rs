//! Shared helpers for infra integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use atlas_infra::database::DbManager;
use tempfile::TempDir;

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with the schema applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("test.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("migrations should run");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self
            .manager
            .get_connection()
            .expect("connection should be available for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }

    /// Count the rows of a table.
    pub fn count(&self, table: &str) -> i64 {
        let conn = self.manager.get_connection().expect("connection should be available");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count query should succeed")
    }

    /// Fetch `(name, image_url, directory_url, location)` for a profile.
    pub fn profile_row(&self, profile_id: i64) -> Option<(String, Option<String>, String, Option<String>)> {
        let conn = self.manager.get_connection().expect("connection should be available");
        conn.query_row(
            "SELECT name, image_url, directory_url, location FROM profiles WHERE profile_id = ?1",
            [profile_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )
        .ok()
    }

    /// Fetch `(longitude, latitude, geocode_result)` for a location.
    pub fn location_row(&self, name: &str) -> Option<(f64, f64, String)> {
        let conn = self.manager.get_connection().expect("connection should be available");
        conn.query_row(
            "SELECT longitude, latitude, geocode_result FROM locations WHERE name = ?1",
            [name],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .ok()
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the JSON body for one directory profile record.
pub fn profile_record(id: i64, name: &str, slug: &str, location: Option<&str>) -> serde_json::Value {
    let mut record = serde_json::json!({
        "id": id,
        "name": name,
        "image_path": format!("https://assets.test/{slug}.jpg"),
        "slug": slug,
    });
    if let Some(location_name) = location {
        record["current_location"] = serde_json::json!({"name": location_name});
    }
    record
}

/// Build a GeoNames search response with a single match.
pub fn geonames_match(name: &str, lng: &str, lat: &str) -> serde_json::Value {
    serde_json::json!({
        "totalResultsCount": 1,
        "geonames": [{"name": name, "lng": lng, "lat": lat, "fcl": "P"}],
    })
}
