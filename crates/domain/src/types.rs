//! Core domain types for directory profiles and geocoded locations.

use serde::{Deserialize, Serialize};

/// A member profile as persisted in the local store.
///
/// Mirrors one record of the remote member directory. `profile_id` is the
/// remote identifier and the primary key; re-syncing the same profile
/// overwrites every other column (last write wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Remote directory identifier, stable across syncs.
    pub profile_id: i64,
    /// Display name.
    pub name: String,
    /// Avatar URL, if the member has one.
    pub image_url: Option<String>,
    /// Link back to the member's page on the directory site.
    pub directory_url: String,
    /// Free-text location name, references [`Location::name`] when set.
    pub location: Option<String>,
}

/// A geocoded location, created at most once per distinct name.
///
/// Rows are immutable once written: the first resolution of a name wins and
/// later syncs reuse it without consulting the geocoder again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// The free-text name exactly as it appears on profiles.
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
    /// Full raw geocoder response body, kept for audit and re-processing.
    pub geocode_result: serde_json::Value,
}

impl Location {
    /// Build a location row from a resolver result.
    pub fn from_resolved(name: impl Into<String>, resolved: ResolvedLocation) -> Self {
        Self {
            name: name.into(),
            longitude: resolved.longitude,
            latitude: resolved.latitude,
            geocode_result: resolved.raw,
        }
    }
}

/// Output of a single geocoder lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub longitude: f64,
    pub latitude: f64,
    /// The complete response body the coordinates were taken from.
    pub raw: serde_json::Value,
}

/// A profile joined with its resolved location, ready for map projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedProfile {
    pub name: String,
    pub image_url: Option<String>,
    pub directory_url: String,
    pub location_name: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// Outcome counters for one sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Profiles upserted during the run.
    pub profiles_synced: usize,
    /// Locations resolved and inserted for the first time.
    pub locations_created: usize,
    /// Profiles stored without a location after a geocode miss.
    pub locations_skipped: usize,
}
