//! Port interfaces for sync operations

use async_trait::async_trait;
use atlas_domain::{Location, Profile, ResolvedLocation, Result};
use futures::stream::BoxStream;

/// Lazily paginated stream of remote profiles.
///
/// Items arrive in directory order. The stream is forward-only and consumed
/// exactly once; a failed page surfaces as an `Err` item and ends the run.
pub type ProfileStream<'a> = BoxStream<'a, Result<Profile>>;

/// Source of member profiles, backed by the remote directory API.
pub trait ProfileSource: Send + Sync {
    /// Stream every profile in the directory.
    ///
    /// Pages are fetched on demand as the stream is polled; nothing is
    /// requested up front.
    fn fetch_all(&self) -> ProfileStream<'_>;
}

/// Resolves a free-text location name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Look the name up with the geocoding service.
    ///
    /// A lookup that completes but matches nothing returns
    /// `AtlasError::Geocode`; transport and provider failures use the fatal
    /// variants.
    async fn resolve(&self, name: &str) -> Result<ResolvedLocation>;
}

/// Factory for transactional sync sessions.
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// Open a unit of work spanning one full sync run.
    async fn begin(&self) -> Result<Box<dyn SyncUnitOfWork>>;
}

/// One open transaction over the profile and location tables.
///
/// All operations see the transaction's own uncommitted writes. Dropping a
/// unit of work without committing discards them.
#[async_trait]
pub trait SyncUnitOfWork: Send + Sync {
    /// Whether a location row with this name already exists.
    async fn location_exists(&self, name: &str) -> Result<bool>;

    /// Insert a freshly resolved location.
    ///
    /// Returns `AtlasError::DuplicateLocation` if the name is already
    /// present.
    async fn insert_location(&self, location: &Location) -> Result<()>;

    /// Insert the profile, or overwrite every column if `profile_id` exists.
    async fn upsert_profile(&self, profile: &Profile) -> Result<()>;

    /// Commit the transaction, making the run's writes durable.
    async fn commit(&self) -> Result<()>;

    /// Discard everything written during the run.
    async fn rollback(&self) -> Result<()>;
}
