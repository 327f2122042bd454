//! Directory sync service - core business logic

use std::sync::Arc;

use atlas_domain::{Location, Profile, Result, SyncReport};
use futures::TryStreamExt;
use tracing::{debug, error, info, instrument, warn};

use super::ports::{Geocoder, ProfileSource, SyncStore, SyncUnitOfWork};

/// Directory sync service
///
/// Streams profiles from the remote directory, resolves unseen location
/// names through the geocoder, and upserts everything into the store inside
/// a single transaction. Either the whole run commits or none of it does.
pub struct SyncService {
    source: Arc<dyn ProfileSource>,
    geocoder: Arc<dyn Geocoder>,
    store: Arc<dyn SyncStore>,
}

impl SyncService {
    /// Create a new sync service
    pub fn new(
        source: Arc<dyn ProfileSource>,
        geocoder: Arc<dyn Geocoder>,
        store: Arc<dyn SyncStore>,
    ) -> Self {
        Self { source, geocoder, store }
    }

    /// Run one full sync pass.
    ///
    /// Opens a unit of work, drains the profile stream, then commits. Any
    /// unrecoverable error rolls the transaction back and leaves the store
    /// exactly as it was before the run.
    #[instrument(name = "sync_run", skip(self), fields(run_id = %uuid::Uuid::new_v4()))]
    pub async fn run(&self) -> Result<SyncReport> {
        info!("starting directory sync");

        let uow = self.store.begin().await?;

        match self.load_profiles(uow.as_ref()).await {
            Ok(report) => {
                uow.commit().await?;
                info!(
                    profiles = report.profiles_synced,
                    locations_created = report.locations_created,
                    locations_skipped = report.locations_skipped,
                    "sync committed"
                );
                Ok(report)
            }
            Err(err) => {
                error!(error = %err, "sync failed, rolling back");
                if let Err(rollback_err) = uow.rollback().await {
                    error!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn load_profiles(&self, uow: &dyn SyncUnitOfWork) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        let mut profiles = self.source.fetch_all();

        while let Some(profile) = profiles.try_next().await? {
            debug!(
                profile_id = profile.profile_id,
                name = %profile.name,
                location = profile.location.as_deref().unwrap_or("-"),
                "loading profile"
            );

            let profile = self.resolve_location(uow, profile, &mut report).await?;
            uow.upsert_profile(&profile).await?;
            report.profiles_synced += 1;
        }

        Ok(report)
    }

    /// Ensure the profile's location exists in the store before the profile
    /// row is written, so the location reference never dangles.
    async fn resolve_location(
        &self,
        uow: &dyn SyncUnitOfWork,
        mut profile: Profile,
        report: &mut SyncReport,
    ) -> Result<Profile> {
        let Some(name) = profile.location.clone() else {
            return Ok(profile);
        };

        if uow.location_exists(&name).await? {
            return Ok(profile);
        }

        match self.geocoder.resolve(&name).await {
            Ok(resolved) => {
                uow.insert_location(&Location::from_resolved(&name, resolved)).await?;
                report.locations_created += 1;
                Ok(profile)
            }
            Err(err) if err.is_recoverable() => {
                warn!(
                    profile_id = profile.profile_id,
                    location = %name,
                    error = %err,
                    "geocode miss, storing profile without location"
                );
                profile.location = None;
                report.locations_skipped += 1;
                Ok(profile)
            }
            Err(err) => Err(err),
        }
    }
}
