//! In-memory fake port implementations for testing
//!
//! Provides deterministic fakes for the sync and map ports, enabling unit
//! tests of the services without network or database dependencies.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use atlas_core::map::ports::MapRepository;
use atlas_core::sync::ports::{Geocoder, ProfileSource, ProfileStream, SyncStore, SyncUnitOfWork};
use atlas_domain::{
    AtlasError, Location, PlacedProfile, Profile, ResolvedLocation, Result as DomainResult,
};
use futures::stream::{self, StreamExt};

/// Fixed-content `ProfileSource`.
///
/// Yields the seeded profiles in order. With [`Self::failing_after`] the
/// stream emits a remote API error after the given number of profiles, as a
/// mid-run page failure would.
pub struct StaticProfileSource {
    profiles: Vec<Profile>,
    fail_after: Option<usize>,
}

impl StaticProfileSource {
    /// Create a source yielding exactly the given profiles.
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles, fail_after: None }
    }

    /// Create a source that fails with a remote API error after `after`
    /// profiles have been yielded.
    pub fn failing_after(profiles: Vec<Profile>, after: usize) -> Self {
        Self { profiles, fail_after: Some(after) }
    }
}

impl ProfileSource for StaticProfileSource {
    fn fetch_all(&self) -> ProfileStream<'_> {
        let mut items: Vec<DomainResult<Profile>> =
            self.profiles.iter().cloned().map(Ok).collect();

        if let Some(after) = self.fail_after {
            items.truncate(after);
            items.push(Err(AtlasError::RemoteApi("directory API returned HTTP 500".into())));
        }

        stream::iter(items).boxed()
    }
}

/// Scripted `Geocoder` that records every lookup.
#[derive(Default)]
pub struct StubGeocoder {
    results: HashMap<String, ResolvedLocation>,
    fatal_names: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl StubGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful resolution for `name`.
    pub fn with_result(mut self, name: &str, longitude: f64, latitude: f64) -> Self {
        let raw = serde_json::json!({
            "totalResultsCount": 1,
            "geonames": [{"lng": longitude.to_string(), "lat": latitude.to_string(), "name": name}],
        });
        self.results
            .insert(name.to_string(), ResolvedLocation { longitude, latitude, raw });
        self
    }

    /// Script a fatal provider failure for `name`.
    pub fn with_fatal(mut self, name: &str) -> Self {
        self.fatal_names.insert(name.to_string());
        self
    }

    /// Names looked up so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().expect("calls mutex poisoned").len()
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn resolve(&self, name: &str) -> DomainResult<ResolvedLocation> {
        self.calls.lock().expect("calls mutex poisoned").push(name.to_string());

        if self.fatal_names.contains(name) {
            return Err(AtlasError::RemoteApi(format!("geocoder rejected lookup for '{name}'")));
        }

        self.results
            .get(name)
            .cloned()
            .ok_or_else(|| AtlasError::Geocode(format!("no geocoder matches for '{name}'")))
    }
}

#[derive(Default)]
struct MemoryState {
    profiles: BTreeMap<i64, Profile>,
    locations: BTreeMap<String, Location>,
}

/// In-memory `SyncStore` with transactional semantics.
///
/// Writes go to a staging area visible to the open unit of work; `commit`
/// publishes them to the shared state, `rollback` (or dropping the unit of
/// work) discards them.
#[derive(Default, Clone)]
pub struct InMemorySyncStore {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemorySyncStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed profiles ordered by profile id.
    pub fn profiles(&self) -> Vec<Profile> {
        self.state.lock().expect("state mutex poisoned").profiles.values().cloned().collect()
    }

    /// Committed locations ordered by name.
    pub fn locations(&self) -> Vec<Location> {
        self.state.lock().expect("state mutex poisoned").locations.values().cloned().collect()
    }

    /// Place a location directly into committed state.
    pub fn seed_location(&self, location: Location) {
        self.state
            .lock()
            .expect("state mutex poisoned")
            .locations
            .insert(location.name.clone(), location);
    }

    /// Place a profile directly into committed state.
    pub fn seed_profile(&self, profile: Profile) {
        self.state
            .lock()
            .expect("state mutex poisoned")
            .profiles
            .insert(profile.profile_id, profile);
    }
}

#[async_trait]
impl SyncStore for InMemorySyncStore {
    async fn begin(&self) -> DomainResult<Box<dyn SyncUnitOfWork>> {
        Ok(Box::new(InMemoryUnitOfWork {
            base: Arc::clone(&self.state),
            staged: Mutex::new(MemoryState::default()),
        }))
    }
}

struct InMemoryUnitOfWork {
    base: Arc<Mutex<MemoryState>>,
    staged: Mutex<MemoryState>,
}

#[async_trait]
impl SyncUnitOfWork for InMemoryUnitOfWork {
    async fn location_exists(&self, name: &str) -> DomainResult<bool> {
        if self.staged.lock().expect("staged mutex poisoned").locations.contains_key(name) {
            return Ok(true);
        }
        Ok(self.base.lock().expect("base mutex poisoned").locations.contains_key(name))
    }

    async fn insert_location(&self, location: &Location) -> DomainResult<()> {
        if self.location_exists(&location.name).await? {
            return Err(AtlasError::DuplicateLocation(location.name.clone()));
        }
        self.staged
            .lock()
            .expect("staged mutex poisoned")
            .locations
            .insert(location.name.clone(), location.clone());
        Ok(())
    }

    async fn upsert_profile(&self, profile: &Profile) -> DomainResult<()> {
        self.staged
            .lock()
            .expect("staged mutex poisoned")
            .profiles
            .insert(profile.profile_id, profile.clone());
        Ok(())
    }

    async fn commit(&self) -> DomainResult<()> {
        let mut staged = self.staged.lock().expect("staged mutex poisoned");
        let mut base = self.base.lock().expect("base mutex poisoned");
        base.locations.append(&mut staged.locations);
        for (id, profile) in std::mem::take(&mut staged.profiles) {
            base.profiles.insert(id, profile);
        }
        Ok(())
    }

    async fn rollback(&self) -> DomainResult<()> {
        let mut staged = self.staged.lock().expect("staged mutex poisoned");
        staged.profiles.clear();
        staged.locations.clear();
        Ok(())
    }
}

/// Fixed-content `MapRepository`.
#[derive(Default, Clone)]
pub struct StaticMapRepository {
    placed: Arc<Vec<PlacedProfile>>,
}

impl StaticMapRepository {
    pub fn new(placed: Vec<PlacedProfile>) -> Self {
        Self { placed: Arc::new(placed) }
    }
}

#[async_trait]
impl MapRepository for StaticMapRepository {
    async fn placed_profiles(&self) -> DomainResult<Vec<PlacedProfile>> {
        Ok(self.placed.as_ref().clone())
    }
}
