//! Port interfaces for map projection

use async_trait::async_trait;
use atlas_domain::{PlacedProfile, Result};

/// Read model over profiles joined with their locations.
#[async_trait]
pub trait MapRepository: Send + Sync {
    /// Every profile that has a resolved location, ordered by profile id
    /// ascending. Profiles without a location are not part of the map.
    async fn placed_profiles(&self) -> Result<Vec<PlacedProfile>>;
}
