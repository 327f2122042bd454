//! Map projection service

use std::sync::Arc;

use atlas_domain::geojson::FeatureCollection;
use atlas_domain::Result;

use super::ports::MapRepository;

/// Builds the GeoJSON document for the map front-end.
pub struct MapService {
    repository: Arc<dyn MapRepository>,
}

impl MapService {
    /// Create a new map service
    pub fn new(repository: Arc<dyn MapRepository>) -> Self {
        Self { repository }
    }

    /// Project all placed profiles into a feature collection.
    pub async fn feature_collection(&self) -> Result<FeatureCollection> {
        let placed = self.repository.placed_profiles().await?;
        Ok(FeatureCollection::from_placed_profiles(placed))
    }
}
