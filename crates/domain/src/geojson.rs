//! GeoJSON projection types.
//!
//! A minimal model of the GeoJSON `FeatureCollection` contract served to the
//! map front-end (RFC 7946 subset): point features only, with the properties
//! the map renderer expects. Serialization order and field names are part of
//! the downstream contract and must stay stable.

use serde::{Deserialize, Serialize};

use crate::types::PlacedProfile;

/// A GeoJSON feature collection of member locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Build a collection from joined profile rows, preserving their order.
    pub fn from_placed_profiles(profiles: Vec<PlacedProfile>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features: profiles.into_iter().map(Feature::from_placed_profile).collect(),
        }
    }
}

/// One member pin on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: FeatureProperties,
}

impl Feature {
    fn from_placed_profile(profile: PlacedProfile) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: Geometry::point(profile.longitude, profile.latitude),
            properties: FeatureProperties {
                name: profile.name,
                image_url: profile.image_url,
                directory_url: profile.directory_url,
                location_name: profile.location_name,
            },
        }
    }
}

/// Point geometry. Coordinates are `[longitude, latitude]` per RFC 7946.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: [f64; 2],
}

impl Geometry {
    fn point(longitude: f64, latitude: f64) -> Self {
        Self { kind: "Point".to_string(), coordinates: [longitude, latitude] }
    }
}

/// Properties attached to each feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    pub name: String,
    pub image_url: Option<String>,
    pub directory_url: String,
    pub location_name: String,
}
