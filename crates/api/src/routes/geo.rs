//! GeoJSON map data route.

use std::sync::Arc;

use atlas_domain::geojson::FeatureCollection;
use axum::extract::State;
use axum::Json;

use crate::context::AppContext;
use crate::routes::ApiError;

/// `GET /api/geo.json` - every synced member with a resolved location, as a
/// GeoJSON feature collection.
pub async fn geo_json(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let collection = ctx.map_service.feature_collection().await?;
    Ok(Json(collection))
}
