//! Handler for the category GeoJSON export.

use axum::extract::{Path, State};
use axum::Json;
use geotagx_pipeline::{export_category_geojson, FeatureCollection, PgTaskRunSource};

use crate::error::AppResult;
use crate::state::AppState;

/// GET /project/category/{category_short_name}/export-geojson
///
/// Unknown categories export an empty collection rather than a 404.
pub async fn export_geojson(
    State(state): State<AppState>,
    Path(category_short_name): Path<String>,
) -> AppResult<Json<FeatureCollection>> {
    let source = PgTaskRunSource::new(state.pool.clone());
    let collection = export_category_geojson(&source, &state.schemas, &category_short_name).await?;
    Ok(Json(collection))
}
