//! Route definitions for category exports.

use axum::routing::get;
use axum::Router;

use crate::handlers::export;
use crate::state::AppState;

/// ```text
/// GET /project/category/{category_short_name}/export-geojson -> export_geojson
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/project/category/{category_short_name}/export-geojson",
        get(export::export_geojson),
    )
}
