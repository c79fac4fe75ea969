pub mod browse;
pub mod export;
pub mod health;
pub mod visualize;

use axum::Router;

use crate::state::AppState;

/// Build the full route tree.
///
/// ```text
/// /health                                                   service health
/// /browse                                                   categories with projects
/// /project/category/{category_short_name}/export-geojson    GeoJSON export
/// /geotagx/visualize/{short_name}/{task_id}                 task runs of one task
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(browse::router())
        .merge(export::router())
        .nest("/geotagx", visualize::router())
}
