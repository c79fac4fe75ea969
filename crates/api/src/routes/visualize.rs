//! Route definitions mounted at `/geotagx`.

use axum::routing::get;
use axum::Router;

use crate::handlers::visualize;
use crate::state::AppState;

/// ```text
/// GET /visualize/{short_name}/{task_id} -> task_runs
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/visualize/{short_name}/{task_id}", get(visualize::task_runs))
}
