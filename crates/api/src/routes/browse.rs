//! Route definitions for the project browser.

use axum::routing::get;
use axum::Router;

use crate::handlers::browse;
use crate::state::AppState;

/// ```text
/// GET /browse -> list_categories
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/browse", get(browse::list_categories))
}
