//! Handler for the project browser.

use axum::extract::State;
use axum::Json;
use geotagx_db::models::category::Category;
use geotagx_db::models::project::Project;
use geotagx_db::repositories::{CategoryRepo, ProjectRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Categories only administrators may browse.
pub const RESTRICTED_CATEGORIES: &[&str] = &["underdevelopment"];

/// A category together with its projects.
#[derive(Debug, Serialize)]
pub struct CategoryWithProjects {
    #[serde(flatten)]
    pub category: Category,
    pub projects: Vec<Project>,
}

/// GET /browse
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CategoryWithProjects>>>> {
    let categories = CategoryRepo::list_used(&state.pool).await?;

    let mut data = Vec::with_capacity(categories.len());
    for category in categories {
        if RESTRICTED_CATEGORIES.contains(&category.short_name.as_str()) {
            continue;
        }
        let projects = ProjectRepo::list_by_category_id(&state.pool, category.id).await?;
        data.push(CategoryWithProjects { category, projects });
    }

    Ok(Json(DataResponse { data }))
}
