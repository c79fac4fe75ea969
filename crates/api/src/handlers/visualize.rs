//! Handler for inspecting the task runs of a single task.

use axum::extract::{Path, State};
use axum::Json;
use geotagx_core::error::CoreError;
use geotagx_core::schema::ProjectSchema;
use geotagx_core::types::DbId;
use geotagx_db::models::project::Project;
use geotagx_db::models::task::TaskRun;
use geotagx_db::repositories::{ProjectRepo, TaskRepo, TaskRunRepo};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TaskVisualization {
    pub project: Project,
    pub task_info: Value,
    pub task_runs: Vec<TaskRun>,
    pub schema: ProjectSchema,
}

/// GET /geotagx/visualize/{short_name}/{task_id}
///
/// Only projects with a known schema can be visualized.
pub async fn task_runs(
    State(state): State<AppState>,
    Path((short_name, task_id)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<TaskVisualization>>> {
    let task_id: DbId = task_id
        .parse()
        .map_err(|_| CoreError::Validation(format!("Invalid task id: {task_id}")))?;

    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Project",
            key: short_name.clone(),
        })
    };

    let schema = state.schemas.get(&short_name).ok_or_else(not_found)?.clone();

    let project = ProjectRepo::find_by_short_name(&state.pool, &short_name)
        .await?
        .ok_or_else(not_found)?;

    let task = TaskRepo::find_in_project(&state.pool, project.id, task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            key: task_id.to_string(),
        }))?;

    let task_runs = TaskRunRepo::list_by_task(&state.pool, project.id, task.id).await?;
    tracing::debug!(
        project = %short_name,
        task_id,
        task_runs = task_runs.len(),
        "Loaded task runs for visualization"
    );

    Ok(Json(DataResponse {
        data: TaskVisualization {
            project,
            task_info: task.info,
            task_runs,
            schema,
        },
    }))
}
