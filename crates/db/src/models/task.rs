//! Task and task-run entity models and DTOs.
//!
//! Both carry a free-form JSONB `info` payload. For task runs this is the
//! contributor's answer set, including the `img` URL of the analysed image.

use geotagx_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub info: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub project_id: DbId,
    pub info: Option<serde_json::Value>,
}

/// A row from the `task_runs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TaskRun {
    pub id: DbId,
    pub project_id: DbId,
    pub task_id: DbId,
    pub info: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a task run.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRun {
    pub project_id: DbId,
    pub task_id: DbId,
    pub info: serde_json::Value,
}
