//! Repository for the `task_runs` table.

use geotagx_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTaskRun, TaskRun};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, task_id, info, created_at, updated_at";

/// Provides access to contributed task runs.
pub struct TaskRunRepo;

impl TaskRunRepo {
    /// Record a task run, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTaskRun) -> Result<TaskRun, sqlx::Error> {
        let query = format!(
            "INSERT INTO task_runs (project_id, task_id, info)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TaskRun>(&query)
            .bind(input.project_id)
            .bind(input.task_id)
            .bind(&input.info)
            .fetch_one(pool)
            .await
    }

    /// List every task run of a project in submission order.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<TaskRun>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM task_runs WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, TaskRun>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List the task runs of one task within a project, in submission order.
    pub async fn list_by_task(
        pool: &PgPool,
        project_id: DbId,
        task_id: DbId,
    ) -> Result<Vec<TaskRun>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM task_runs WHERE project_id = $1 AND task_id = $2 ORDER BY id"
        );
        sqlx::query_as::<_, TaskRun>(&query)
            .bind(project_id)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }

    /// Count the task runs of a project.
    pub async fn count_by_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM task_runs WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
