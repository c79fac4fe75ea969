//! Read interface to the project/task-run store.
//!
//! The export only needs two queries: a page of a category's projects and the
//! raw `info` payloads of a project's task runs. [`TaskRunSource`] captures
//! that seam so the pipeline can run against PostgreSQL in production and
//! against in-memory fixtures in tests.

use async_trait::async_trait;
use geotagx_core::types::DbId;
use geotagx_db::repositories::{ProjectRepo, TaskRunRepo};
use geotagx_db::DbPool;
use serde_json::Value;

use crate::error::PipelineError;

/// The part of a project the export needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceProject {
    pub id: DbId,
    pub short_name: String,
}

#[async_trait]
pub trait TaskRunSource: Send + Sync {
    /// One page (1-based) of the category's projects, most relevant first.
    async fn projects_in_category(
        &self,
        category_short_name: &str,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<SourceProject>, PipelineError>;

    /// The `info` payloads of every task run of a project.
    async fn task_run_infos(&self, project_id: DbId) -> Result<Vec<Value>, PipelineError>;
}

/// [`TaskRunSource`] backed by the PostgreSQL repositories.
#[derive(Clone)]
pub struct PgTaskRunSource {
    pool: DbPool,
}

impl PgTaskRunSource {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRunSource for PgTaskRunSource {
    async fn projects_in_category(
        &self,
        category_short_name: &str,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<SourceProject>, PipelineError> {
        let projects =
            ProjectRepo::list_by_category(&self.pool, category_short_name, page, per_page).await?;
        Ok(projects
            .into_iter()
            .map(|p| SourceProject {
                id: p.id,
                short_name: p.short_name,
            })
            .collect())
    }

    async fn task_run_infos(&self, project_id: DbId) -> Result<Vec<Value>, PipelineError> {
        let runs = TaskRunRepo::list_by_project(&self.pool, project_id).await?;
        Ok(runs.into_iter().map(|run| run.info).collect())
    }
}
