//! Collects the task runs of a category's supported projects.

use std::collections::HashMap;

use geotagx_core::schema::{QuestionIndex, SchemaRegistry};
use geotagx_core::types::DbId;

use crate::error::PipelineError;
use crate::ingest::{ingest_task_run, TaskRunRecord};
use crate::source::TaskRunSource;

/// Maximum number of projects of a category included in one export.
///
/// Only the first page of this size is read; further projects are ignored.
pub const MAX_EXPORTABLE_PROJECTS: i64 = 15;

/// Everything the aggregator needs about a category.
#[derive(Debug, Default)]
pub struct CategoryTaskRuns {
    /// Short names of the supported projects that were read.
    pub project_names: HashMap<DbId, String>,
    /// Namespaced question lookup tables for those projects.
    pub questions: QuestionIndex,
    /// Ingested task runs of all those projects, project by project.
    pub records: Vec<TaskRunRecord>,
}

/// Read the task runs of every supported project in a category.
///
/// Unsupported projects are skipped without touching their task runs. Any
/// store error aborts the whole fetch.
pub async fn fetch_category_task_runs<S>(
    source: &S,
    schemas: &SchemaRegistry,
    category_short_name: &str,
) -> Result<CategoryTaskRuns, PipelineError>
where
    S: TaskRunSource + ?Sized,
{
    let projects = source
        .projects_in_category(category_short_name, 1, MAX_EXPORTABLE_PROJECTS)
        .await?;

    let mut fetched = CategoryTaskRuns::default();

    for project in projects {
        let Some(schema) = schemas.get(&project.short_name) else {
            tracing::debug!(
                project = %project.short_name,
                "Skipping project without a supported schema"
            );
            continue;
        };

        fetched.questions.insert_project(&project.short_name, schema);

        let infos = source.task_run_infos(project.id).await?;
        let total = infos.len();
        let before = fetched.records.len();
        fetched.records.extend(
            infos
                .iter()
                .filter_map(|info| ingest_task_run(project.id, schema, info)),
        );

        let skipped = total - (fetched.records.len() - before);
        if skipped > 0 {
            tracing::warn!(
                project = %project.short_name,
                skipped,
                "Skipped task runs without an image URL"
            );
        }

        fetched.project_names.insert(project.id, project.short_name);
    }

    Ok(fetched)
}
