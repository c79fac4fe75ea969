//! Repository for the `projects` table.

use geotagx_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project};
use crate::page_offset;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, category_id, name, short_name, description, created_at, updated_at";

/// Same columns qualified with the `p` alias for joined queries.
const P_COLUMNS: &str =
    "p.id, p.category_id, p.name, p.short_name, p.description, p.created_at, p.updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (category_id, name, short_name, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.category_id)
            .bind(&input.name)
            .bind(&input.short_name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by its unique short name.
    pub async fn find_by_short_name(
        pool: &PgPool,
        short_name: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE short_name = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(short_name)
            .fetch_optional(pool)
            .await
    }

    /// List every project of a category, ordered by name.
    pub async fn list_by_category_id(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM projects WHERE category_id = $1 ORDER BY name, id");
        sqlx::query_as::<_, Project>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// List one page of a category's projects, most active first.
    ///
    /// Projects are ranked by their number of task runs (descending), ties
    /// broken by ascending id. `page` is 1-based. An unknown category yields
    /// an empty list.
    pub async fn list_by_category(
        pool: &PgPool,
        category_short_name: &str,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {P_COLUMNS}
             FROM projects p
             JOIN categories c ON c.id = p.category_id
             LEFT JOIN (
                 SELECT project_id, COUNT(*) AS n_task_runs
                 FROM task_runs
                 GROUP BY project_id
             ) tr ON tr.project_id = p.id
             WHERE c.short_name = $1
             ORDER BY COALESCE(tr.n_task_runs, 0) DESC, p.id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(category_short_name)
            .bind(per_page)
            .bind(page_offset(page, per_page))
            .fetch_all(pool)
            .await
    }
}
