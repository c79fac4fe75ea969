//! Repository for the `categories` table.

use sqlx::PgPool;

use crate::models::category::{Category, CreateCategory};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, short_name, description, created_at, updated_at";

/// Provides lookups over project categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, short_name, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(&input.short_name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a category by its unique short name.
    pub async fn find_by_short_name(
        pool: &PgPool,
        short_name: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE short_name = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(short_name)
            .fetch_optional(pool)
            .await
    }

    /// List all categories ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY name");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// List categories that contain at least one project, ordered by name.
    pub async fn list_used(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories c
             WHERE EXISTS (SELECT 1 FROM projects p WHERE p.category_id = c.id)
             ORDER BY name"
        );
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }
}
