//! PostgreSQL persistence for categories, projects, tasks and task runs.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Convert a 1-based page number and page size into an SQL offset.
///
/// Pages below 1 are treated as page 1.
pub fn page_offset(page: i64, per_page: i64) -> i64 {
    (page.max(1) - 1) * per_page.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_has_no_offset() {
        assert_eq!(page_offset(1, 15), 0);
    }

    #[test]
    fn later_pages_skip_whole_pages() {
        assert_eq!(page_offset(3, 15), 30);
    }

    #[test]
    fn non_positive_page_is_clamped() {
        assert_eq!(page_offset(0, 15), 0);
        assert_eq!(page_offset(-4, 15), 0);
    }
}
