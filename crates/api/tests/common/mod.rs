#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use geotagx_api::config::ServerConfig;
use geotagx_api::router::build_app_router;
use geotagx_api::state::AppState;
use geotagx_core::schema::SchemaRegistry;
use geotagx_db::models::category::{Category, CreateCategory};
use geotagx_db::models::project::{CreateProject, Project};
use geotagx_db::models::task::{CreateTask, CreateTaskRun, Task, TaskRun};
use geotagx_db::repositories::{CategoryRepo, ProjectRepo, TaskRepo, TaskRunRepo};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Schemas used by the integration tests: `floods` and `shelters` are
/// supported, anything else is not.
pub const TEST_SCHEMAS: &str = r#"{
    "floods": { "questions": [
        { "type": "geotagging", "answer": { "saved_as": "location" }, "title": "Where is the water?" },
        { "type": "select", "answer": { "saved_as": "water" }, "title": "Is there water?" }
    ] },
    "shelters": { "questions": [
        { "type": "geotagging", "answer": { "saved_as": "area" }, "title": "Where are the tents?" },
        { "type": "select", "answer": { "saved_as": "tents" }, "title": "How many tents?" }
    ] }
}"#;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        schema_path: None,
    }
}

pub fn test_schemas() -> SchemaRegistry {
    SchemaRegistry::from_json_str(TEST_SCHEMAS).unwrap()
}

/// Build the full application router, using the same middleware stack as
/// `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_schemas(pool, test_schemas())
}

pub fn build_test_app_with_schemas(pool: PgPool, schemas: SchemaRegistry) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        schemas: Arc::new(schemas),
    };
    build_app_router(state, &config)
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn seed_category(pool: &PgPool, short_name: &str) -> Category {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: format!("Category {short_name}"),
            short_name: short_name.to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_project(pool: &PgPool, category_id: i64, short_name: &str) -> Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            category_id,
            name: format!("Project {short_name}"),
            short_name: short_name.to_string(),
            description: None,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_task(pool: &PgPool, project_id: i64, info: serde_json::Value) -> Task {
    TaskRepo::create(
        pool,
        &CreateTask {
            project_id,
            info: Some(info),
        },
    )
    .await
    .unwrap()
}

pub async fn seed_task_run(pool: &PgPool, task: &Task, info: serde_json::Value) -> TaskRun {
    TaskRunRepo::create(
        pool,
        &CreateTaskRun {
            project_id: task.project_id,
            task_id: task.id,
            info,
        },
    )
    .await
    .unwrap()
}
