use std::sync::Arc;

use geotagx_core::schema::SchemaRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: geotagx_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Supported project schemas, read-only after startup.
    pub schemas: Arc<SchemaRegistry>,
}
