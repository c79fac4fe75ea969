//! Shared response envelope types for API handlers.
//!
//! JSON listing endpoints use a `{ "data": ... }` envelope. The GeoJSON export
//! is the exception: its body is the bare `FeatureCollection` so map clients
//! can load it directly.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
