//! GeoJSON export pipeline.
//!
//! Turns the task runs of a project category into a GeoJSON
//! `FeatureCollection`, one feature per image with a drawn geolocation:
//!
//! 1. [`fetch`]: read task runs of the category's supported projects
//! 2. [`ingest`]: validate each run's answers against its project schema
//! 3. [`aggregate`]: summarize answers per image and project
//! 4. [`mercator`] + [`geojson`]: reproject polygons and build features

pub mod aggregate;
pub mod error;
pub mod fetch;
pub mod geojson;
pub mod ingest;
pub mod mercator;
pub mod source;

use geotagx_core::schema::SchemaRegistry;

pub use error::PipelineError;
pub use geojson::FeatureCollection;
pub use source::{PgTaskRunSource, TaskRunSource};

/// Export a category's results as GeoJSON.
///
/// An unknown category, or one without supported projects, yields an empty
/// collection. Store failures abort the export.
pub async fn export_category_geojson<S>(
    source: &S,
    schemas: &SchemaRegistry,
    category_short_name: &str,
) -> Result<FeatureCollection, PipelineError>
where
    S: TaskRunSource + ?Sized,
{
    let fetched = fetch::fetch_category_task_runs(source, schemas, category_short_name).await?;
    let summaries =
        aggregate::aggregate(&fetched.records, &fetched.project_names, &fetched.questions);
    let images = summaries.len();
    let collection = geojson::build_feature_collection(summaries);

    tracing::info!(
        category = %category_short_name,
        projects = fetched.project_names.len(),
        task_runs = fetched.records.len(),
        images,
        features = collection.features.len(),
        "Exported category as GeoJSON"
    );

    Ok(collection)
}
