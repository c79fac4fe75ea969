/// Errors that abort a category export.
///
/// Per-value problems (malformed answers, unprojectable vertices) never surface
/// here; they are dropped where they are found.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The project/task-run store could not be read.
    #[error("Task-run store error: {0}")]
    Database(#[from] sqlx::Error),
}
