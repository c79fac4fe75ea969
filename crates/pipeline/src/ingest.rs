//! Schema-validated ingestion of task-run `info` payloads.
//!
//! Raw payloads are arbitrary JSON objects. Ingestion keeps only the answers
//! the project's schema declares, types them by question kind, and drops
//! values that cannot be summarized (null categorical answers, geolocation
//! answers that are not coordinate arrays, malformed vertices).

use std::collections::BTreeMap;

use geotagx_core::schema::{is_excluded_field, ProjectSchema, QuestionKind};
use geotagx_core::types::DbId;
use serde_json::Value;

/// Info field holding the analysed image's URL.
pub const IMAGE_URL_FIELD: &str = "img";

/// A single `[x, y]` position.
pub type Vertex = [f64; 2];

/// The vertex list of one geolocation answer.
pub type Polygon = Vec<Vertex>;

/// A typed answer to one schema question.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Categorical(Value),
    Geolocation(Polygon),
}

/// One contributor's answers for one image in one project.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRunRecord {
    pub project_id: DbId,
    pub image_url: String,
    pub answers: BTreeMap<String, Answer>,
}

/// Turn a raw task-run `info` payload into a [`TaskRunRecord`].
///
/// Returns `None` when the payload is not an object or carries no string
/// `img` field, since such a run cannot be attributed to an image.
pub fn ingest_task_run(
    project_id: DbId,
    schema: &ProjectSchema,
    info: &Value,
) -> Option<TaskRunRecord> {
    let object = info.as_object()?;
    let image_url = object.get(IMAGE_URL_FIELD)?.as_str()?.to_string();

    let mut answers = BTreeMap::new();
    for (field, value) in object {
        if is_excluded_field(field) {
            continue;
        }
        let Some(question) = schema.question(field) else {
            continue;
        };
        let answer = match question.kind {
            QuestionKind::Categorical if value.is_null() => continue,
            QuestionKind::Categorical => Answer::Categorical(value.clone()),
            QuestionKind::Geolocation => match parse_polygon(value) {
                Some(polygon) => Answer::Geolocation(polygon),
                None => {
                    tracing::debug!(project_id, field = %field, "Dropping non-array geolocation answer");
                    continue;
                }
            },
        };
        answers.insert(field.clone(), answer);
    }

    Some(TaskRunRecord {
        project_id,
        image_url,
        answers,
    })
}

/// Parse a geolocation answer. Non-array values yield `None`; malformed
/// vertices inside an array are skipped.
fn parse_polygon(value: &Value) -> Option<Polygon> {
    let vertices = value.as_array()?;
    Some(vertices.iter().filter_map(parse_vertex).collect())
}

fn parse_vertex(value: &Value) -> Option<Vertex> {
    let position = value.as_array()?;
    let x = position.first()?.as_f64()?;
    let y = position.get(1)?.as_f64()?;
    (x.is_finite() && y.is_finite()).then_some([x, y])
}
