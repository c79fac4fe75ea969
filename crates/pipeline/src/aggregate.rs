//! Per-image aggregation of task-run answers.
//!
//! Records are grouped by image URL, then by project. Each (image, project)
//! group contributes, per answered question, either a frequency table or the
//! accumulated geolocation polygons, plus a task-run total.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use geotagx_core::schema::{is_excluded_field, namespaced_key, QuestionIndex, QuestionKind};
use geotagx_core::types::DbId;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::ingest::{Answer, Polygon, TaskRunRecord};

/// Property holding the image URL of a summary.
pub const IMAGE_URL_KEY: &str = "GEOTAGX_IMAGE_URL";

/// Field suffix of the per-project task-run total (`short_name::GEOTAGX_TOTAL`).
pub const TOTAL_FIELD: &str = "GEOTAGX_TOTAL";

/// Summary of all answers to one question for one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuestionSummary {
    Answers {
        answer_summary: BTreeMap<String, u64>,
        question_text: String,
    },
    Geolocations {
        geo_summary: Vec<Polygon>,
        question_text: String,
    },
}

/// Everything known about one image across the exported projects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerImageSummary {
    pub image_url: String,
    /// `short_name::GEOTAGX_TOTAL` -> number of task runs.
    pub totals: BTreeMap<String, usize>,
    /// `short_name::field` -> summary.
    pub questions: BTreeMap<String, QuestionSummary>,
    /// Namespaced key of the question whose polygons become the map geometry.
    pub geolocation_key: Option<String>,
}

impl PerImageSummary {
    fn new(image_url: &str) -> Self {
        Self {
            image_url: image_url.to_string(),
            ..Self::default()
        }
    }

    /// The polygons of the designated geolocation question, if any.
    pub fn geolocations(&self) -> Option<&[Polygon]> {
        let key = self.geolocation_key.as_ref()?;
        match self.questions.get(key)? {
            QuestionSummary::Geolocations { geo_summary, .. } => Some(geo_summary),
            QuestionSummary::Answers { .. } => None,
        }
    }

    /// Flatten into a GeoJSON properties object.
    ///
    /// Geolocation summaries are left out; their polygons belong in the
    /// feature's geometry, not its properties.
    pub fn into_properties(self) -> Map<String, Value> {
        let mut properties = Map::new();
        properties.insert(IMAGE_URL_KEY.to_string(), Value::String(self.image_url));
        for (key, total) in self.totals {
            properties.insert(key, Value::from(total));
        }
        for (key, summary) in self.questions {
            if let QuestionSummary::Answers {
                answer_summary,
                question_text,
            } = summary
            {
                properties.insert(
                    key,
                    json!({
                        "answer_summary": answer_summary,
                        "question_text": question_text,
                    }),
                );
            }
        }
        properties
    }
}

/// Summarize task runs per image.
///
/// Images keep the order in which they first appear in `records`; within an
/// image, projects are processed by ascending id and fields by name. Records of
/// projects missing from `project_names` are ignored.
pub fn aggregate(
    records: &[TaskRunRecord],
    project_names: &HashMap<DbId, String>,
    questions: &QuestionIndex,
) -> Vec<PerImageSummary> {
    let mut by_image: IndexMap<&str, BTreeMap<DbId, Vec<&TaskRunRecord>>> = IndexMap::new();
    for record in records {
        by_image
            .entry(record.image_url.as_str())
            .or_default()
            .entry(record.project_id)
            .or_default()
            .push(record);
    }

    by_image
        .into_iter()
        .map(|(image_url, by_project)| {
            let mut summary = PerImageSummary::new(image_url);
            for (project_id, group) in by_project {
                let Some(short_name) = project_names.get(&project_id) else {
                    continue;
                };
                summarize_project(&mut summary, short_name, &group, questions);
            }
            summary
        })
        .collect()
}

fn summarize_project(
    summary: &mut PerImageSummary,
    short_name: &str,
    group: &[&TaskRunRecord],
    questions: &QuestionIndex,
) {
    summary
        .totals
        .insert(namespaced_key(short_name, TOTAL_FIELD), group.len());

    let fields: BTreeSet<&str> = group
        .iter()
        .flat_map(|record| record.answers.keys().map(String::as_str))
        .collect();

    for field in fields {
        if is_excluded_field(field) {
            continue;
        }
        let key = namespaced_key(short_name, field);
        let Some(kind) = questions.kind(&key) else {
            continue;
        };
        let question_text = questions.title(&key).unwrap_or_default().to_string();

        let question_summary = match kind {
            QuestionKind::Geolocation => {
                if let Some(previous) = summary.geolocation_key.as_deref() {
                    if previous != key {
                        tracing::warn!(
                            image_url = %summary.image_url,
                            previous = %previous,
                            current = %key,
                            "Several geolocation questions for one image, keeping the last"
                        );
                    }
                }
                summary.geolocation_key = Some(key.clone());
                QuestionSummary::Geolocations {
                    geo_summary: collect_polygons(group, field),
                    question_text,
                }
            }
            QuestionKind::Categorical => QuestionSummary::Answers {
                answer_summary: count_answers(group, field),
                question_text,
            },
        };
        summary.questions.insert(key, question_summary);
    }
}

fn collect_polygons(group: &[&TaskRunRecord], field: &str) -> Vec<Polygon> {
    group
        .iter()
        .filter_map(|record| match record.answers.get(field) {
            Some(Answer::Geolocation(polygon)) => Some(polygon.clone()),
            _ => None,
        })
        .collect()
}

fn count_answers(group: &[&TaskRunRecord], field: &str) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for record in group {
        if let Some(Answer::Categorical(value)) = record.answers.get(field) {
            *counts.entry(answer_label(value)).or_insert(0) += 1;
        }
    }
    counts
}

/// Frequency-table key of an answer: strings verbatim, anything else as
/// compact JSON.
fn answer_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotagx_core::schema::SchemaRegistry;
    use serde_json::json;

    fn questions() -> QuestionIndex {
        let registry = SchemaRegistry::from_json_str(
            r#"{
                "floods": { "questions": [
                    { "type": "geotagging", "answer": { "saved_as": "location" }, "title": "Where?" },
                    { "type": "select", "answer": { "saved_as": "water" }, "title": "Water?" }
                ] },
                "damage": { "questions": [
                    { "type": "geotagging", "answer": { "saved_as": "area" }, "title": "Damaged area?" },
                    { "type": "select", "answer": { "saved_as": "water" }, "title": "Flooded?" }
                ] }
            }"#,
        )
        .unwrap();
        registry.question_index(["floods", "damage"])
    }

    fn names() -> HashMap<DbId, String> {
        HashMap::from([(1, "floods".to_string()), (2, "damage".to_string())])
    }

    fn record(project_id: DbId, image_url: &str, answers: &[(&str, Answer)]) -> TaskRunRecord {
        TaskRunRecord {
            project_id,
            image_url: image_url.to_string(),
            answers: answers
                .iter()
                .map(|(field, answer)| (field.to_string(), answer.clone()))
                .collect(),
        }
    }

    fn categorical(value: Value) -> Answer {
        Answer::Categorical(value)
    }

    #[test]
    fn counts_categorical_answers() {
        let records = vec![
            record(1, "a", &[("water", categorical(json!("yes")))]),
            record(1, "a", &[("water", categorical(json!("yes")))]),
            record(1, "a", &[("water", categorical(json!("no")))]),
        ];
        let summaries = aggregate(&records, &names(), &questions());

        assert_eq!(summaries.len(), 1);
        assert_eq!(
            summaries[0].questions["floods::water"],
            QuestionSummary::Answers {
                answer_summary: BTreeMap::from([("yes".to_string(), 2), ("no".to_string(), 1)]),
                question_text: "Water?".to_string(),
            }
        );
    }

    #[test]
    fn non_string_answers_are_counted_by_json_text() {
        let records = vec![
            record(1, "a", &[("water", categorical(json!(true)))]),
            record(1, "a", &[("water", categorical(json!(["x", "y"])))]),
            record(1, "a", &[("water", categorical(json!(true)))]),
        ];
        let summaries = aggregate(&records, &names(), &questions());

        let QuestionSummary::Answers { answer_summary, .. } = &summaries[0].questions["floods::water"]
        else {
            panic!("expected an answer summary");
        };
        assert_eq!(answer_summary["true"], 2);
        assert_eq!(answer_summary[r#"["x","y"]"#], 1);
    }

    #[test]
    fn totals_count_records_per_image_and_project() {
        let records = vec![
            record(1, "a", &[]),
            record(1, "a", &[]),
            record(2, "a", &[]),
            record(1, "b", &[]),
        ];
        let summaries = aggregate(&records, &names(), &questions());

        assert_eq!(summaries[0].image_url, "a");
        assert_eq!(summaries[0].totals["floods::GEOTAGX_TOTAL"], 2);
        assert_eq!(summaries[0].totals["damage::GEOTAGX_TOTAL"], 1);
        assert_eq!(summaries[1].image_url, "b");
        assert_eq!(summaries[1].totals["floods::GEOTAGX_TOTAL"], 1);
        assert!(!summaries[1].totals.contains_key("damage::GEOTAGX_TOTAL"));
    }

    #[test]
    fn images_keep_first_seen_order() {
        let records = vec![record(1, "z", &[]), record(1, "a", &[]), record(1, "z", &[])];
        let summaries = aggregate(&records, &names(), &questions());
        let urls: Vec<&str> = summaries.iter().map(|s| s.image_url.as_str()).collect();
        assert_eq!(urls, vec!["z", "a"]);
    }

    #[test]
    fn geolocation_answers_accumulate_polygons() {
        let square = vec![[1.0e6, 1.0e6], [2.0e6, 1.0e6], [2.0e6, 2.0e6]];
        let records = vec![
            record(1, "a", &[("location", Answer::Geolocation(square.clone()))]),
            record(1, "a", &[("location", Answer::Geolocation(vec![]))]),
            record(1, "a", &[("water", categorical(json!("yes")))]),
        ];
        let summaries = aggregate(&records, &names(), &questions());
        let summary = &summaries[0];

        assert_eq!(summary.geolocation_key.as_deref(), Some("floods::location"));
        assert_eq!(summary.geolocations(), Some(&[square, vec![]][..]));
        assert_eq!(summary.totals["floods::GEOTAGX_TOTAL"], 3);
    }

    #[test]
    fn image_without_geolocation_has_no_key() {
        let records = vec![record(1, "a", &[("water", categorical(json!("yes")))])];
        let summaries = aggregate(&records, &names(), &questions());
        assert!(summaries[0].geolocation_key.is_none());
        assert!(summaries[0].geolocations().is_none());
    }

    #[test]
    fn last_geolocation_question_wins() {
        let records = vec![
            record(1, "a", &[("location", Answer::Geolocation(vec![[1.0e6, 1.0e6]]))]),
            record(2, "a", &[("area", Answer::Geolocation(vec![[3.0e6, 3.0e6]]))]),
        ];
        let summaries = aggregate(&records, &names(), &questions());
        let summary = &summaries[0];

        // Project 1 is processed before project 2.
        assert_eq!(summary.geolocation_key.as_deref(), Some("damage::area"));
        assert_eq!(summary.geolocations(), Some(&[vec![[3.0e6, 3.0e6]]][..]));
        assert!(summary.questions.contains_key("floods::location"));
    }

    #[test]
    fn identical_fields_are_namespaced_per_project() {
        let records = vec![
            record(1, "a", &[("water", categorical(json!("yes")))]),
            record(2, "a", &[("water", categorical(json!("no")))]),
        ];
        let summaries = aggregate(&records, &names(), &questions());
        let questions = &summaries[0].questions;

        assert!(questions.contains_key("floods::water"));
        assert!(questions.contains_key("damage::water"));
    }

    #[test]
    fn excluded_and_undeclared_fields_never_appear() {
        let records = vec![record(
            1,
            "a",
            &[
                ("img", categorical(json!("a"))),
                ("task_id", categorical(json!(4))),
                ("son_app_id", categorical(json!(9))),
                ("comment", categorical(json!("hi"))),
            ],
        )];
        let summaries = aggregate(&records, &names(), &questions());
        assert!(summaries[0].questions.is_empty());
    }

    #[test]
    fn unknown_project_records_are_ignored() {
        let records = vec![record(99, "a", &[("water", categorical(json!("yes")))])];
        let summaries = aggregate(&records, &names(), &questions());
        assert!(summaries[0].totals.is_empty());
        assert!(summaries[0].questions.is_empty());
    }

    #[test]
    fn properties_omit_geolocations() {
        let records = vec![
            record(1, "a", &[("location", Answer::Geolocation(vec![[1.0e6, 1.0e6]]))]),
            record(1, "a", &[("water", categorical(json!("yes")))]),
        ];
        let summary = aggregate(&records, &names(), &questions()).remove(0);
        let properties = summary.into_properties();

        assert_eq!(properties[IMAGE_URL_KEY], json!("a"));
        assert_eq!(properties["floods::GEOTAGX_TOTAL"], json!(2));
        assert_eq!(
            properties["floods::water"],
            json!({"answer_summary": {"yes": 1}, "question_text": "Water?"})
        );
        assert!(!properties.contains_key("floods::location"));
    }
}
