//! Per-project question schemas.
//!
//! A deployment declares which projects are exportable by listing their
//! questions in a JSON map keyed by project short name:
//!
//! ```json
//! {
//!   "flood-extent": {
//!     "questions": [
//!       { "type": "geotagging", "answer": { "saved_as": "location" }, "title": "Where?" },
//!       { "type": "select", "answer": { "saved_as": "water" }, "title": "Water visible?" }
//!     ]
//!   }
//! }
//! ```
//!
//! Projects absent from the map are unsupported and are skipped by the export.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Separator between a project short name and a field name in namespaced keys.
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Question type string that marks a geolocation question.
pub const GEOTAGGING_TYPE: &str = "geotagging";

/// Task-run info fields that are bookkeeping, never answers.
pub const EXCLUDED_FIELDS: [&str; 5] = ["img", "isMigrated", "son_app_id", "task_id", "project_id"];

/// Returns `true` if `field` is one of the [`EXCLUDED_FIELDS`].
pub fn is_excluded_field(field: &str) -> bool {
    EXCLUDED_FIELDS.contains(&field)
}

/// Build the `short_name::field` key used to disambiguate identically named
/// fields across projects.
pub fn namespaced_key(short_name: &str, field: &str) -> String {
    format!("{short_name}{NAMESPACE_SEPARATOR}{field}")
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read schema file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse project schemas: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Project '{project}' declares field '{field}' more than once")]
    DuplicateField { project: String, field: String },

    #[error("Project '{project}' has a question with an empty saved_as field")]
    EmptyField { project: String },
}

// ---------------------------------------------------------------------------
// Question types
// ---------------------------------------------------------------------------

/// How answers to a question are summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Answers are counted by value.
    Categorical,
    /// Answers are polygons drawn on a map.
    Geolocation,
}

impl QuestionKind {
    /// Resolve a schema `type` string. Only `"geotagging"` is geolocation.
    pub fn from_type_name(type_name: &str) -> Self {
        if type_name == GEOTAGGING_TYPE {
            Self::Geolocation
        } else {
            Self::Categorical
        }
    }
}

/// A single question of a project, as declared in the deployment schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawQuestion")]
pub struct Question {
    /// Key under which the answer is stored in a task run's `info`.
    pub field: String,
    pub kind: QuestionKind,
    /// Display title, reported as `question_text` in summaries.
    pub title: String,
}

#[derive(Deserialize)]
struct RawQuestion {
    #[serde(rename = "type")]
    type_name: String,
    answer: RawAnswer,
    #[serde(default)]
    title: serde_json::Value,
}

#[derive(Deserialize)]
struct RawAnswer {
    saved_as: String,
}

impl From<RawQuestion> for Question {
    fn from(raw: RawQuestion) -> Self {
        let title = match raw.title {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        Self {
            field: raw.answer.saved_as,
            kind: QuestionKind::from_type_name(&raw.type_name),
            title,
        }
    }
}

/// The ordered question list of one supported project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSchema {
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl ProjectSchema {
    /// Look up a question by its stored field name.
    pub fn question(&self, field: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.field == field)
    }

    fn validate(&self, project: &str) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for question in &self.questions {
            if question.field.trim().is_empty() {
                return Err(SchemaError::EmptyField {
                    project: project.to_string(),
                });
            }
            if !seen.insert(question.field.as_str()) {
                return Err(SchemaError::DuplicateField {
                    project: project.to_string(),
                    field: question.field.clone(),
                });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Read-only map of supported projects to their schemas.
///
/// Built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    projects: HashMap<String, ProjectSchema>,
}

impl SchemaRegistry {
    /// Parse a registry from its JSON text and validate every project.
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let projects: HashMap<String, ProjectSchema> = serde_json::from_str(json)?;
        Self::from_projects(projects)
    }

    /// Read and parse a registry from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let json = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            projects = registry.len(),
            "Loaded project schemas"
        );
        Ok(registry)
    }

    /// Build a registry from already-parsed schemas.
    pub fn from_projects(projects: HashMap<String, ProjectSchema>) -> Result<Self, SchemaError> {
        for (short_name, schema) in &projects {
            schema.validate(short_name)?;
        }
        Ok(Self { projects })
    }

    /// The schema of a supported project, or `None` if it is unsupported.
    pub fn get(&self, short_name: &str) -> Option<&ProjectSchema> {
        self.projects.get(short_name)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Build namespaced lookup tables for the given projects.
    ///
    /// Unsupported short names are skipped silently.
    pub fn question_index<'a, I>(&self, short_names: I) -> QuestionIndex
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = QuestionIndex::default();
        for short_name in short_names {
            if let Some(schema) = self.get(short_name) {
                index.insert_project(short_name, schema);
            }
        }
        index
    }
}

/// `short_name::field -> kind` and `short_name::field -> title` tables.
#[derive(Debug, Clone, Default)]
pub struct QuestionIndex {
    kinds: HashMap<String, QuestionKind>,
    titles: HashMap<String, String>,
}

impl QuestionIndex {
    pub fn insert_project(&mut self, short_name: &str, schema: &ProjectSchema) {
        for question in &schema.questions {
            let key = namespaced_key(short_name, &question.field);
            self.kinds.insert(key.clone(), question.kind);
            self.titles.insert(key, question.title.clone());
        }
    }

    pub fn kind(&self, namespaced_key: &str) -> Option<QuestionKind> {
        self.kinds.get(namespaced_key).copied()
    }

    pub fn title(&self, namespaced_key: &str) -> Option<&str> {
        self.titles.get(namespaced_key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
