use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use std::collections::BTreeMap;

use crate::models::Note;

/// Submitted note fields, shared by the HTML form and the JSON API.
///
/// Missing fields deserialize as empty strings so that validation, not the
/// extractor, reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct NoteForm {
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
}

impl NoteForm {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Pre-populates the form with the current values of `note`.
    pub fn from_note(note: &Note) -> Self {
        Self::new(note.title.clone(), note.content.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    /// Note ID
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrorResponse {
    /// Messages keyed by field name
    pub errors: BTreeMap<String, Vec<String>>,
}
