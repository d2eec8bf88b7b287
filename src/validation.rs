//! Field-level validation of submitted notes.
//!
//! Validation is independent from storage: it turns a [`NoteForm`] into a
//! [`ValidNote`] that the repository can persist, or into [`FieldErrors`]
//! that the handlers show next to the offending inputs.

use serde::Serialize;

use std::{collections::BTreeMap, fmt};

use crate::{dto::NoteForm, models::TITLE_MAX_LENGTH};

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const NULL_CHARACTERS_MESSAGE: &str = "Null characters are not allowed.";

/// A note that passed validation and is ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNote {
    pub title: String,
    pub content: String,
}

/// Ordered error messages keyed by field name.
///
/// Every present field has at least one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
            .into_iter()
            .map(|(field, messages)| (field.to_string(), messages))
            .collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Checks submitted fields, trimming surrounding whitespace from both.
pub fn validate(form: &NoteForm) -> Result<ValidNote, FieldErrors> {
    let mut errors = FieldErrors::default();
    let title = form.title.trim();
    let content = form.content.trim();

    if title.is_empty() {
        errors.add("title", REQUIRED_MESSAGE);
    } else {
        let length = title.chars().count();
        if length > TITLE_MAX_LENGTH {
            errors.add(
                "title",
                format!(
                    "Ensure this value has at most {TITLE_MAX_LENGTH} characters (it has {length})."
                ),
            );
        }
        if title.contains('\0') {
            errors.add("title", NULL_CHARACTERS_MESSAGE);
        }
    }

    if content.contains('\0') {
        errors.add("content", NULL_CHARACTERS_MESSAGE);
    }

    if errors.is_empty() {
        Ok(ValidNote {
            title: title.to_string(),
            content: content.to_string(),
        })
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_title_and_content() {
        let valid = validate(&NoteForm::new("Test Title", "Test content here")).unwrap();

        assert_eq!(valid.title, "Test Title");
        assert_eq!(valid.content, "Test content here");
    }

    #[test]
    fn empty_title_is_required() {
        let errors = validate(&NoteForm::new("", "Some content")).unwrap_err();

        assert_eq!(errors.get("title"), Some(&[REQUIRED_MESSAGE.to_string()][..]));
        assert!(errors.get("title").unwrap()[0].to_lowercase().contains("required"));
        assert!(!errors.contains("content"));
    }

    #[test]
    fn whitespace_only_title_is_required() {
        let errors = validate(&NoteForm::new("   \t\n", "Some content")).unwrap_err();

        assert!(errors.contains("title"));
    }

    #[test]
    fn empty_content_is_accepted() {
        let valid = validate(&NoteForm::new("Some title", "")).unwrap();

        assert_eq!(valid.content, "");
    }

    #[test]
    fn title_length_is_capped_in_characters() {
        let at_limit = "é".repeat(TITLE_MAX_LENGTH);
        assert!(validate(&NoteForm::new(at_limit, "")).is_ok());

        let errors = validate(&NoteForm::new("a".repeat(TITLE_MAX_LENGTH + 1), "")).unwrap_err();
        assert_eq!(
            errors.get("title").unwrap(),
            ["Ensure this value has at most 255 characters (it has 256).".to_string()]
        );
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let valid = validate(&NoteForm::new("  padded  ", "\n  body  \n")).unwrap();

        assert_eq!(valid.title, "padded");
        assert_eq!(valid.content, "body");
    }

    #[test]
    fn title_length_is_checked_after_trimming() {
        let title = format!("{}   ", "a".repeat(TITLE_MAX_LENGTH));

        let valid = validate(&NoteForm::new(title, "")).unwrap();

        assert_eq!(valid.title.chars().count(), TITLE_MAX_LENGTH);
    }

    #[test]
    fn markup_is_kept_as_text() {
        let valid = validate(&NoteForm::new("Title", "<script>alert(\"test\")</script>")).unwrap();

        assert_eq!(valid.content, "<script>alert(\"test\")</script>");
    }

    #[test]
    fn null_characters_are_rejected_per_field() {
        let errors = validate(&NoteForm::new("a\0b", "c\0d")).unwrap_err();

        assert_eq!(
            errors.get("title").unwrap(),
            [NULL_CHARACTERS_MESSAGE.to_string()]
        );
        assert_eq!(
            errors.get("content").unwrap(),
            [NULL_CHARACTERS_MESSAGE.to_string()]
        );

        let errors = validate(&NoteForm::new("Title", "c\0d")).unwrap_err();
        assert!(!errors.contains("title"));
    }

    #[test]
    fn errors_serialize_as_field_map() {
        let errors = validate(&NoteForm::default()).unwrap_err();

        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({ "title": [REQUIRED_MESSAGE] })
        );
        assert_eq!(errors.to_string(), "title: This field is required.");
    }
}
