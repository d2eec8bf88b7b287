//! Server-side page rendering.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Names ending in `.html` are auto-escaped by minijinja.

use chrono::{DateTime, Utc};
use minijinja::{Environment, Error};
use serde::Serialize;

pub const NOTES_LIST: &str = "notes/notes_list.html";
pub const NOTE_DETAIL: &str = "notes/note_detail.html";
pub const NOTE_FORM: &str = "notes/note_form.html";
pub const NOTE_CONFIRM_DELETE: &str = "notes/note_confirm_delete.html";

const SOURCES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    (NOTES_LIST, include_str!("../templates/notes/notes_list.html")),
    (NOTE_DETAIL, include_str!("../templates/notes/note_detail.html")),
    (NOTE_FORM, include_str!("../templates/notes/note_form.html")),
    (
        NOTE_CONFIRM_DELETE,
        include_str!("../templates/notes/note_confirm_delete.html"),
    ),
];

pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    /// Compiles every page template.
    ///
    /// # Errors
    ///
    /// Returns an error if a template has invalid syntax.
    pub fn new() -> Result<Self, Error> {
        let mut env = Environment::new();
        for &(name, source) in SOURCES {
            env.add_template(name, source)?;
        }
        env.add_filter("datetime", datetime);
        env.add_filter("excerpt", excerpt);

        Ok(Self { env })
    }

    /// Renders a registered template with the given context.
    ///
    /// # Errors
    ///
    /// Returns an error if the template name is not found or rendering fails.
    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String, Error> {
        self.env.get_template(name)?.render(context)
    }
}

/// Formats an RFC 3339 timestamp for display; other values pass through.
fn datetime(value: String) -> String {
    DateTime::parse_from_rfc3339(&value).map_or(value, |stamp| {
        stamp
            .with_timezone(&Utc)
            .format("%b %-d, %Y %H:%M")
            .to_string()
    })
}

/// Shortens text to `length` characters, marking the cut with an ellipsis.
fn excerpt(value: String, length: usize) -> String {
    if value.chars().count() <= length {
        return value;
    }
    let mut short: String = value.chars().take(length).collect();
    short.push('…');
    short
}
