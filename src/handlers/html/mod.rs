mod flash;

pub use flash::Flash;

use axum::{
    Form,
    extract::{Path, State, rejection::FormRejection},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_macros::debug_handler;
use serde::Serialize;

use std::sync::Arc;

use crate::{
    app::AppState,
    dto::NoteForm,
    models::{Note, TITLE_MAX_LENGTH},
    service::ServiceError,
    templates,
    validation::FieldErrors,
};

#[derive(Serialize)]
struct Page<T> {
    flash: Option<&'static str>,
    #[serde(flatten)]
    page: T,
}

#[derive(Serialize)]
struct ListPage {
    count: usize,
    notes: Vec<Note>,
}

#[derive(Serialize)]
struct NotePage {
    note: Note,
}

#[derive(Serialize)]
struct FormPage<'a> {
    form: &'a NoteForm,
    errors: &'a FieldErrors,
    note: Option<&'a Note>,
    title_max_length: usize,
}

/// Renders a page, consuming any pending flash notification.
fn render_page<T: Serialize>(
    state: &AppState,
    headers: &HeaderMap,
    name: &str,
    page: T,
) -> Response {
    let pending = Flash::from_headers(headers);
    let context = Page {
        flash: pending.map(Flash::message),
        page,
    };

    match state.templates.render(name, &context) {
        Ok(body) => match pending {
            Some(_) => ([(header::SET_COOKIE, flash::CLEAR_COOKIE)], Html(body)).into_response(),
            None => Html(body).into_response(),
        },
        Err(e) => {
            tracing::error!("failed to render template {}: {}", name, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

fn render_form(
    state: &AppState,
    headers: &HeaderMap,
    form: &NoteForm,
    errors: &FieldErrors,
    note: Option<&Note>,
) -> Response {
    render_page(
        state,
        headers,
        templates::NOTE_FORM,
        FormPage {
            form,
            errors,
            note,
            title_max_length: TITLE_MAX_LENGTH,
        },
    )
}

fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    ([(header::SET_COOKIE, flash.cookie())], Redirect::to(to)).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Note not found").into_response()
}

fn failure(action: &str, e: &ServiceError) -> Response {
    match e {
        ServiceError::NotFound => not_found(),
        _ => {
            tracing::error!("failed to {}: {}", action, e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to {action}")).into_response()
        }
    }
}

/// Path ids only match digits; anything else is an unknown note.
fn parse_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// A body that cannot be decoded is treated as an empty submission, so the
/// form comes back with field errors instead of an extractor error.
fn submitted(form: Result<Form<NoteForm>, FormRejection>) -> NoteForm {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!("unreadable note form: {}", rejection);
            NoteForm::default()
        }
    }
}

async fn load_note(state: &AppState, raw_id: &str) -> Result<Note, Response> {
    let id = parse_id(raw_id).ok_or_else(not_found)?;
    state
        .service
        .get_note(id)
        .await
        .map_err(|e| failure("get note", &e))
}

#[debug_handler]
pub async fn note_list(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let notes = match state.service.list_notes().await {
        Ok(notes) => notes,
        Err(e) => return failure("list notes", &e),
    };
    let count = match state.service.count_notes().await {
        Ok(count) => count,
        Err(e) => return failure("count notes", &e),
    };

    render_page(
        &state,
        &headers,
        templates::NOTES_LIST,
        ListPage { count, notes },
    )
}

#[debug_handler]
pub async fn note_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    match load_note(&state, &id).await {
        Ok(note) => render_page(&state, &headers, templates::NOTE_DETAIL, NotePage { note }),
        Err(response) => response,
    }
}

#[debug_handler]
pub async fn note_create_form(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    render_form(
        &state,
        &headers,
        &NoteForm::default(),
        &FieldErrors::default(),
        None,
    )
}

#[debug_handler]
pub async fn note_create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<NoteForm>, FormRejection>,
) -> Response {
    let form = submitted(form);

    match state.service.create_note(&form).await {
        Ok(_) => redirect_with_flash("/", Flash::Created),
        Err(ServiceError::Invalid(errors)) => render_form(&state, &headers, &form, &errors, None),
        Err(e) => failure("create note", &e),
    }
}

#[debug_handler]
pub async fn note_update_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    match load_note(&state, &id).await {
        Ok(note) => render_form(
            &state,
            &headers,
            &NoteForm::from_note(&note),
            &FieldErrors::default(),
            Some(&note),
        ),
        Err(response) => response,
    }
}

#[debug_handler]
pub async fn note_update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    form: Result<Form<NoteForm>, FormRejection>,
) -> Response {
    let note = match load_note(&state, &id).await {
        Ok(note) => note,
        Err(response) => return response,
    };
    let form = submitted(form);

    match state.service.save_note(&note, &form).await {
        Ok(saved) => redirect_with_flash(&format!("/note/{}/", saved.id), Flash::Updated),
        Err(ServiceError::Invalid(errors)) => {
            render_form(&state, &headers, &form, &errors, Some(&note))
        }
        Err(e) => failure("update note", &e),
    }
}

#[debug_handler]
pub async fn note_delete_confirm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    match load_note(&state, &id).await {
        Ok(note) => render_page(
            &state,
            &headers,
            templates::NOTE_CONFIRM_DELETE,
            NotePage { note },
        ),
        Err(response) => response,
    }
}

#[debug_handler]
pub async fn note_delete(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found();
    };

    match state.service.delete_note(id).await {
        Ok(()) => redirect_with_flash("/", Flash::Deleted),
        Err(e) => failure("delete note", &e),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_id;

    #[test]
    fn ids_are_plain_digits() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("+1"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("99999999999999999999"), None);
    }
}
