use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    app::AppState,
    dto::{NoteForm, NoteResponse, ValidationErrorResponse},
    service::ServiceError,
};

#[derive(OpenApi)]
#[openapi(
    paths(create_note, update_note, delete_note, get_one_note, get_all_notes),
    components(schemas(NoteResponse, NoteForm, ValidationErrorResponse)),
    tags(
        (name = "notes", description = "Sticky notes API")
    )
)]
pub struct ApiDoc;

fn error_response(action: &str, e: ServiceError) -> Response {
    match e {
        ServiceError::NotFound => (StatusCode::NOT_FOUND, "Note not found").into_response(),
        ServiceError::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorResponse {
                errors: errors.into_map(),
            }),
        )
            .into_response(),
        ServiceError::Repository(e) => {
            tracing::error!("failed to {}: {}", action, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to {action}"),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = NoteForm,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 422, description = "Invalid note fields", body = ValidationErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NoteForm>,
) -> Response {
    match state.service.create_note(&payload).await {
        Ok(note) => (StatusCode::CREATED, Json(NoteResponse::from(note))).into_response(),
        Err(e) => error_response("create note", e),
    }
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = NoteForm,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 404, description = "Note not found"),
        (status = 422, description = "Invalid note fields", body = ValidationErrorResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<NoteForm>,
) -> Response {
    match state.service.update_note(id, &payload).await {
        Ok(note) => (StatusCode::OK, Json(NoteResponse::from(note))).into_response(),
        Err(e) => error_response("update note", e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 204, description = "Note deleted successfully"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match state.service.delete_note(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete note", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Response {
    match state.service.get_note(id).await {
        Ok(note) => (StatusCode::OK, Json(NoteResponse::from(note))).into_response(),
        Err(e) => error_response("get note", e),
    }
}

#[utoipa::path(
    get,
    path = "/api/notes",
    responses(
        (status = 200, description = "All notes, most recently updated first", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(state): State<Arc<AppState>>) -> Response {
    match state.service.list_notes().await {
        Ok(notes) => {
            let notes: Vec<NoteResponse> = notes.into_iter().map(NoteResponse::from).collect();
            (StatusCode::OK, Json(notes)).into_response()
        }
        Err(e) => error_response("list notes", e),
    }
}

pub async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
