use axum::{
    Router,
    routing::{get, put},
};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use crate::{
    handlers::{html, rest},
    service::NoteService,
    templates::Templates,
};

/// State shared by every handler.
pub struct AppState {
    pub service: NoteService,
    pub templates: Templates,
}

impl AppState {
    pub const fn new(service: NoteService, templates: Templates) -> Self {
        Self { service, templates }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let pages = Router::new()
        .route("/", get(html::note_list))
        .route(
            "/note/create/",
            get(html::note_create_form).post(html::note_create),
        )
        .route("/note/{id}/", get(html::note_detail))
        .route(
            "/note/{id}/update/",
            get(html::note_update_form).post(html::note_update),
        )
        .route(
            "/note/{id}/delete/",
            get(html::note_delete_confirm).post(html::note_delete),
        );

    let api = Router::new()
        .route("/notes", get(rest::get_all_notes).post(rest::create_note))
        .route(
            "/notes/{id}",
            put(rest::update_note)
                .get(rest::get_one_note)
                .delete(rest::delete_note),
        )
        .route("/openapi.json", get(rest::openapi));

    Router::new()
        .merge(pages)
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
