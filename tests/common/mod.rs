#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use tower::ServiceExt;

use std::sync::Arc;

use sticky_notes::{
    app::{self, AppState},
    dto::NoteForm,
    models::Note,
    repository::MemoryRepository,
    service::NoteService,
    templates::Templates,
};

/// A router over a fresh in-memory store, plus a handle on the same service
/// for arranging and inspecting state.
pub struct TestApp {
    pub router: Router,
    pub service: NoteService,
}

impl TestApp {
    pub fn new() -> Self {
        let service = NoteService::new(Arc::new(MemoryRepository::new()));
        let state = Arc::new(AppState::new(service.clone(), Templates::new().unwrap()));

        Self {
            router: app::router(state),
            service,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn note(&self, title: &str, content: &str) -> Note {
        self.service
            .create_note(&NoteForm::new(title, content))
            .await
            .unwrap()
    }

    pub async fn count(&self) -> usize {
        self.service.count_notes().await.unwrap()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// POSTs an already url-encoded form body.
pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn send_json(method: &str, uri: &str, value: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(value).unwrap()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

pub fn set_cookie(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(|value| value.to_str().unwrap())
}
