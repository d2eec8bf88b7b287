//! Sticky notes: list, view, create, update and delete short text notes
//! through server-rendered pages, with a JSON API over the same service.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod templates;
pub mod validation;
