use std::sync::Arc;

use sticky_notes::{
    app::{self, AppState},
    config::{self, Storage},
    repository::{MemoryRepository, NoteRepository, PgRepository},
    service::NoteService,
    templates::Templates,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });

    // Repository creation and migration
    let repo: Arc<dyn NoteRepository> = match &cfg.storage {
        Storage::Postgres { dsn } => {
            let repo = PgRepository::new(dsn).await.unwrap_or_else(|e| {
                tracing::error!("Failed to establish database connection: {e}");
                panic!("failed to establish database connection: {e}");
            });
            Arc::new(repo)
        }
        Storage::Memory => {
            tracing::warn!("No database configured, notes are kept in memory");
            Arc::new(MemoryRepository::new())
        }
    };

    repo.migrate().await.unwrap_or_else(|e| {
        tracing::error!("Failed to migrate database: {e}");
        panic!("failed to migrate database: {e}");
    });

    let templates = Templates::new().unwrap_or_else(|e| {
        tracing::error!("Failed to compile templates: {e}");
        panic!("failed to compile templates: {e}");
    });

    // Service and router
    let state = Arc::new(AppState::new(NoteService::new(repo), templates));
    let router = app::router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port))
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind port {}: {e}", cfg.port);
            panic!("failed to bind port {}: {e}", cfg.port);
        });

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Sticky notes server listening on {}", addr);
    }

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!("HTTP server error: {e}");
        panic!("HTTP server error: {e}");
    }
}
