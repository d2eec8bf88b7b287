mod embedded;
mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PgRepository;

use async_trait::async_trait;

use crate::{models::Note, validation::ValidNote};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),
}

/// Durable storage for notes.
///
/// Implementations own the timestamps: `insert` stamps both with the same
/// instant and `update` moves `updated_at` strictly forward.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Brings the storage schema up to date.
    async fn migrate(&self) -> Result<(), RepositoryError>;

    async fn insert(&self, note: ValidNote) -> Result<Note, RepositoryError>;

    /// Returns `None` when no note has the given id.
    async fn update(&self, id: i64, note: ValidNote) -> Result<Option<Note>, RepositoryError>;

    /// Returns `true` when a note was removed.
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;

    async fn get(&self, id: i64) -> Result<Option<Note>, RepositoryError>;

    /// All notes, most recently updated first.
    async fn list(&self) -> Result<Vec<Note>, RepositoryError>;

    async fn count(&self) -> Result<usize, RepositoryError>;
}
