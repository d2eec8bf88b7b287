use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_postgres::{Client, NoTls, Row};

use super::{NoteRepository, RepositoryError, embedded::migrations};
use crate::{models::Note, validation::ValidNote};

pub struct PgRepository {
    client: Mutex<Client>,
}

impl PgRepository {
    pub async fn new(database_dsn: &str) -> Result<Self, RepositoryError> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self {
            client: Mutex::new(client),
        })
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl NoteRepository for PgRepository {
    async fn migrate(&self) -> Result<(), RepositoryError> {
        let mut client = self.client.lock().await;
        let migrations_report = migrations::runner().run_async(&mut *client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }

    async fn insert(&self, note: ValidNote) -> Result<Note, RepositoryError> {
        // now() is fixed for the statement, so both timestamps are equal.
        let row = self
            .client
            .lock()
            .await
            .query_one(
                "INSERT INTO notes (title, content, created_at, updated_at) \
                 VALUES ($1, $2, now(), now()) \
                 RETURNING id, title, content, created_at, updated_at",
                &[&note.title, &note.content],
            )
            .await?;

        Ok(note_from_row(&row))
    }

    async fn update(&self, id: i64, note: ValidNote) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .lock()
            .await
            .query_opt(
                "UPDATE notes SET title = $1, content = $2, \
                 updated_at = GREATEST(clock_timestamp(), updated_at + interval '1 microsecond') \
                 WHERE id = $3 \
                 RETURNING id, title, content, created_at, updated_at",
                &[&note.title, &note.content, &id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let rows = self
            .client
            .lock()
            .await
            .execute("DELETE FROM notes WHERE id = $1", &[&id])
            .await?;

        Ok(rows == 1)
    }

    async fn get(&self, id: i64) -> Result<Option<Note>, RepositoryError> {
        let row = self
            .client
            .lock()
            .await
            .query_opt(
                "SELECT id, title, content, created_at, updated_at FROM notes WHERE id = $1",
                &[&id],
            )
            .await?;

        Ok(row.as_ref().map(note_from_row))
    }

    async fn list(&self) -> Result<Vec<Note>, RepositoryError> {
        let rows = self
            .client
            .lock()
            .await
            .query(
                "SELECT id, title, content, created_at, updated_at FROM notes \
                 ORDER BY updated_at DESC, id DESC",
                &[],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let row = self
            .client
            .lock()
            .await
            .query_one("SELECT COUNT(*) AS total FROM notes", &[])
            .await?;
        let total: i64 = row.get("total");

        Ok(usize::try_from(total).unwrap_or_default())
    }
}
