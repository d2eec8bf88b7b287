use std::sync::Arc;

use crate::{
    dto::NoteForm,
    models::Note,
    repository::{NoteRepository, RepositoryError},
    validation::{self, FieldErrors},
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Note not found")]
    NotFound,

    #[error("Invalid note: {0}")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_notes(&self) -> Result<Vec<Note>, ServiceError> {
        Ok(self.repo.list().await?)
    }

    pub async fn count_notes(&self) -> Result<usize, ServiceError> {
        Ok(self.repo.count().await?)
    }

    pub async fn get_note(&self, id: i64) -> Result<Note, ServiceError> {
        self.repo.get(id).await?.ok_or(ServiceError::NotFound)
    }

    pub async fn create_note(&self, form: &NoteForm) -> Result<Note, ServiceError> {
        let valid = validation::validate(form).map_err(ServiceError::Invalid)?;
        let note = self.repo.insert(valid).await?;

        tracing::info!("Created note {}", note.id);
        Ok(note)
    }

    /// Validates `form` against the stored note `id` and saves it in place.
    ///
    /// A missing note wins over invalid input.
    pub async fn update_note(&self, id: i64, form: &NoteForm) -> Result<Note, ServiceError> {
        let existing = self.get_note(id).await?;
        self.save_note(&existing, form).await
    }

    /// Validates `form` and writes it over `existing`, keeping its id.
    pub async fn save_note(&self, existing: &Note, form: &NoteForm) -> Result<Note, ServiceError> {
        let valid = validation::validate(form).map_err(ServiceError::Invalid)?;
        let note = self
            .repo
            .update(existing.id, valid)
            .await?
            .ok_or(ServiceError::NotFound)?;

        tracing::info!("Updated note {}", note.id);
        Ok(note)
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ServiceError> {
        if self.repo.delete(id).await? {
            tracing::info!("Deleted note {}", id);
            Ok(())
        } else {
            Err(ServiceError::NotFound)
        }
    }
}
