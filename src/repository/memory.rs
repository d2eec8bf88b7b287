use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;

use std::collections::BTreeMap;

use super::{NoteRepository, RepositoryError};
use crate::{models::Note, validation::ValidNote};

/// Process-local note storage.
///
/// Used when no database is configured and by the test suites.
#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    last_stamp: Option<DateTime<Utc>>,
    notes: BTreeMap<i64, Note>,
}

impl State {
    /// Wall clock time, nudged forward so that stamps never repeat.
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for MemoryRepository {
    async fn migrate(&self) -> Result<(), RepositoryError> {
        tracing::debug!("in-memory storage needs no migrations");
        Ok(())
    }

    async fn insert(&self, note: ValidNote) -> Result<Note, RepositoryError> {
        let mut state = self.state.write().await;
        let now = state.stamp();
        state.last_id += 1;

        let note = Note {
            id: state.last_id,
            title: note.title,
            content: note.content,
            created_at: now,
            updated_at: now,
        };
        state.notes.insert(note.id, note.clone());

        Ok(note)
    }

    async fn update(&self, id: i64, note: ValidNote) -> Result<Option<Note>, RepositoryError> {
        let mut state = self.state.write().await;
        if !state.notes.contains_key(&id) {
            return Ok(None);
        }

        let now = state.stamp();
        Ok(state.notes.get_mut(&id).map(|stored| {
            stored.title = note.title;
            stored.content = note.content;
            stored.updated_at = now;
            stored.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.state.write().await.notes.remove(&id).is_some())
    }

    async fn get(&self, id: i64) -> Result<Option<Note>, RepositoryError> {
        Ok(self.state.read().await.notes.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Note>, RepositoryError> {
        let mut notes: Vec<Note> = self.state.read().await.notes.values().cloned().collect();
        notes.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(notes)
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.state.read().await.notes.len())
    }
}
