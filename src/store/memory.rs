use super::Store;
use crate::{
    errors::{StoreError, StoreResult},
    models::{now_stamp, Note, NoteDraft, NoteId},
};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Keeps notes in process memory only; everything is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    notes: RwLock<Vec<Note>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Note>> {
        Ok(self.notes.read().await.clone())
    }

    async fn get(&self, id: &NoteId) -> StoreResult<Note> {
        self.notes
            .read()
            .await
            .iter()
            .find(|n| &n.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn create(&self, draft: NoteDraft) -> StoreResult<Note> {
        if draft.is_blank() {
            return Err(StoreError::Validation);
        }
        let note = Note {
            id: NoteId::new(Uuid::new_v4().to_string()),
            text: draft.text,
            importance: draft.importance,
            status: draft.status,
            time: now_stamp(),
        };
        self.notes.write().await.push(note.clone());

        Ok(note)
    }

    async fn update(&self, id: &NoteId, draft: NoteDraft) -> StoreResult<Note> {
        if draft.is_blank() {
            return Err(StoreError::Validation);
        }
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        note.text = draft.text;
        note.importance = draft.importance;
        note.status = draft.status;
        note.time = now_stamp();

        Ok(note.clone())
    }

    async fn delete(&self, id: &NoteId) -> StoreResult<()> {
        let mut notes = self.notes.write().await;
        let idx = notes
            .iter()
            .position(|n| &n.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        notes.remove(idx);

        Ok(())
    }
}
