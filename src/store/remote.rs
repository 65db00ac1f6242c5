use super::Store;
use crate::{
    errors::{StoreError, StoreResult},
    models::{now_stamp, Note, NoteDraft, NoteId, NotePayload},
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tokio::sync::RwLock;

/// Delegates persistence to a JSON item service (`GET/POST {base}`,
/// `PUT/DELETE {base}/{id}`) and keeps the last known working set.
///
/// The cached set is only touched after the service confirmed a change, so a
/// failed call never leaves a half-applied mutation behind. Each confirmed
/// change re-reads the whole set.
pub struct RemoteStore {
    client: Client,
    base_url: String,
    notes: RwLock<Option<Vec<Note>>>,
}

impl RemoteStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            notes: RwLock::new(None),
        }
    }

    fn item_url(&self, id: &NoteId) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(id.as_str()))
    }

    async fn fetch_all(&self) -> StoreResult<Vec<Note>> {
        let response = self.client.get(&self.base_url).send().await?;
        let notes = check_status(response, None)?.json().await?;

        Ok(notes)
    }

    async fn ensure_loaded(&self) -> StoreResult<Vec<Note>> {
        if let Some(notes) = self.notes.read().await.as_ref() {
            return Ok(notes.clone());
        }
        let notes = self.fetch_all().await?;
        *self.notes.write().await = Some(notes.clone());

        Ok(notes)
    }

    /// Re-read the whole working set after a confirmed change, so edits made
    /// by other clients show up too. If that read fails the change itself
    /// still stands, and `patch` applies it to the cached set instead.
    async fn reload_after(&self, patch: impl FnOnce(&mut Vec<Note>) + Send) {
        match self.fetch_all().await {
            Ok(notes) => *self.notes.write().await = Some(notes),
            Err(e) => {
                log::warn!("could not reload notes after a change: {e}");
                if let Some(notes) = self.notes.write().await.as_mut() {
                    patch(notes);
                }
            }
        }
    }
}

fn check_status(
    response: Response,
    id: Option<&NoteId>,
) -> StoreResult<Response> {
    let status = response.status();
    match id {
        Some(id) if status == StatusCode::NOT_FOUND => {
            Err(StoreError::NotFound(id.clone()))
        }
        _ if !status.is_success() => {
            Err(StoreError::Transport(format!("HTTP error! status: {status}")))
        }
        _ => Ok(response),
    }
}

#[async_trait]
impl Store for RemoteStore {
    async fn list(&self) -> StoreResult<Vec<Note>> {
        self.ensure_loaded().await
    }

    async fn get(&self, id: &NoteId) -> StoreResult<Note> {
        self.ensure_loaded()
            .await?
            .into_iter()
            .find(|n| &n.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn create(&self, draft: NoteDraft) -> StoreResult<Note> {
        if draft.is_blank() {
            return Err(StoreError::Validation);
        }
        let time = now_stamp();
        let response = self
            .client
            .post(&self.base_url)
            .json(&NotePayload::new(&draft, &time))
            .send()
            .await?;
        let note: Note = check_status(response, None)?.json().await?;
        log::info!("created note {}", note.id);

        let created = note.clone();
        self.reload_after(|notes| notes.push(created)).await;

        Ok(note)
    }

    async fn update(&self, id: &NoteId, draft: NoteDraft) -> StoreResult<Note> {
        if draft.is_blank() {
            return Err(StoreError::Validation);
        }
        let time = now_stamp();
        let response = self
            .client
            .put(self.item_url(id))
            .json(&NotePayload::new(&draft, &time))
            .send()
            .await?;
        let note: Note = check_status(response, Some(id))?.json().await?;
        log::info!("updated note {}", note.id);

        let updated = note.clone();
        self.reload_after(|notes| {
            match notes.iter_mut().find(|n| n.id == updated.id) {
                Some(existing) => *existing = updated,
                None => notes.push(updated),
            }
        })
        .await;

        Ok(note)
    }

    async fn delete(&self, id: &NoteId) -> StoreResult<()> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        check_status(response, Some(id))?;
        log::info!("deleted note {id}");

        self.reload_after(|notes| notes.retain(|n| &n.id != id)).await;

        Ok(())
    }

    async fn refresh(&self) -> StoreResult<()> {
        let notes = self.fetch_all().await?;
        log::debug!("loaded {} notes from {}", notes.len(), self.base_url);
        *self.notes.write().await = Some(notes);

        Ok(())
    }
}
