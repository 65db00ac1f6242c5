//! The store owns the working set of notes. Handlers only ever mutate notes
//! through these operations.

mod memory;
mod remote;

use super::{
    errors::StoreResult,
    models::{Note, NoteDraft, NoteId},
};
use async_trait::async_trait;

pub use memory::MemoryStore;
pub use remote::RemoteStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Current working set, in no particular order.
    async fn list(&self) -> StoreResult<Vec<Note>>;

    async fn get(&self, id: &NoteId) -> StoreResult<Note>;

    /// Assign an id, stamp the time, and add the note. Rejects blank text.
    async fn create(&self, draft: NoteDraft) -> StoreResult<Note>;

    /// Replace the editable fields of an existing note and re-stamp its time.
    async fn update(&self, id: &NoteId, draft: NoteDraft) -> StoreResult<Note>;

    async fn delete(&self, id: &NoteId) -> StoreResult<()>;

    /// Reload the working set from wherever it is persisted.
    async fn refresh(&self) -> StoreResult<()> {
        Ok(())
    }
}
