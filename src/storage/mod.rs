mod sqlite_store;

pub use sqlite_store::SqliteStore;

use chrono::{DateTime, Utc};

use crate::entity::{Note, NoteId, UserId};
use crate::error::Result;

/// A note row exactly as the store holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRecord {
    pub id: NoteId,
    pub owner: UserId,
    pub name: Option<String>,
    pub content: String,
    pub private: bool,
    pub create_time: DateTime<Utc>,
}

/// Durable note storage.
///
/// Every call is atomic on its own; nothing spans several calls. The
/// mutating operations return the record as it is after the write and fail
/// with `NoteError::NotFound` when the id does not exist.
pub trait NoteGateway {
    /// Insert a note and return the id the store assigned to it.
    fn create_note(&self, note: &Note) -> Result<NoteId>;

    fn get_note(&self, id: NoteId) -> Result<Option<NoteRecord>>;

    /// All notes of `owner`, oldest first.
    fn get_note_by_owner(&self, owner: UserId) -> Result<Vec<NoteRecord>>;

    /// Returns true if a note was removed.
    fn delete_note(&self, id: NoteId) -> Result<bool>;

    fn rename_note(&self, id: NoteId, name: Option<&str>) -> Result<NoteRecord>;

    fn update_note(&self, id: NoteId, content: &str, private: bool) -> Result<NoteRecord>;

    fn change_note_owner(&self, id: NoteId, owner: UserId) -> Result<NoteRecord>;
}
