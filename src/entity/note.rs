// src/entity/note.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{is_blank, NoteId, UserId};
use crate::error::{NoteError, Result};
use crate::identity::ActingUser;
use crate::storage::{NoteGateway, NoteRecord};

/// Visibility of a note when the caller does not say otherwise (public).
pub const DEFAULT_PRIVATE: bool = false;

/// A note owned by a user.
///
/// `id` and `create_time` stay `None` until the note has been read back from
/// the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Option<NoteId>,
    pub owner: UserId,
    pub name: Option<String>,
    pub content: String,
    pub private: bool,
    pub create_time: Option<DateTime<Utc>>,
}

/// Untyped field values as they arrive from a request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteInput {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub owner: Option<Value>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub private: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
}

impl Note {
    /// Build a note from typed values.
    pub fn new(owner: UserId, content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        if owner.is_empty() {
            return Err(NoteError::MissingField("owner"));
        }
        if content.is_empty() {
            return Err(NoteError::MissingField("content"));
        }
        Ok(Self {
            id: None,
            owner,
            name: None,
            content,
            private: DEFAULT_PRIVATE,
            create_time: None,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn with_id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    /// Validate untyped input and build an in-memory note.
    ///
    /// Nothing is written anywhere; a failure here leaves no state behind.
    pub fn construct(input: NoteInput) -> Result<Self> {
        let owner = UserId::from_json("owner", input.owner.as_ref())?;
        let content = match input.content {
            Some(ref v) if is_blank(v) => return Err(NoteError::MissingField("content")),
            None => return Err(NoteError::MissingField("content")),
            Some(Value::String(s)) => s,
            Some(_) => return Err(NoteError::type_mismatch("content", "string")),
        };
        let private = match input.private {
            None | Some(Value::Null) => DEFAULT_PRIVATE,
            Some(Value::Bool(b)) => b,
            Some(_) => return Err(NoteError::type_mismatch("private", "boolean")),
        };
        let name = match input.name {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(_) => return Err(NoteError::type_mismatch("name", "string")),
        };
        let id = match input.id {
            None | Some(Value::Null) => None,
            Some(v) => Some(v.as_i64().ok_or_else(|| NoteError::type_mismatch("id", "int"))?),
        };

        Ok(Self {
            id,
            owner,
            name,
            content,
            private,
            create_time: None,
        })
    }

    /// Build a note from a request payload on behalf of `acting`.
    ///
    /// The owner always comes from the acting user; an `owner` key in the
    /// payload is ignored.
    pub fn parse(payload: &Value, acting: Option<&ActingUser>) -> Result<Self> {
        let field = |key: &str| payload.get(key).cloned();
        Self::construct(NoteInput {
            id: field("id"),
            owner: acting.map(|user| Value::from(user.id.0)),
            content: field("content"),
            private: field("private"),
            name: field("name"),
        })
    }

    /// Serialized form: `{id, owner, name, content, private, create_time}`.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn require_id(&self) -> Result<NoteId> {
        self.id.ok_or(NoteError::MissingField("id"))
    }

    /// Persist this note and return it as stored, with `id` and
    /// `create_time` filled in by the store.
    pub fn create<G: NoteGateway + ?Sized>(&self, gateway: &G) -> Result<Note> {
        let id = gateway.create_note(self)?;
        debug!(note_id = id, owner = %self.owner, "note created");
        Note::find_by_id(gateway, id)?.ok_or(NoteError::NotFound(id))
    }

    /// Remove this note. Returns false when there was nothing to remove.
    pub fn delete<G: NoteGateway + ?Sized>(&self, gateway: &G) -> Result<bool> {
        match self.id {
            Some(id) => {
                let removed = gateway.delete_note(id)?;
                debug!(note_id = id, removed, "note delete");
                Ok(removed)
            }
            None => Ok(false),
        }
    }

    /// Store the current `name`, overwriting whatever is stored.
    pub fn rename<G: NoteGateway + ?Sized>(&self, gateway: &G) -> Result<Note> {
        let id = self.require_id()?;
        let record = gateway.rename_note(id, self.name.as_deref())?;
        debug!(note_id = id, "note renamed");
        Ok(Note::from(record))
    }

    /// Store the current `content` and `private` flag.
    pub fn update<G: NoteGateway + ?Sized>(&self, gateway: &G) -> Result<Note> {
        let id = self.require_id()?;
        let record = gateway.update_note(id, &self.content, self.private)?;
        debug!(note_id = id, private = self.private, "note updated");
        Ok(Note::from(record))
    }

    /// Hand the note over to `new_owner`.
    ///
    /// Rejected with `SameOwner` before the store is touched when nothing
    /// would change.
    pub fn change_owner<G: NoteGateway + ?Sized>(
        &self,
        gateway: &G,
        new_owner: UserId,
    ) -> Result<Note> {
        if self.owner == new_owner {
            return Err(NoteError::SameOwner);
        }
        let id = self.require_id()?;
        let record = gateway.change_note_owner(id, new_owner)?;
        debug!(note_id = id, from = %self.owner, to = %new_owner, "note owner changed");
        Ok(Note::from(record))
    }

    pub fn find_by_id<G: NoteGateway + ?Sized>(gateway: &G, id: NoteId) -> Result<Option<Note>> {
        Ok(Note::materialize(gateway.get_note(id)?))
    }

    pub fn find_by_owner<G: NoteGateway + ?Sized>(gateway: &G, owner: UserId) -> Result<Vec<Note>> {
        Ok(gateway
            .get_note_by_owner(owner)?
            .into_iter()
            .map(Note::from)
            .collect())
    }

    /// Map a stored record onto a note; a missing record stays missing.
    pub fn materialize(record: Option<NoteRecord>) -> Option<Note> {
        record.map(Note::from)
    }
}

impl From<NoteRecord> for Note {
    fn from(rec: NoteRecord) -> Self {
        Self {
            id: Some(rec.id),
            owner: rec.owner,
            name: rec.name,
            content: rec.content,
            private: rec.private,
            create_time: Some(rec.create_time),
        }
    }
}
