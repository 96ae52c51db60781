mod note;

pub use note::{Note, NoteInput, DEFAULT_PRIVATE};

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{NoteError, Result};

/// Store-assigned note identifier.
pub type NoteId = i64;

/// Reference to the user owning a note.
///
/// Only a lookup key: nothing at this layer checks that the user exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    /// Zero is the empty identifier.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Read an owner reference out of an untyped JSON field.
    ///
    /// Blank values (absent, null, `0`, `""`, `false`, empty containers) are a
    /// missing field; anything else that is not an integer is a type mismatch.
    pub fn from_json(field: &'static str, value: Option<&Value>) -> Result<Self> {
        let value = match value {
            Some(v) if !is_blank(v) => v,
            _ => return Err(NoteError::MissingField(field)),
        };
        value
            .as_i64()
            .map(UserId)
            .ok_or_else(|| NoteError::type_mismatch(field, "int"))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Falsy JSON values count as absent for mandatory fields.
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
