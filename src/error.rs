use thiserror::Error;

use crate::entity::NoteId;

#[derive(Error, Debug)]
pub enum NoteError {
    #[error("Missing mandatory field '{0}'")]
    MissingField(&'static str),

    #[error("'{field}' must be {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    #[error("new owner is same as old")]
    SameOwner,

    #[error("note not found")]
    NotFound(NoteId),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NoteError {
    pub(crate) fn type_mismatch(field: &'static str, expected: &'static str) -> Self {
        NoteError::TypeMismatch { field, expected }
    }

    /// True for failures caused by the caller's input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            NoteError::MissingField(_) | NoteError::TypeMismatch { .. } | NoteError::SameOwner
        )
    }
}

pub type Result<T> = std::result::Result<T, NoteError>;
