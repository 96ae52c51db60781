//! Mapping of note errors onto HTTP responses.
//!
//! Every failure answers with a JSON body of the form `{"message": "..."}`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error};

use crate::error::NoteError;

pub const NOTE_NOT_FOUND: &str = "note not found";
pub const OWNER_NOT_INT: &str = "must supply owner as int";
const INTERNAL: &str = "internal server error";

/// Error returned by the note handlers.
#[derive(Debug)]
pub enum ApiError {
    /// A failure from the entity layer or the store.
    Note(NoteError),
    /// A request the handler rejected itself, with the message to send back.
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Note(e) => match e {
                NoteError::MissingField(_)
                | NoteError::TypeMismatch { .. }
                | NoteError::SameOwner => StatusCode::BAD_REQUEST,
                NoteError::NotFound(_) => StatusCode::NOT_FOUND,
                NoteError::Storage(_) | NoteError::Io(_) | NoteError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Human readable message for the response body.
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Note(NoteError::NotFound(_)) => NOTE_NOT_FOUND.to_string(),
            ApiError::Note(e) if e.is_validation() => e.to_string(),
            ApiError::Note(_) => INTERNAL.to_string(),
        }
    }
}

impl From<NoteError> for ApiError {
    fn from(e: NoteError) -> Self {
        ApiError::Note(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = ?self, "request failed");
        } else {
            debug!(status = status.as_u16(), error = ?self, "request rejected");
        }
        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}
