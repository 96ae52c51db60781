//! Resolution of the user a request acts on behalf of.
//!
//! Authentication itself happens elsewhere. By the time a request reaches the
//! note handlers its user id is either carried in a trusted header, or (when
//! the server is configured to allow it) asserted in the payload's `owner`
//! field.

use axum::http::HeaderMap;
use serde_json::Value;

use crate::entity::UserId;
use crate::error::{NoteError, Result};

/// The requester, as resolved by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser {
    pub id: UserId,
}

/// How to find the acting user of a request.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    header: String,
    trust_payload_owner: bool,
}

impl IdentityResolver {
    pub fn new(header: impl Into<String>, trust_payload_owner: bool) -> Self {
        Self {
            header: header.into(),
            trust_payload_owner,
        }
    }

    /// Resolve the acting user.
    ///
    /// `Ok(None)` means nobody could be identified; building a note without
    /// an acting user fails with a missing `owner`.
    pub fn resolve(&self, headers: &HeaderMap, payload: &Value) -> Result<Option<ActingUser>> {
        if let Some(raw) = headers.get(self.header.as_str()) {
            let id = raw
                .to_str()
                .ok()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .ok_or_else(|| NoteError::type_mismatch("owner", "int"))?;
            return Ok(Some(ActingUser { id: UserId(id) }));
        }

        if !self.trust_payload_owner {
            return Ok(None);
        }

        match payload.get("owner") {
            None | Some(Value::Null) => Ok(None),
            Some(value) => {
                let id = UserId::from_json("owner", Some(value))?;
                Ok(Some(ActingUser { id }))
            }
        }
    }
}
