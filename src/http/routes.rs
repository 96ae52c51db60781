use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use super::error::{ApiError, OWNER_NOT_INT};
use super::AppState;
use crate::entity::{Note, NoteId, NoteInput, UserId};
use crate::error::NoteError;

type ApiResult<T> = std::result::Result<T, ApiError>;
type NotePath = Result<Path<NoteId>, PathRejection>;

fn ok() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /note
pub async fn create_note(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(payload) = payload?;
    let acting = state.identity.resolve(&headers, &payload)?;
    let note = Note::parse(&payload, acting.as_ref())?;

    let store = state.store.lock().await;
    let created = note.create(&*store)?;
    info!(note_id = ?created.id, owner = %created.owner, "note stored");

    Ok((StatusCode::CREATED, Json(created.to_json())))
}

/// GET /note/{id}
pub async fn get_note(State(state): State<AppState>, id: NotePath) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let store = state.store.lock().await;
    let note = Note::find_by_id(&*store, id)?.ok_or(NoteError::NotFound(id))?;
    Ok(Json(json!({ "note": note })))
}

/// DELETE /note/{id}
pub async fn delete_note(State(state): State<AppState>, id: NotePath) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let store = state.store.lock().await;
    let note = Note::find_by_id(&*store, id)?.ok_or(NoteError::NotFound(id))?;

    if !note.delete(&*store)? {
        return Err(NoteError::NotFound(id).into());
    }
    info!(note_id = id, "note deleted");
    Ok(ok())
}

/// PATCH /note/{id}/owner
pub async fn change_owner(
    State(state): State<AppState>,
    id: NotePath,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let new_owner = UserId::from_json("owner", payload.get("owner"))
        .map_err(|_| ApiError::bad_request(OWNER_NOT_INT))?;

    let store = state.store.lock().await;
    let note = Note::find_by_id(&*store, id)?.ok_or(NoteError::NotFound(id))?;
    let updated = note.change_owner(&*store, new_owner)?;
    info!(note_id = id, owner = %updated.owner, "note owner changed");

    Ok(Json(json!({ "status": "ok", "note": updated })))
}

/// PATCH /note/{id}/rename
pub async fn rename_note(
    State(state): State<AppState>,
    id: NotePath,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let name = match payload.get("name") {
        None => return Err(NoteError::MissingField("name").into()),
        Some(Value::Null) => None,
        Some(Value::String(name)) => Some(name.clone()),
        Some(_) => return Err(NoteError::type_mismatch("name", "string").into()),
    };

    let store = state.store.lock().await;
    let mut note = Note::find_by_id(&*store, id)?.ok_or(NoteError::NotFound(id))?;
    note.name = name;
    note.rename(&*store)?;

    Ok(ok())
}

/// PATCH /note/{id}/update
///
/// Fields left out of the body, or sent as null, keep their stored value.
pub async fn update_note(
    State(state): State<AppState>,
    id: NotePath,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = id?;
    let Json(payload) = payload?;

    let store = state.store.lock().await;
    let note = Note::find_by_id(&*store, id)?.ok_or(NoteError::NotFound(id))?;

    // null counts as left out
    let given = |key: &str| payload.get(key).filter(|v| !v.is_null()).cloned();
    let edited = Note::construct(NoteInput {
        id: Some(Value::from(id)),
        owner: Some(Value::from(note.owner.0)),
        content: Some(given("content").unwrap_or_else(|| Value::from(note.content.clone()))),
        private: Some(given("private").unwrap_or(Value::Bool(note.private))),
        name: note.name.clone().map(Value::from),
    })?;
    edited.update(&*store)?;

    Ok(ok())
}

/// GET /notes/owner/{owner_id}
pub async fn notes_by_owner(
    State(state): State<AppState>,
    owner_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(owner_id) = owner_id?;
    let store = state.store.lock().await;
    let notes = Note::find_by_owner(&*store, UserId(owner_id))?;
    Ok(Json(json!({ "count": notes.len(), "notes": notes })))
}
