use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use nf_core::{NewNote, Note};

use super::err_json;
use crate::sanitize::sanitize_html;
use crate::state::AppState;
use crate::validation::validate_note_fields;

#[derive(Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub note_name: Option<String>,
    #[serde(default)]
    pub folder_id: Option<i64>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub date_modified: Option<DateTime<Utc>>,
}

/// The store keeps note text verbatim; the free-text fields pass through the
/// sanitizer on every read before serialization.
fn note_to_response(note: Note) -> Note {
    Note {
        note_name: sanitize_html(&note.note_name),
        content: sanitize_html(&note.content),
        ..note
    }
}

/// GET /notes
pub async fn list_notes(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.notes.list().await {
        Ok(notes) => Json(
            notes
                .into_iter()
                .map(note_to_response)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            err_json(format!("failed to list notes: {err}")),
        )
            .into_response(),
    }
}

/// GET /notes/:note_id
pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(note_id): Path<i64>,
) -> impl IntoResponse {
    match state.notes.get(note_id).await {
        Ok(Some(note)) => Json(note_to_response(note)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, err_json("Note doesn't exist")).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            err_json(format!("failed to load note: {err}")),
        )
            .into_response(),
    }
}

/// POST /notes
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateNoteRequest>,
) -> impl IntoResponse {
    let (note_name, folder_id, content) =
        match validate_note_fields(req.note_name, req.folder_id, req.content) {
            Ok(fields) => fields,
            Err(err) => {
                let (status, message) = err.bad_request();
                return (status, err_json(message)).into_response();
            }
        };

    let new_note = NewNote {
        note_name,
        folder_id,
        content,
        date_modified: req.date_modified,
    };

    match state.notes.insert(&new_note).await {
        Ok(note) => (
            StatusCode::CREATED,
            [(header::LOCATION, format!("/notes/{}", note.id))],
            Json(note_to_response(note)),
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            err_json(format!("failed to create note: {err}")),
        )
            .into_response(),
    }
}

/// DELETE /notes/:note_id
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path(note_id): Path<i64>,
) -> impl IntoResponse {
    match state.notes.delete(note_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, err_json("Note doesn't exist")).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            err_json(format!("failed to delete note: {err}")),
        )
            .into_response(),
    }
}
