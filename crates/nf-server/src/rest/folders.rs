use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use nf_core::NewFolder;

use super::err_json;
use crate::state::AppState;
use crate::validation::validate_folder_name;

#[derive(Deserialize)]
pub struct CreateFolderRequest {
    #[serde(default)]
    pub folder_name: Option<String>,
}

/// GET /folders
pub async fn list_folders(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.folders.list().await {
        Ok(folders) => Json(folders).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            err_json(format!("failed to list folders: {err}")),
        )
            .into_response(),
    }
}

/// GET /folders/:folder_id
pub async fn get_folder(
    State(state): State<Arc<AppState>>,
    Path(folder_id): Path<i64>,
) -> impl IntoResponse {
    match state.folders.get(folder_id).await {
        Ok(Some(folder)) => Json(folder).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, err_json("Folder doesn't exist")).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            err_json(format!("failed to load folder: {err}")),
        )
            .into_response(),
    }
}

/// POST /folders
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFolderRequest>,
) -> impl IntoResponse {
    let folder_name = match validate_folder_name(req.folder_name) {
        Ok(name) => name,
        Err(err) => {
            let (status, message) = err.bad_request();
            return (status, err_json(message)).into_response();
        }
    };

    match state.folders.insert(&NewFolder::new(folder_name)).await {
        Ok(folder) => (
            StatusCode::CREATED,
            [(header::LOCATION, format!("/folders/{}", folder.id))],
            Json(folder),
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            err_json(format!("failed to create folder: {err}")),
        )
            .into_response(),
    }
}
