use std::sync::Arc;

use axum::http::HeaderValue;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod folders;
mod notes;

/// JSON error envelope: `{ "error": { "message": "..." } }`.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorMessage,
}

#[derive(Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

pub(crate) fn err_json(msg: impl ToString) -> Json<ErrorBody> {
    Json(ErrorBody {
        error: ErrorMessage {
            message: msg.to_string(),
        },
    })
}

pub fn create_router(state: Arc<AppState>) -> Router {
    create_router_with_cors(state, &[])
}

pub fn create_router_with_cors(state: Arc<AppState>, cors_allowed_origins: &[String]) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route(
            "/folders",
            get(folders::list_folders).post(folders::create_folder),
        )
        .route("/folders/:folder_id", get(folders::get_folder))
        .route("/notes", get(notes::list_notes).post(notes::create_note))
        .route(
            "/notes/:note_id",
            get(notes::get_note).delete(notes::delete_note),
        )
        .layer(TraceLayer::new_for_http());

    let router = if cors_allowed_origins.is_empty() {
        router
    } else {
        let origins: Vec<HeaderValue> = cors_allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        router.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any),
        )
    };

    router.with_state(state)
}

/// GET /health
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
