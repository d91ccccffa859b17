//! HTTP API endpoints.
//!
//! Backup export/import, read-only stats, and photo upload for clients that
//! send raw image bytes instead of a data URL.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use serde::{Deserialize, Serialize};

use crate::protocol::{NameSlot, StatsCard};
use crate::state::export::StateExport;
use crate::state::SharedStore;
use crate::types::PhotoBlob;
use crate::view;
use crate::ws;

/// Largest photo accepted by the upload route
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Routes served next to the static UI
pub fn router(store: SharedStore) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/state/export", get(export_state))
        .route("/api/state/import", post(import_state))
        .route("/api/stats", get(stats))
        .route("/api/leaderboard", get(leaderboard))
        .route(
            "/api/photo/{slot}",
            post(upload_photo).layer(axum::extract::DefaultBodyLimit::max(MAX_PHOTO_BYTES)),
        )
        .with_state(store)
}

/// Export the entire game state as JSON.
///
/// GET /api/state/export
pub async fn export_state(State(store): State<SharedStore>) -> Json<StateExport> {
    let export = store.lock().await.export_state();
    Json(export)
}

/// Import a game state snapshot.
///
/// POST /api/state/import
///
/// Replaces all current state with the imported data.
pub async fn import_state(
    State(store): State<SharedStore>,
    Json(export): Json<StateExport>,
) -> Response {
    let mut store = store.lock().await;
    match store.import_state(export) {
        Ok(()) => {
            let body = match store.take_persist_warning() {
                Some(warning) => format!("State imported, but {}", warning),
                None => "State imported successfully".to_string(),
            };
            (StatusCode::OK, body).into_response()
        }
        Err(e) => {
            tracing::error!("State import failed: {}", e);
            (StatusCode::BAD_REQUEST, format!("Import failed: {}", e)).into_response()
        }
    }
}

/// Stats cards for the current roster.
///
/// GET /api/stats
pub async fn stats(State(store): State<SharedStore>) -> Json<Vec<StatsCard>> {
    let store = store.lock().await;
    Json(view::stats_cards(store.state()))
}

/// Every player ever seen, most rounds first.
///
/// GET /api/leaderboard
pub async fn leaderboard(State(store): State<SharedStore>) -> Json<Vec<StatsCard>> {
    let store = store.lock().await;
    Json(view::leaderboard_cards(store.state()))
}

/// Name form after a photo upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoUploaded {
    pub slots: Vec<NameSlot>,
    /// Set when the photo could not be saved and lives in memory only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Store a raw image body as the photo for a roster slot.
///
/// POST /api/photo/{slot}
///
/// Returns the refreshed name form.
pub async fn upload_photo(
    State(store): State<SharedStore>,
    Path(slot): Path<usize>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PhotoUploaded>, Response> {
    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let photo = PhotoBlob::from_image_bytes(mime, &body)
        .map_err(|e| (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string()).into_response())?;

    let mut store = store.lock().await;
    store
        .set_player_photo(slot, photo)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response())?;
    let warning = store.take_persist_warning();
    if let Some(warning) = &warning {
        tracing::warn!("Photo kept in memory only: {}", warning);
    }

    Ok(Json(PhotoUploaded {
        slots: view::name_form(store.state()),
        warning,
    }))
}
