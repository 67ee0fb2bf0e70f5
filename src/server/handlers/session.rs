//! Capture upload and editing-session handlers.

use axum::{
    Json,
    extract::{Multipart, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{path::PathBuf, sync::Arc};

use crate::{
    capture::{Provenance, RawCapture, snapshot_from_frame},
    error::PolaroidError,
    export::ExportOutcome,
    session::{EditingSession, Persisted},
    style::StyleParameters,
};

use super::super::state::AppState;
use super::{ApiResult, api_error};

/// Active session as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    pub style: StyleParameters,
    pub captured_at: DateTime<Utc>,
}

impl From<&EditingSession> for SessionResponse {
    fn from(session: &EditingSession) -> Self {
        Self {
            id: session.id,
            width: session.capture.width(),
            height: session.capture.height(),
            style: session.style.clone(),
            captured_at: session.captured_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub id: u64,
    pub persisted: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ExportResponse {
    Shared,
    Downloaded { path: PathBuf },
    Cancelled,
}

impl From<ExportOutcome> for ExportResponse {
    fn from(outcome: ExportOutcome) -> Self {
        match outcome {
            ExportOutcome::Shared => Self::Shared,
            ExportOutcome::Downloaded(path) => Self::Downloaded { path },
            ExportOutcome::Cancelled => Self::Cancelled,
        }
    }
}

/// POST /api/capture - Upload a capture and start editing it.
///
/// Fields: `image` (required), `facing` = `front` | `back` for raw camera
/// frames, which are square-cropped and mirrored like a live snapshot.
pub async fn capture(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<SessionResponse>> {
    let mut image_data: Option<Vec<u8>> = None;
    let mut facing = Provenance::Imported;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" => {
                let bytes = field.bytes().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("Failed to read image: {}", e))
                })?;
                image_data = Some(bytes.to_vec());
            }
            "facing" => {
                let text = field.text().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("Failed to read facing: {}", e))
                })?;
                facing = match text.trim() {
                    "front" => Provenance::Front,
                    "back" => Provenance::Back,
                    "imported" | "" => Provenance::Imported,
                    other => {
                        return Err((
                            StatusCode::BAD_REQUEST,
                            format!("Unknown facing '{}'", other),
                        ));
                    }
                };
            }
            _ => {}
        }
    }

    let image_bytes =
        image_data.ok_or((StatusCode::BAD_REQUEST, "No image field found".to_string()))?;

    let decoded = RawCapture::decode_async(image_bytes, Provenance::Imported)
        .await
        .map_err(api_error)?;
    let raw = match facing {
        Provenance::Imported => decoded,
        camera => snapshot_from_frame(decoded.image(), camera).map_err(api_error)?,
    };

    let mut studio = state.studio.lock().await;
    studio.begin(raw, Utc::now());
    let session = studio
        .session()
        .ok_or_else(|| api_error(PolaroidError::NoCapture))?;
    Ok(Json(SessionResponse::from(session)))
}

/// GET /api/session - Describe the active session.
pub async fn show(State(state): State<Arc<AppState>>) -> ApiResult<Json<SessionResponse>> {
    let studio = state.studio.lock().await;
    let session = studio
        .session()
        .ok_or_else(|| api_error(PolaroidError::NoCapture))?;
    Ok(Json(SessionResponse::from(session)))
}

/// PUT /api/session/style - Replace the style; the auto-save re-arms.
pub async fn update_style(
    State(state): State<Arc<AppState>>,
    Json(style): Json<StyleParameters>,
) -> ApiResult<StatusCode> {
    state.studio.lock().await.edit(style).map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/session/preview - Composed print as JPEG.
pub async fn preview(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let artifact = state
        .studio
        .lock()
        .await
        .preview_async()
        .await
        .map_err(api_error)?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], artifact.encoded))
}

/// POST /api/session/save - Compose and save without waiting for the timer.
pub async fn save(State(state): State<Arc<AppState>>) -> ApiResult<Json<SaveResponse>> {
    let mut studio = state.studio.lock().await;
    let (_, persisted) = studio.flush().await.map_err(api_error)?;
    let id = studio.session().map(|s| s.id).unwrap_or_default();
    Ok(Json(SaveResponse {
        id,
        persisted: persisted == Persisted::Saved,
    }))
}

/// POST /api/session/export - Compose and hand the print to the export directory.
pub async fn export(State(state): State<Arc<AppState>>) -> ApiResult<Json<ExportResponse>> {
    let artifact = state
        .studio
        .lock()
        .await
        .preview_async()
        .await
        .map_err(api_error)?;
    let outcome = state
        .exports
        .export(&artifact, false)
        .await
        .map_err(api_error)?;
    Ok(Json(outcome.into()))
}
