//! Recent-moment handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::PolaroidError,
    storage::StoredMoment,
    style::{FontChoice, TimestampMode},
};

use super::super::state::AppState;
use super::session::SessionResponse;
use super::{ApiResult, api_error};

/// Listing entry. Image payloads are fetched separately.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentSummary {
    pub id: u64,
    pub caption: String,
    pub filter_enabled: bool,
    pub font: FontChoice,
    pub timestamp_mode: TimestampMode,
    pub timestamp: DateTime<Utc>,
}

impl From<StoredMoment> for MomentSummary {
    fn from(m: StoredMoment) -> Self {
        Self {
            id: m.id,
            caption: m.caption,
            filter_enabled: m.filter_enabled,
            font: m.font,
            timestamp_mode: m.timestamp_mode,
            timestamp: m.timestamp,
        }
    }
}

/// GET /api/moments - Most recent first.
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<MomentSummary>>> {
    let moments = state.studio.lock().await.list().map_err(api_error)?;
    Ok(Json(moments.into_iter().map(MomentSummary::from).collect()))
}

/// GET /api/moments/:id/print - Stored print as JPEG.
pub async fn print(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<impl IntoResponse> {
    let moment = state
        .studio
        .lock()
        .await
        .get(id)
        .map_err(api_error)?
        .ok_or_else(|| api_error(PolaroidError::MomentNotFound(id)))?;
    let bytes = moment.print_bytes().map_err(api_error)?;
    Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes))
}

/// POST /api/moments/:id/reopen - Edit a stored moment again.
pub async fn reopen(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<Json<SessionResponse>> {
    let mut studio = state.studio.lock().await;
    let session = studio.reopen(id).map_err(api_error)?;
    Ok(Json(SessionResponse::from(session)))
}

/// DELETE /api/moments/:id
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    if state.studio.lock().await.remove(id).map_err(api_error)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(api_error(PolaroidError::MomentNotFound(id)))
    }
}

/// DELETE /api/moments
pub async fn clear(State(state): State<Arc<AppState>>) -> ApiResult<StatusCode> {
    state.studio.lock().await.clear().map_err(api_error)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use crate::config::StudioConfig;
    use crate::server::{AppState, router};
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(dir: &std::path::Path) -> axum::Router {
        let config = StudioConfig {
            store_path: dir.join("moments.json"),
            export_dir: dir.join("exports"),
            ..StudioConfig::default()
        };
        router(Arc::new(AppState::new(&config).unwrap()))
    }

    #[tokio::test]
    async fn test_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path())
            .oneshot(Request::get("/api/moments").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"[]");
    }

    #[tokio::test]
    async fn test_unknown_moment_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path())
            .oneshot(
                Request::delete("/api/moments/12")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preview_without_capture_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let response = app(dir.path())
            .oneshot(
                Request::get("/api/session/preview")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
