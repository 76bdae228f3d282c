// handlers/public/videos.rs - /api/videos handlers
//
// Listing is public. Publishing sits on the same public path but acts on
// behalf of a user, so it asks for the session itself.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::app::AppState;
use crate::database::models::{NewVideo, Video};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequireSession};

/// GET /api/videos - All videos, newest first
pub async fn videos_get(State(state): State<AppState>) -> ApiResult<Vec<Video>> {
    let videos = state.store.list_videos().await?;
    Ok(ApiResponse::success(videos))
}

/// POST /api/videos - Publish a video already uploaded to the media host
///
/// Expected Input:
/// ```json
/// {
///   "title": "string",
///   "description": "string",
///   "video_url": "string",
///   "thumbnail_url": "string",
///   "controls": true          // Optional, defaults to true
/// }
/// ```
pub async fn videos_post(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    payload: Result<Json<NewVideo>, JsonRejection>,
) -> ApiResult<Video> {
    let Json(body) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let video = body
        .into_video(session.user_id)
        .map_err(|field| ApiError::missing_fields([field]))?;

    state.store.insert_video(&video).await?;
    tracing::info!("User {} published video {}", session.user_id, video.id);

    Ok(ApiResponse::created(video))
}
