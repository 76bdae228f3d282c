// handlers/protected/upload.rs - /upload handlers

use axum::{extract::rejection::JsonRejection, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequireSession};
use crate::upload::{self, FileDescriptor, FileKind};

/// GET /upload - Upload rules for the signed-in user
pub async fn upload_get(RequireSession(session): RequireSession) -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "user": session.email,
        "rules": [FileKind::Video.rules(), FileKind::Image.rules()],
    }))
}

/// POST /upload/validate - Check a file before sending it to the media host
///
/// Expected Input:
/// ```json
/// { "file_type": "video", "mime_type": "video/mp4", "size": 1048576 }
/// ```
pub async fn validate_post(
    RequireSession(_session): RequireSession,
    payload: Result<Json<FileDescriptor>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(file) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    upload::validate(&file).map_err(|e| ApiError::bad_request(e.to_string()))?;

    Ok(ApiResponse::success(json!({
        "valid": true,
        "rules": file.file_type.rules(),
    })))
}
