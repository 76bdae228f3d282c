// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use super::Credentials;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// POST /api/auth/login - Authenticate and receive a session token
///
/// Expected Input:
/// ```json
/// { "email": "a@b.com", "password": "secret" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "expires_in": 604800,
///     "user": { "id": "...", "email": "a@b.com", "name": "A", "created_at": "..." }
///   }
/// }
/// ```
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(body) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let missing = body.missing(&["email", "password"]);
    if !missing.is_empty() {
        return Err(ApiError::missing_fields(missing));
    }
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(ApiError::missing_fields(["email", "password"]));
    };

    let found = state.store.find_user_by_email(&email).await?;
    let verified = match &found {
        Some(user) => user.verify_password(&password).await,
        None => false,
    };
    let Some(user) = found.filter(|_| verified) else {
        tracing::warn!("Failed login attempt for {}", email);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let token = state
        .keys
        .issue(&user)
        .map_err(|e| ApiError::internal(format_args!("Failed to issue session token for {}: {}", user.id, e)))?;

    tracing::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(json!({
        "token": token,
        "expires_in": state.keys.expires_in(),
        "user": user.profile(),
    })))
}
