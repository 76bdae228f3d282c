// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};

use super::Credentials;
use crate::app::AppState;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// POST /api/auth/register - Register new user account
///
/// Expected Input:
/// ```json
/// { "email": "a@b.com", "password": "secret", "name": "A" }
/// ```
///
/// Responses:
/// - 201 `{ "message": "User created successfully", "user": { ... } }`
/// - 400 "Missing required fields" or "User already exists"
/// - 500 "Internal server error"
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(body) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let missing = body.missing(&["email", "password", "name"]);
    if !missing.is_empty() {
        return Err(ApiError::missing_fields(missing));
    }
    let (Some(email), Some(password), Some(name)) = (body.email, body.password, body.name) else {
        return Err(ApiError::missing_fields(["email", "password", "name"]));
    };

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::bad_request("User already exists"));
    }

    // Concurrent registrations of the same email are caught by the store as
    // a duplicate and map to the same 400
    let mut user = User::new(email, password, name);
    state.store.insert_user(&mut user).await?;

    tracing::info!("Registered user {} ({})", user.email, user.id);

    Ok(ApiResponse::created(json!({
        "message": "User created successfully",
        "user": user.profile(),
    })))
}
