// handlers/public/auth/session.rs - GET /api/auth/session handler

use axum::Extension;

use crate::middleware::{ApiResponse, Session};

/// GET /api/auth/session - Current session, or `null` when the request
/// carries no valid token.
pub async fn session_get(session: Option<Extension<Session>>) -> ApiResponse<Option<Session>> {
    ApiResponse::success(session.map(|Extension(session)| session))
}
