// handlers/public/pages.rs - GET /login and GET /register
//
// Page rendering lives in the frontend; these describe the form each page posts.

use serde_json::{json, Value};

use crate::middleware::ApiResponse;

pub async fn login_page() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "page": "login",
        "action": "/api/auth/login",
        "fields": ["email", "password"],
    }))
}

pub async fn register_page() -> ApiResponse<Value> {
    ApiResponse::success(json!({
        "page": "register",
        "action": "/api/auth/register",
        "fields": ["email", "password", "name"],
    }))
}
