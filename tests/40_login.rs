mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn login_returns_token_that_opens_private_routes() -> Result<()> {
    let app = common::TestApp::new()?;
    app.register("login@example.com", "pw-123", "Login").await?;

    let res = app
        .post("/api/auth/login", None, json!({ "email": "login@example.com", "password": "pw-123" }))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["expires_in"], 3600);
    assert_eq!(res.body["data"]["user"]["email"], "login@example.com");

    let token = res.body["data"]["token"].as_str().unwrap_or_default();
    assert!(!token.is_empty());

    let upload = app.get("/upload", Some(token)).await?;
    assert_eq!(upload.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_the_same() -> Result<()> {
    let app = common::TestApp::new()?;
    app.register("login@example.com", "pw-123", "Login").await?;

    let wrong = app
        .post("/api/auth/login", None, json!({ "email": "login@example.com", "password": "nope" }))
        .await?;
    let unknown = app
        .post("/api/auth/login", None, json!({ "email": "ghost@example.com", "password": "pw-123" }))
        .await?;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["message"], unknown.body["message"]);
    Ok(())
}

#[tokio::test]
async fn login_requires_both_fields() -> Result<()> {
    let app = common::TestApp::new()?;

    let res = app.post("/api/auth/login", None, json!({ "email": "a@b.com" })).await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["message"], "Missing required fields");
    Ok(())
}
