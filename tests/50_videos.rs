mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

fn video(title: &str) -> Value {
    json!({
        "title": title,
        "description": "A short clip",
        "video_url": "https://media.example.com/videos/clip.mp4",
        "thumbnail_url": "https://media.example.com/images/clip.png"
    })
}

#[tokio::test]
async fn listing_starts_empty() -> Result<()> {
    let app = common::TestApp::new()?;

    let res = app.get("/api/videos", None).await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"], json!([]));
    Ok(())
}

#[tokio::test]
async fn publishing_requires_a_session() -> Result<()> {
    let app = common::TestApp::new()?;

    let res = app.post("/api/videos", None, video("Anonymous")).await?;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["message"], "Authentication required");
    Ok(())
}

#[tokio::test]
async fn published_videos_are_listed_newest_first() -> Result<()> {
    let app = common::TestApp::new()?;
    let token = app.signed_in("creator@example.com").await?;

    let first = app.post("/api/videos", Some(&token), video("First")).await?;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["data"]["controls"], true);

    let second = app.post("/api/videos", Some(&token), video("Second")).await?;
    assert_eq!(second.status, StatusCode::CREATED);

    let res = app.get("/api/videos", None).await?;
    let titles: Vec<&str> = res.body["data"]
        .as_array()
        .map(|videos| videos.iter().filter_map(|v| v["title"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(titles, ["Second", "First"]);
    Ok(())
}

#[tokio::test]
async fn publishing_names_the_missing_field() -> Result<()> {
    let app = common::TestApp::new()?;
    let token = app.signed_in("creator@example.com").await?;

    let res = app
        .post("/api/videos", Some(&token), json!({ "title": "No media", "description": "x" }))
        .await?;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["field_errors"]["video_url"], "This field is required");
    Ok(())
}
