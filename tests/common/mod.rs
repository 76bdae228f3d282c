#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use vidshare_api::auth::SessionKeys;
use vidshare_api::config::AppConfig;
use async_trait::async_trait;
use vidshare_api::database::models::{User, Video};
use vidshare_api::database::{ConnectionState, DatabaseError, MemoryStore, Store};
use vidshare_api::{app, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Router backed by an in-memory store, driven in-process.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn Store>,
    pub keys: SessionKeys,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Result<Self> {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn Store>) -> Result<Self> {
        let keys = SessionKeys::new(TEST_SECRET, 1)?;
        let state = AppState::new(Arc::clone(&store), keys.clone());
        let router = app(state, &AppConfig::development());
        Ok(Self { router, store, keys })
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok(TestResponse { status, location, body })
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.send(Method::POST, path, token, Some(body)).await
    }

    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<TestResponse> {
        self.post(
            "/api/auth/register",
            None,
            json!({ "email": email, "password": password, "name": name }),
        )
        .await
    }

    /// Registers the user and returns a session token for them.
    pub async fn signed_in(&self, email: &str) -> Result<String> {
        let registered = self.register(email, "correct horse", "Test User").await?;
        anyhow::ensure!(registered.status == StatusCode::CREATED, "register failed: {}", registered.body);

        let login = self
            .post("/api/auth/login", None, json!({ "email": email, "password": "correct horse" }))
            .await?;
        anyhow::ensure!(login.status == StatusCode::OK, "login failed: {}", login.body);

        login.body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("login response carried no token"))
    }
}

/// Cause carried by every [`UnreachableStore`] failure.
pub const UNREACHABLE_CAUSE: &str = "connection refused (db.internal:5432)";

/// Store whose connection never comes up.
pub struct UnreachableStore;

impl UnreachableStore {
    fn fail() -> DatabaseError {
        DatabaseError::QueryError(UNREACHABLE_CAUSE.to_string())
    }
}

#[async_trait]
impl Store for UnreachableStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Err(Self::fail())
    }

    fn connection_state(&self) -> ConnectionState {
        ConnectionState::Uninitialized
    }

    async fn find_user_by_email(&self, _email: &str) -> Result<Option<User>, DatabaseError> {
        Err(Self::fail())
    }

    async fn insert_user(&self, _user: &mut User) -> Result<(), DatabaseError> {
        Err(Self::fail())
    }

    async fn list_videos(&self) -> Result<Vec<Video>, DatabaseError> {
        Err(Self::fail())
    }

    async fn insert_video(&self, _video: &Video) -> Result<(), DatabaseError> {
        Err(Self::fail())
    }
}
