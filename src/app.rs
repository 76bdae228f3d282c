use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::SessionKeys;
use crate::config::AppConfig;
use crate::database::Store;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{access_gate, AccessGate};

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub keys: SessionKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, keys: SessionKeys) -> Self {
        Self { store, keys }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let gate = AccessGate::new(state.keys.clone());

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(page_routes())
        .merge(auth_routes())
        .merge(video_routes())
        // Private
        .merge(upload_routes())
        .fallback(not_found)
        .with_state(state)
        // Every request passes the gate before routing
        .layer(from_fn_with_state(gate, access_gate))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}

fn page_routes() -> Router<AppState> {
    use public::pages;

    Router::new()
        .route("/login", get(pages::login_page))
        .route("/register", get(pages::register_page))
}

fn auth_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/login", post(auth::login_post))
        .route("/api/auth/session", get(auth::session_get))
}

fn video_routes() -> Router<AppState> {
    use public::videos;

    Router::new().route("/api/videos", get(videos::videos_get).post(videos::videos_post))
}

fn upload_routes() -> Router<AppState> {
    use protected::upload;

    Router::new()
        .route("/upload", get(upload::upload_get))
        .route("/upload/validate", post(upload::validate_post))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "vidshare-api",
            "version": version,
            "description": "Video sharing backend",
            "endpoints": {
                "home": "/ (public)",
                "videos": "/api/videos (public listing; publishing needs a session)",
                "auth": "/api/auth/register, /api/auth/login, /api/auth/session (public)",
                "pages": "/login, /register (public)",
                "upload": "/upload, /upload/validate (private)",
                "health": "/health",
            }
        }
    }))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok",
                    "connection": state.store.connection_state(),
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "connection": state.store.connection_state(),
                    }
                })),
            )
        }
    }
}
