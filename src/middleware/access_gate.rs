//! Per-request authorization interceptor.
//!
//! Every path that reaches the gate falls into exactly one [`RouteClass`].
//! Auth-flow and public paths always pass; private paths pass only with a
//! valid session token and otherwise redirect to the login page.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use super::session::{bearer_token, Session};
use crate::auth::SessionKeys;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const ROOT_PATH: &str = "/";
pub const AUTH_NAMESPACE: &str = "/api/auth";
pub const PUBLIC_NAMESPACE: &str = "/api/videos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    AuthFlow,
    Public,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin,
}

/// True for `prefix` itself and anything below it, segment-wise.
///
/// Intentionally stricter than a raw string prefix: `/api/authx` and
/// `/api/videos-feed` are outside their namespaces and stay private.
fn in_namespace(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// First match wins: auth-flow, then public, then private.
pub fn classify(path: &str) -> RouteClass {
    if in_namespace(path, AUTH_NAMESPACE) || path == LOGIN_PATH || path == REGISTER_PATH {
        RouteClass::AuthFlow
    } else if path == ROOT_PATH || in_namespace(path, PUBLIC_NAMESPACE) {
        RouteClass::Public
    } else {
        RouteClass::Private
    }
}

pub fn authorize(path: &str, has_session: bool) -> GateDecision {
    match classify(path) {
        RouteClass::AuthFlow | RouteClass::Public => GateDecision::Allow,
        RouteClass::Private if has_session => GateDecision::Allow,
        RouteClass::Private => GateDecision::RedirectToLogin,
    }
}

/// Login URL that brings the user back to `path` afterwards.
pub fn login_redirect(path: &str) -> String {
    let callback: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("{}?callbackUrl={}", LOGIN_PATH, callback)
}

/// Decides which paths are evaluated by the gate at all. Static assets,
/// images and internal endpoints bypass it.
#[derive(Debug, Clone)]
pub struct GateMatcher {
    bypass: Vec<String>,
}

impl Default for GateMatcher {
    fn default() -> Self {
        Self::new(["/static", "/images", "/favicon.ico", "/health"])
    }
}

impl GateMatcher {
    pub fn new<I, S>(bypass: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bypass: bypass.into_iter().map(Into::into).collect(),
        }
    }

    pub fn applies(&self, path: &str) -> bool {
        !self.bypass.iter().any(|prefix| in_namespace(path, prefix))
    }
}

/// State for [`access_gate`].
#[derive(Debug, Clone)]
pub struct AccessGate {
    pub keys: SessionKeys,
    pub matcher: GateMatcher,
}

impl AccessGate {
    pub fn new(keys: SessionKeys) -> Self {
        Self {
            keys,
            matcher: GateMatcher::default(),
        }
    }
}

/// Axum middleware. A valid token becomes a [`Session`] extension on every
/// gated request; an invalid one counts as absent.
pub async fn access_gate(State(gate): State<AccessGate>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();

    if !gate.matcher.applies(&path) {
        return next.run(request).await;
    }

    let session = bearer_token(request.headers()).and_then(|token| match gate.keys.verify(token) {
        Ok(claims) => Some(Session::from(claims)),
        Err(e) => {
            debug!("Ignoring session token on {}: {}", path, e);
            None
        }
    });

    match authorize(&path, session.is_some()) {
        GateDecision::Allow => {
            if let Some(session) = session {
                request.extensions_mut().insert(session);
            }
            next.run(request).await
        }
        GateDecision::RedirectToLogin => {
            debug!("No session for private path {}, redirecting to login", path);
            Redirect::temporary(&login_redirect(&path)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_flow_paths() {
        for path in ["/api/auth", "/api/auth/register", "/api/auth/login", "/login", "/register"] {
            assert_eq!(classify(path), RouteClass::AuthFlow, "{}", path);
            assert_eq!(authorize(path, false), GateDecision::Allow);
            assert_eq!(authorize(path, true), GateDecision::Allow);
        }
    }

    #[test]
    fn public_paths() {
        for path in ["/", "/api/videos", "/api/videos/123"] {
            assert_eq!(classify(path), RouteClass::Public, "{}", path);
            assert_eq!(authorize(path, false), GateDecision::Allow);
        }
    }

    #[test]
    fn private_paths_need_a_session() {
        for path in [
            "/upload",
            "/upload/validate",
            "/profile",
            "/api/authority",
            "/api/authx",
            "/loginx",
            "/api/videosx",
            "/api/videos-feed",
        ] {
            assert_eq!(classify(path), RouteClass::Private, "{}", path);
            assert_eq!(authorize(path, false), GateDecision::RedirectToLogin);
            assert_eq!(authorize(path, true), GateDecision::Allow);
        }
    }

    #[test]
    fn login_subpaths_are_private() {
        assert_eq!(classify("/login/reset"), RouteClass::Private);
    }

    #[test]
    fn redirect_keeps_callback() {
        assert_eq!(login_redirect("/upload"), "/login?callbackUrl=%2Fupload");
    }

    #[test]
    fn matcher_bypasses_assets_and_health_check() {
        let matcher = GateMatcher::default();
        assert!(!matcher.applies("/static/app.css"));
        assert!(!matcher.applies("/images/logo.png"));
        assert!(!matcher.applies("/favicon.ico"));
        assert!(!matcher.applies("/health"));
        assert!(matcher.applies("/staticfiles"));
        assert!(matcher.applies("/upload"));
        assert!(matcher.applies("/"));
    }
}
