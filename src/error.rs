// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Map, Value};

use crate::database::manager::DatabaseError;

const INTERNAL_ERROR: &str = "Internal server error";
const FIELD_REQUIRED: &str = "This field is required";

/// Failure surfaced to API clients. The message is always safe to show;
/// underlying causes are logged where the error is converted.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// Required fields absent from the body, in request order.
    MissingFields(Vec<String>),
    Unauthorized(String),
    NotFound(String),
    Internal,
    ServiceUnavailable(String),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::MissingFields(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
            ApiError::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    pub fn error_code(&self) -> &'static str {
        self.parts().1
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::ServiceUnavailable(msg) => msg,
            ApiError::MissingFields(_) => "Missing required fields",
            ApiError::Internal => INTERNAL_ERROR,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": true,
            "message": self.message(),
            "code": self.error_code(),
        });

        if let ApiError::MissingFields(fields) = self {
            let field_errors: Map<String, Value> = fields
                .iter()
                .map(|field| (field.clone(), Value::from(FIELD_REQUIRED)))
                .collect();
            body["field_errors"] = Value::Object(field_errors);
        }

        body
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn missing_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        ApiError::MissingFields(fields.into_iter().map(str::to_string).collect())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    /// Logs `cause` and hides it from the client.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        tracing::error!("{}", cause);
        ApiError::Internal
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Duplicate(_) => ApiError::bad_request("User already exists"),
            DatabaseError::NotReady => ApiError::ServiceUnavailable(err.to_string()),
            other => ApiError::internal(format_args!("Database error: {}", other)),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
