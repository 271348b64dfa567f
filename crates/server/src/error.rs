//! JSON envelope helpers shared by all route handlers.

use {
    axum::{Json, http::StatusCode, response::IntoResponse},
    serde::Serialize,
    serde_json::json,
};

/// Success envelope: `{"data": …}`.
pub fn data<T: Serialize>(value: T) -> Json<serde_json::Value> {
    Json(json!({ "data": value }))
}

fn error(status: StatusCode, code: &str, message: &str) -> axum::response::Response {
    (
        status,
        Json(json!({ "error": { "message": message, "code": code } })),
    )
        .into_response()
}

pub fn not_found(message: &str) -> axum::response::Response {
    error(StatusCode::NOT_FOUND, "NOT_FOUND", message)
}

pub fn validation_error(message: &str) -> axum::response::Response {
    error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
}

pub fn conflict(message: &str) -> axum::response::Response {
    error(StatusCode::CONFLICT, "CONFLICT", message)
}

pub fn internal(err: impl std::fmt::Display) -> axum::response::Response {
    error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL",
        &err.to_string(),
    )
}
