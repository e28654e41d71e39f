use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::Problem;

/// Result type for handlers: success body or a Problem.
pub type ApiResult<T> = Result<T, Problem>;

/// 201 Created + JSON
#[must_use]
pub fn created_json<T: serde::Serialize>(value: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(value))
}

/// 204 No Content
#[must_use]
pub fn no_content() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
