use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application error type.
///
/// Catalog failures never show up here: the recommender absorbs them per step.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    /// Body extraction failed; keeps the extractor's status (400, 415, 422).
    Rejected(StatusCode, String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Rejected(status, msg) => (status, msg),
        };
        (
            status,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}
