//! Application error type mapping to HTTP responses.
//!
//! Every failure is reported as `500 {"error": "<message>"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatrelay_types::error::TurnError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// A chat turn failed; nothing was persisted.
    Turn(TurnError),
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        AppError::Turn(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Turn(e) => e.to_string(),
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message })),
        )
            .into_response()
    }
}
