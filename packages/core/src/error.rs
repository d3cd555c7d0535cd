//! Unified API error type.
//!
//! Every handler returns `Result<_, ApiError>`; the [`IntoResponse`] impl is
//! the single place where validation and store outcomes become HTTP statuses.
//! Validation failures map to 422, missing entities to 404, and anything
//! unexpected from the database to 500 with the detail logged but kept out
//! of the response body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::EmptyField { field } | ApiError::FieldTooLong { field, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": self.to_string(), "field": field })),
            )
                .into_response(),
            ApiError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            ApiError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
