//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt::Display;
use thiserror::Error;
use tracing::error;

use crate::{upstream::UpstreamError, validation::ValidationErrors};

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or invalid caller identity
    #[error("Unauthorized")]
    Unauthorized,

    /// One or more request fields failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller has no relationship to the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Uniqueness or idempotency violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Non-success answer from an upstream collaborator, relayed as-is
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Unauthorized" }),
            ),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": errors.to_string(),
                    "details": errors.errors(),
                }),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            ApiError::Upstream { status, message } => (status, json!({ "error": message })),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            ),
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Database error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<UpstreamError> for ApiError {
    /// Non-success answers keep the upstream status and message; transport
    /// and decoding failures are internal.
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::Status { status, message } => ApiError::Upstream {
                status: StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                message,
            },
            other => {
                error!("Upstream request failed: {}", other);
                ApiError::InternalServerError
            }
        }
    }
}

/// Log an unexpected failure and hide its detail from the caller
///
/// ```ignore
/// let user = repo.find_by_id(id).await.map_err(internal("fetch user"))?;
/// ```
pub fn internal<E: Display>(action: &'static str) -> impl FnOnce(E) -> ApiError {
    move |e| {
        error!("Failed to {}: {}", action, e);
        ApiError::InternalServerError
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
