//! Error handling for the Inventory Indent System
//!
//! Provides consistent JSON error responses with stable error codes

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    // Conflict errors, raised when a store uniqueness rule is violated
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: i32,
        available: i32,
    },

    // External service errors
    #[error("External service error: {0}")]
    ExternalService(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Map a store error to a typed conflict when it is a unique-constraint
    /// violation, so callers see 409 instead of a bare 500.
    pub fn conflict_on_unique(err: sqlx::Error, what: &str) -> AppError {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateEntry(what.to_string())
            }
            _ => AppError::DatabaseError(err),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid email or password".to_string(),
                    field: None,
                },
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "TOKEN_EXPIRED".to_string(),
                    message: "Token has expired".to_string(),
                    field: None,
                },
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_TOKEN".to_string(),
                    message: "Invalid token".to_string(),
                    field: None,
                },
            ),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "UNAUTHORIZED".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorDetail {
                    code: "FORBIDDEN".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message: format!("A record with this {} already exists", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::InvalidStateTransition(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INVALID_STATE_TRANSITION".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::InsufficientStock {
                product,
                requested,
                available,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message: format!(
                        "Insufficient stock for {}: requested {}, available {}",
                        product, requested, available
                    ),
                    field: Some(product.clone()),
                },
            ),
            AppError::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "EXTERNAL_SERVICE_ERROR".to_string(),
                    message: format!("External service error: {}", msg),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
