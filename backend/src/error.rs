//! Error handling for the Storehouse Ledger
//!
//! Validation, referential, and invariant errors are 4xx and carry a
//! descriptive message; storage failures are 5xx and leak no detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::FinanceError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Paid amount {paid} exceeds total cost {total_cost}")]
    Overpayment { paid: Decimal, total_cost: Decimal },

    // Referential errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0} is inactive")]
    InactiveParty(String),

    // Business logic errors
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Auth errors (the auth layer itself lives in front of this service)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<FinanceError> for AppError {
    fn from(err: FinanceError) -> Self {
        match err {
            FinanceError::NonPositiveAmount => AppError::Validation {
                field: "amount".to_string(),
                message: err.to_string(),
            },
            FinanceError::NonPositivePrice => AppError::Validation {
                field: "buy_price".to_string(),
                message: err.to_string(),
            },
            FinanceError::NegativePaid => AppError::Validation {
                field: "paid".to_string(),
                message: err.to_string(),
            },
            FinanceError::Overpaid { paid, total_cost } => {
                AppError::Overpayment { paid, total_cost }
            }
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
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::Overpayment { paid, total_cost } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "OVERPAYMENT".to_string(),
                    message: format!(
                        "Paid amount {} exceeds total cost {}",
                        paid, total_cost
                    ),
                    field: Some("paid".to_string()),
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
            AppError::InactiveParty(resource) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INACTIVE_PARTY".to_string(),
                    message: format!("{} is inactive", resource),
                    field: None,
                },
            ),
            AppError::InvariantViolation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INVARIANT_VIOLATION".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "CONFLICT".to_string(),
                    message: msg.clone(),
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
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
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
