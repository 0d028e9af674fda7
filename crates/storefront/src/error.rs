//! Unified error handling for the HTTP surface.
//!
//! Provides a unified `AppError` type mapping the domain error taxonomy to
//! status codes. All route handlers return `Result<T, AppError>`. Client
//! errors surface their specific reason; storage and internal errors are
//! logged and respond with a generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use tgmarket_core::ProductId;

use crate::db::LedgerError;
use crate::services::review::ValidationError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Referenced product has no catalog entry.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Review failed content/rating validation.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Caller identity missing or invalid.
    #[error("authentication required")]
    Unauthenticated,

    /// Ledger store unreachable or the write failed.
    #[error("storage unavailable: {0}")]
    Storage(sqlx::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ProductNotFound(id) => Self::ProductNotFound(id),
            LedgerError::Validation(reason) => Self::Validation(reason),
            LedgerError::Storage(err) => Self::Storage(err),
            LedgerError::DataCorruption(detail) => Self::Internal(detail),
        }
    }
}

/// JSON error payload returned to clients.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Storage(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "request error");
        }

        let status = match &self {
            Self::ProductNotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Storage(_) | Self::Internal(_) => "internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::ProductNotFound(ProductId::new(123));
        assert_eq!(err.to_string(), "product 123 not found");

        let err = AppError::Validation(ValidationError::ContentTooShort);
        assert_eq!(
            err.to_string(),
            "review content must be at least 10 characters"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::ProductNotFound(ProductId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Validation(ValidationError::AllFieldsRequired)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Unauthenticated),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let response = AppError::Internal("secret detail".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
