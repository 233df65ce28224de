//! Mapping of engine errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use tradeflow_core::FinanceError;

/// Error returned by every handler.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub FinanceError);

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    code: &'static str,
    error: String,
}

impl ApiError {
    /// HTTP status for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            FinanceError::NotFound { .. } => StatusCode::NOT_FOUND,
            FinanceError::InvalidState { .. }
            | FinanceError::AlreadyPaid { .. }
            | FinanceError::DuplicateParticipant { .. }
            | FinanceError::NoFactoringOffer { .. } => StatusCode::CONFLICT,
            FinanceError::UnknownParticipant { .. }
            | FinanceError::FinancingExceedsOrderValue { .. }
            | FinanceError::CollateralInsufficient { .. }
            | FinanceError::InvalidCreditRating { .. }
            | FinanceError::IndexOutOfRange { .. }
            | FinanceError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            FinanceError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        let body = ErrorResponse {
            code: self.0.code(),
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handler result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (FinanceError::not_found("invoice", "INV-00000001"), StatusCode::NOT_FOUND),
            (
                FinanceError::invalid_state("invoice", "INV-00000001", "factored", "factor"),
                StatusCode::CONFLICT,
            ),
            (
                FinanceError::unknown_participant("PRT-00000009"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                FinanceError::CollateralInsufficient {
                    requested: dec!(2),
                    inventory_value: dec!(1),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                FinanceError::Storage {
                    reason: "disk full".into(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }
}
