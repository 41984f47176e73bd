//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sales_forecast::ForecastError;
use sales_ledger::LedgerError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure of a request, rendered as `{"detail": message}`
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request fields
    #[error("{0}")]
    Validation(String),

    /// No forecast model has been fitted yet
    #[error("{0}")]
    NotReady(String),

    /// The remote feed could not be reached or read
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotReady(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), detail = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(_) | LedgerError::InvalidDate(_) => {
                ApiError::Validation(err.to_string())
            }
            _ => ApiError::Internal(format!("Failed to write data to file: {}", err)),
        }
    }
}

impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        match err {
            ForecastError::ModelNotTrained(_) => ApiError::NotReady(err.to_string()),
            ForecastError::ValidationError(_) | ForecastError::InvalidParameter(_) => {
                ApiError::Validation(err.to_string())
            }
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<water_quality::WaterError> for ApiError {
    fn from(err: water_quality::WaterError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Background task failed: {}", err))
    }
}
