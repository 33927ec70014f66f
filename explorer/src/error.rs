//! Error types for the explorer

use thiserror::Error;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use crate::api::response::ApiResponse;

/// Error codes surfaced to API clients inside the `{success: false, error}` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    InvalidAddress,
    InvalidInput,
    #[serde(rename = "MUST_BE_INTEGER_EXCEPT_0")]
    MustBeIntegerExcept0,
    InvalidHeight,
    InvalidTxHash,
    TxNotFound,
    InternalError,
}

impl ApiErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorCode::InvalidAddress => "INVALID_ADDRESS",
            ApiErrorCode::InvalidInput => "INVALID_INPUT",
            ApiErrorCode::MustBeIntegerExcept0 => "MUST_BE_INTEGER_EXCEPT_0",
            ApiErrorCode::InvalidHeight => "INVALID_HEIGHT",
            ApiErrorCode::InvalidTxHash => "INVALID_TX_HASH",
            ApiErrorCode::TxNotFound => "TX_NOT_FOUND",
            ApiErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Api(ApiErrorCode),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

impl From<ApiErrorCode> for ExplorerError {
    fn from(code: ApiErrorCode) -> Self {
        ExplorerError::Api(code)
    }
}

impl ExplorerError {
    /// Code reported to the client. Infrastructure failures collapse into `INTERNAL_ERROR`.
    pub fn code(&self) -> ApiErrorCode {
        match self {
            ExplorerError::Api(code) => *code,
            _ => ApiErrorCode::InternalError,
        }
    }
}

impl IntoResponse for ExplorerError {
    fn into_response(self) -> Response {
        if !matches!(self, ExplorerError::Api(_)) {
            tracing::error!(error = %self, "request failed");
        }
        ApiResponse::<()>::failure(self.code()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_serialize_like_wire_names() {
        let codes = [
            ApiErrorCode::InvalidAddress,
            ApiErrorCode::InvalidInput,
            ApiErrorCode::MustBeIntegerExcept0,
            ApiErrorCode::InvalidHeight,
            ApiErrorCode::InvalidTxHash,
            ApiErrorCode::TxNotFound,
            ApiErrorCode::InternalError,
        ];
        for code in codes {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, serde_json::Value::String(code.as_str().to_string()));
        }
    }

    #[test]
    fn test_infrastructure_errors_map_to_internal() {
        let err = ExplorerError::Internal("boom".to_string());
        assert_eq!(err.code(), ApiErrorCode::InternalError);

        let err: ExplorerError = ApiErrorCode::InvalidHeight.into();
        assert_eq!(err.code(), ApiErrorCode::InvalidHeight);
        assert_eq!(err.to_string(), "INVALID_HEIGHT");
    }
}
