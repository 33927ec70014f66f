//! Response envelope shared by every HTTP route

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use crate::error::ApiErrorCode;

/// `{"success": true, "data": ...}` or `{"success": false, "error": "CODE"}`.
///
/// Both variants are returned with HTTP 200; clients branch on `success`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Success { success: bool, data: T },
    Failure { success: bool, error: ApiErrorCode },
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse::Success { success: true, data }
    }

    pub fn failure(error: ApiErrorCode) -> Self {
        ApiResponse::Failure { success: false, error }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
