//! Transaction-related routes

use axum::{
    Router,
    routing::get,
    extract::{Path, State, rejection::PathRejection},
};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::database::queries::TransactionQueries;
use crate::error::{ApiErrorCode, Result};
use crate::models::{TransactionInfo, TxHash};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/transaction/:hash", get(get_transaction_by_hash))
        .with_state(state)
}

async fn get_transaction_by_hash(
    State(state): State<AppState>,
    hash: std::result::Result<Path<String>, PathRejection>,
) -> Result<ApiResponse<TransactionInfo>> {
    let Path(hash) = hash.map_err(|_| ApiErrorCode::InvalidTxHash)?;
    let hash = TxHash::parse(&hash)?;
    let tx = TransactionQueries::get_by_hash(state.database.pool(), &hash)
        .await?
        .ok_or(ApiErrorCode::TxNotFound)?;
    Ok(ApiResponse::success(tx))
}
