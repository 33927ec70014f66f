//! Wallet routes

use axum::{
    Router,
    routing::get,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::api::routes::require_address;
use crate::database::queries::{AccountQueries, TransactionQueries};
use crate::error::{ApiErrorCode, Result};
use crate::models::{normalize_page, TransactionPage};

/// A query string that fails to decode (a repeated key, for one) is
/// treated as a bad address.
#[derive(Deserialize)]
struct WalletParams {
    address: Option<String>,
    page: Option<String>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/wallet/balance", get(get_balance))
        .route("/wallet/transactions", get(get_wallet_transactions))
        .with_state(state)
}

/// Unknown accounts yield `{}` rather than an error.
async fn get_balance(
    State(state): State<AppState>,
    params: std::result::Result<Query<WalletParams>, QueryRejection>,
) -> Result<ApiResponse<serde_json::Value>> {
    let Query(params) = params.map_err(|_| ApiErrorCode::InvalidAddress)?;
    let address = require_address(params.address.as_deref())?;
    let account = AccountQueries::get_balance(state.database.pool(), &address).await?;
    let data = match account {
        Some(account) => serde_json::to_value(account)?,
        None => serde_json::json!({}),
    };
    Ok(ApiResponse::success(data))
}

async fn get_wallet_transactions(
    State(state): State<AppState>,
    params: std::result::Result<Query<WalletParams>, QueryRejection>,
) -> Result<ApiResponse<TransactionPage>> {
    let Query(params) = params.map_err(|_| ApiErrorCode::InvalidAddress)?;
    let address = require_address(params.address.as_deref())?;
    let page = normalize_page(params.page.as_deref());
    let data = TransactionQueries::list_by_address(state.database.pool(), &address, page, state.page_limit).await?;
    Ok(ApiResponse::success(data))
}
