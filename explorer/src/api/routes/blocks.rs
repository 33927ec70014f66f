//! Block-related routes

use axum::{
    Router,
    routing::get,
    extract::{Path, State, rejection::PathRejection},
};
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::database::queries::BlockQueries;
use crate::error::{ApiErrorCode, Result};
use crate::models::{parse_block_height, BlockInfo};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/block/:height", get(get_block_by_height))
        .with_state(state)
}

/// The height is taken as a raw segment so malformed input, including a
/// segment that is not UTF-8, gets the `MUST_BE_INTEGER_EXCEPT_0` envelope.
async fn get_block_by_height(
    State(state): State<AppState>,
    height: std::result::Result<Path<String>, PathRejection>,
) -> Result<ApiResponse<BlockInfo>> {
    let Path(height) = height.map_err(|_| ApiErrorCode::MustBeIntegerExcept0)?;
    let height = parse_block_height(&height)?;
    let block = BlockQueries::get_by_height(state.database.pool(), height)
        .await?
        .ok_or(ApiErrorCode::InvalidHeight)?;
    Ok(ApiResponse::success(block))
}
