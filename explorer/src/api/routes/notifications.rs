//! Notification routes

use axum::{
    Router,
    routing::{get, post},
    extract::{Query, State, rejection::{JsonRejection, QueryRejection}},
    Json,
};
use serde::Deserialize;
use crate::api::response::ApiResponse;
use crate::api::AppState;
use crate::api::routes::require_address;
use crate::database::queries::NotificationQueries;
use crate::error::{ApiErrorCode, Result};
use crate::models::{normalize_page, parse_positive_id, Address, MarkReadResult, NotificationPage, UnreadCount};

#[derive(Deserialize)]
struct NotificationParams {
    page: Option<String>,
    address: Option<String>,
}

#[derive(Deserialize)]
struct MarkReadBody {
    #[serde(rename = "idNotification", default)]
    id_notification: serde_json::Value,
    #[serde(default)]
    address: Option<String>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/notification", post(mark_read))
        .route("/notification/get-notifications", get(get_notifications))
        .route("/notification/amount-unreadable-notify", get(count_unread))
        .with_state(state)
}

async fn get_notifications(
    State(state): State<AppState>,
    params: std::result::Result<Query<NotificationParams>, QueryRejection>,
) -> Result<ApiResponse<NotificationPage>> {
    let Query(params) = params.map_err(|_| ApiErrorCode::InvalidAddress)?;
    let address = require_address(params.address.as_deref())?;
    let page = normalize_page(params.page.as_deref());

    let data = NotificationQueries::list(state.database.pool(), &address, page, state.page_limit).await?;
    Ok(ApiResponse::success(data))
}

async fn count_unread(
    State(state): State<AppState>,
    params: std::result::Result<Query<NotificationParams>, QueryRejection>,
) -> Result<ApiResponse<UnreadCount>> {
    let Query(params) = params.map_err(|_| ApiErrorCode::InvalidAddress)?;
    let address = require_address(params.address.as_deref())?;

    let unreadable_notification = NotificationQueries::count_unread(state.database.pool(), &address).await?;
    Ok(ApiResponse::success(UnreadCount { unreadable_notification }))
}

async fn mark_read(
    State(state): State<AppState>,
    body: std::result::Result<Json<MarkReadBody>, JsonRejection>,
) -> Result<ApiResponse<Option<MarkReadResult>>> {
    let Ok(Json(body)) = body else {
        return Err(ApiErrorCode::InvalidInput.into());
    };
    let address = Address::parse(body.address.as_deref().unwrap_or_default())
        .map_err(|_| ApiErrorCode::InvalidInput)?;
    let id = parse_positive_id(&body.id_notification).ok_or(ApiErrorCode::InvalidInput)?;

    let data = NotificationQueries::mark_read(state.database.pool(), id, &address).await?;
    Ok(ApiResponse::success(data))
}
