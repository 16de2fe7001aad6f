use axum::extract::State;
use axum::http::StatusCode;

use super::checkout::OrderData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn list_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<ApiSuccess<Vec<OrderData>>, ApiError> {
    state
        .order_service
        .list_orders(&user.id)
        .await
        .map_err(ApiError::from)
        .map(|orders| {
            ApiSuccess::new(
                StatusCode::OK,
                orders.iter().map(OrderData::from).collect(),
            )
        })
}
