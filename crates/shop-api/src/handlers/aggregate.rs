//! Aggregate endpoint handler

use axum::extract::{Path, State};
use axum::Json;
use shop_core::UserOrders;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/user/{user_id}/orders
/// One user's orders, enriched with product details
///
/// The path parameter is accepted as a raw string: an id that is not a
/// valid integer cannot belong to any user and gets the same 404 as an
/// unknown one.
pub async fn get_user_orders(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserOrders>, ApiError> {
    let id: u64 = match user_id.parse() {
        Ok(id) => id,
        Err(_) => return Err(ApiError::UserNotFound { user_id }),
    };

    let result = state.aggregator.user_orders(id).await?;
    Ok(Json(result))
}
