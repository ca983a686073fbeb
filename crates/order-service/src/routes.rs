//! Route handlers
//!
//! `create_order` talks to the user and inventory services before
//! touching the store. Each outbound check runs under its own child
//! span, and every early return still closes the open spans through
//! the guard drops.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use shop_core::{Order, OrderItem};

use crate::AppState;

/// Body accepted by `POST /orders`
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: u64,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "order-service" }))
}

pub(crate) async fn get_orders(State(state): State<AppState>) -> Json<Vec<Order>> {
    let mut span = state.tracer.span("get_all_orders");

    simulate_query(state.max_query_delay_ms).await;

    let orders = state.store.all();
    span.set_attributes([
        ("order.count", json!(orders.len())),
        ("operation.type", json!("read")),
    ]);

    Json(orders)
}

pub(crate) async fn get_order(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    let mut span = state.tracer.span("get_order_by_id");
    span.set_attributes([("order.id", json!(id)), ("operation.type", json!("read"))]);

    simulate_query(state.max_query_delay_ms).await;

    match state.store.get(id) {
        Some(order) => Json(order).into_response(),
        None => {
            span.set_status_error("Order not found");
            error_body(StatusCode::NOT_FOUND, "Order not found")
        }
    }
}

pub(crate) async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Response {
    let mut span = state.tracer.span("create_order");
    span.set_attributes([
        ("order.user_id", json!(request.user_id)),
        ("order.items_count", json!(request.items.len())),
        ("operation.type", json!("write")),
    ]);

    // The user must exist before anything is written
    {
        let mut user_span = state.tracer.child_span("verify_user", &span);
        let path = format!("/users/{}", request.user_id);
        match state.users.get_status(&path).await {
            Ok(status) => {
                user_span.set_attributes([
                    ("http.status_code", json!(status.as_u16())),
                    ("user.id", json!(request.user_id)),
                ]);
                if status != StatusCode::OK {
                    return error_body(StatusCode::BAD_REQUEST, "Invalid user");
                }
            }
            Err(e) => {
                user_span.record_exception(&e);
                return error_body(StatusCode::SERVICE_UNAVAILABLE, "User service unavailable");
            }
        }
    }

    // One span covers the whole inventory sweep; its attributes track
    // the item currently being checked
    {
        let mut inventory_span = state.tracer.child_span("check_inventory", &span);
        for item in &request.items {
            let path = format!("/inventory/{}", item.product_id);
            match state.inventory.get_status(&path).await {
                Ok(status) => {
                    inventory_span.set_attributes([
                        ("product.id", json!(item.product_id)),
                        ("requested.quantity", json!(item.quantity)),
                    ]);
                    if status != StatusCode::OK {
                        return error_body(
                            StatusCode::BAD_REQUEST,
                            format!("Product {} not found", item.product_id),
                        );
                    }
                }
                Err(e) => {
                    inventory_span.record_exception(&e);
                    return error_body(
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Inventory service unavailable",
                    );
                }
            }
        }
    }

    let order = state.store.append(request.user_id, request.items);
    span.set_attributes([
        ("order.id", json!(order.id)),
        ("order.total", json!(order.total)),
    ]);

    (StatusCode::CREATED, Json(order)).into_response()
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Stand-in for a database query: sleep a random duration up to the
/// configured bound
async fn simulate_query(max_ms: u64) {
    if max_ms == 0 {
        return;
    }
    let delay = rand::thread_rng().gen_range(0..=max_ms);
    tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
}
