//! End-to-end tests for the gateway backed by the real services
//!
//! Architecture under test:
//!
//! ```text
//! reqwest (test)
//!     │
//!     ▼
//! gateway (shop-api router)
//!   ├── GET /api/user/{id}/orders → Aggregator → HttpShopBackend ──┐
//!   ├── /api/users     → UpstreamProxy ─────────────────────────────► user-service
//!   ├── /api/orders    → UpstreamProxy ─────────────────────────────► order-service
//!   └── /api/inventory → UpstreamProxy ─────────────────────────────► inventory-service
//! ```
//!
//! Every tier runs in-process on its own listener; all calls between
//! them cross real HTTP sockets.

use std::sync::Arc;

use inventory_service::InventoryStore;
use order_service::{OrderStore, DEFAULT_UNIT_PRICE};
use pretty_assertions::assert_eq;
use serde_json::json;
use shop_api::{create_router, AppState};
use shop_client::testing::TestServer;
use shop_client::{BackendClient, HttpShopBackend};
use shop_core::Product;
use shop_gateway::Aggregator;
use shop_proxy::UpstreamProxy;
use shop_trace::Tracer;
use user_service::UserStore;

// =============================================================================
// Harness
// =============================================================================

async fn start_users() -> TestServer {
    let state = user_service::AppState::new(UserStore::seeded(), Tracer::disabled("user-service"));
    TestServer::start(user_service::create_router(state))
        .await
        .unwrap()
}

async fn start_inventory(store: InventoryStore) -> TestServer {
    let state = inventory_service::AppState::new(store, Tracer::disabled("inventory-service"));
    TestServer::start(inventory_service::create_router(state))
        .await
        .unwrap()
}

async fn start_orders(users_url: &str, inventory_url: &str) -> TestServer {
    let state = order_service::AppState::new(
        OrderStore::seeded(),
        Tracer::disabled("order-service"),
        BackendClient::new("user-service", users_url).unwrap(),
        BackendClient::new("inventory-service", inventory_url).unwrap(),
    );
    TestServer::start(order_service::create_router(state))
        .await
        .unwrap()
}

async fn start_gateway(users_url: &str, orders_url: &str, inventory_url: &str) -> TestServer {
    let backend = HttpShopBackend::new(users_url, orders_url, inventory_url).unwrap();
    let aggregator = Aggregator::new(Arc::new(backend), Tracer::disabled("shopd"));

    let proxies = vec![
        Arc::new(UpstreamProxy::new("user-service", users_url, "/api/users", "/users").unwrap()),
        Arc::new(
            UpstreamProxy::new("order-service", orders_url, "/api/orders", "/orders").unwrap(),
        ),
        Arc::new(
            UpstreamProxy::new(
                "inventory-service",
                inventory_url,
                "/api/inventory",
                "/inventory",
            )
            .unwrap(),
        ),
    ];

    TestServer::start(create_router(AppState::new(aggregator), proxies))
        .await
        .unwrap()
}

/// The full stack: three backend services plus the gateway in front
struct Stack {
    gateway: TestServer,
    users: TestServer,
    orders: TestServer,
    inventory: TestServer,
}

impl Stack {
    async fn start() -> Self {
        Self::with_inventory(InventoryStore::seeded()).await
    }

    async fn with_inventory(store: InventoryStore) -> Self {
        let users = start_users().await;
        let inventory = start_inventory(store).await;
        let orders = start_orders(&users.base_url(), &inventory.base_url()).await;
        let gateway = start_gateway(
            &users.base_url(),
            &orders.base_url(),
            &inventory.base_url(),
        )
        .await;

        Self {
            gateway,
            users,
            orders,
            inventory,
        }
    }

    fn url(&self, path: &str) -> String {
        self.gateway.url(path)
    }
}

async fn get_json(url: String) -> (reqwest::StatusCode, serde_json::Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn every_tier_reports_healthy() {
    let stack = Stack::start().await;

    for (server, service) in [
        (&stack.gateway, "shopd"),
        (&stack.users, "user-service"),
        (&stack.orders, "order-service"),
        (&stack.inventory, "inventory-service"),
    ] {
        let (status, body) = get_json(server.url("/health")).await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], service);
    }
}

#[tokio::test]
async fn aggregates_a_user_with_enriched_orders() {
    let stack = Stack::start().await;

    let (status, body) = get_json(stack.url("/api/user/1/orders")).await;
    assert_eq!(status, 200);

    assert_eq!(body["user"]["id"], 1);
    assert_eq!(body["user"]["name"], "John Doe");
    assert_eq!(body["user"]["email"], "john@example.com");
    assert_eq!(body["total_orders"], 1);

    let order = &body["orders"][0];
    assert_eq!(order["id"], 1);
    assert_eq!(order["status"], "completed");

    let item = &order["items"][0];
    assert_eq!(item["product_id"], 101);
    assert_eq!(item["quantity"], 2);
    assert_eq!(item["product_details"]["name"], "Laptop");
    assert_eq!(item["product_details"]["price"], 999.99);
}

#[tokio::test]
async fn aggregate_filters_to_the_requested_user() {
    let stack = Stack::start().await;

    let (status, body) = get_json(stack.url("/api/user/2/orders")).await;
    assert_eq!(status, 200);

    assert_eq!(body["user"]["name"], "Jane Smith");
    assert_eq!(body["total_orders"], 1);
    assert_eq!(body["orders"][0]["id"], 2);
    assert_eq!(body["orders"][0]["user_id"], 2);
}

#[tokio::test]
async fn missing_product_degrades_that_item_only() {
    // the catalog knows the laptop but not the mouse from order 2
    let catalog = InventoryStore::new([Product::new(101, "Laptop", 50, 999.99)]);
    let stack = Stack::with_inventory(catalog).await;

    let (status, body) = get_json(stack.url("/api/user/2/orders")).await;
    assert_eq!(status, 200);
    assert_eq!(body["total_orders"], 1);
    assert_eq!(
        body["orders"][0]["items"][0]["product_details"],
        serde_json::Value::Null
    );

    // the other user's order still enriches
    let (_, body) = get_json(stack.url("/api/user/1/orders")).await;
    assert_eq!(
        body["orders"][0]["items"][0]["product_details"]["name"],
        "Laptop"
    );
}

#[tokio::test]
async fn unknown_user_is_a_404_with_an_opaque_body() {
    let stack = Stack::start().await;

    let (status, body) = get_json(stack.url("/api/user/999/orders")).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "User not found" }));
}

#[tokio::test]
async fn order_backend_outage_is_a_generic_500() {
    let users = start_users().await;
    let inventory = start_inventory(InventoryStore::seeded()).await;
    // nothing listens on the discard port
    let gateway = start_gateway(
        &users.base_url(),
        "http://127.0.0.1:9",
        &inventory.base_url(),
    )
    .await;

    let (status, body) = get_json(gateway.url("/api/user/1/orders")).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "error": "Failed to aggregate user orders" }));
}

#[tokio::test]
async fn proxies_surface_the_service_collections() {
    let stack = Stack::start().await;

    let (status, users) = get_json(stack.url("/api/users")).await;
    assert_eq!(status, 200);
    assert_eq!(users.as_array().unwrap().len(), 2);
    assert_eq!(users[0]["name"], "John Doe");

    let (status, products) = get_json(stack.url("/api/inventory")).await;
    assert_eq!(status, 200);
    assert_eq!(products.as_array().unwrap().len(), 3);

    let (status, orders) = get_json(stack.url("/api/orders")).await;
    assert_eq!(status, 200);
    assert_eq!(orders.as_array().unwrap().len(), 2);

    let (status, product) = get_json(stack.url("/api/inventory/103")).await;
    assert_eq!(status, 200);
    assert_eq!(product["name"], "Keyboard");
    assert_eq!(product["stock"], 75);
}

#[tokio::test]
async fn proxies_pass_service_errors_through() {
    let stack = Stack::start().await;

    let (status, body) = get_json(stack.url("/api/users/999")).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "User not found" }));

    let (status, body) = get_json(stack.url("/api/inventory/999")).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "Product not found" }));
}

#[tokio::test]
async fn creates_an_order_through_the_gateway() {
    let stack = Stack::start().await;

    let response = reqwest::Client::new()
        .post(stack.url("/api/orders"))
        .json(&json!({ "user_id": 1, "items": [{ "product_id": 101, "quantity": 2 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let order: serde_json::Value = response.json().await.unwrap();
    assert_eq!(order["id"], 3);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total"], json!(DEFAULT_UNIT_PRICE * 2.0));

    // the aggregate view picks the new order up immediately
    let (_, body) = get_json(stack.url("/api/user/1/orders")).await;
    assert_eq!(body["total_orders"], 2);
    assert_eq!(
        body["orders"][1]["items"][0]["product_details"]["name"],
        "Laptop"
    );
}

#[tokio::test]
async fn rejected_order_passes_back_through_the_gateway() {
    let stack = Stack::start().await;

    let response = reqwest::Client::new()
        .post(stack.url("/api/orders"))
        .json(&json!({ "user_id": 999, "items": [{ "product_id": 101, "quantity": 1 }] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid user" }));
}
