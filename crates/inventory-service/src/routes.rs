//! Route handlers
//!
//! Each handler records one span per request; the by-product lookup
//! also attaches the stock level and name when the product exists.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::Rng;
use serde_json::json;
use shop_core::Product;

use crate::AppState;

pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy", "service": "inventory-service" }))
}

pub(crate) async fn get_inventory(State(state): State<AppState>) -> Json<Vec<Product>> {
    let mut span = state.tracer.span("get_all_inventory");

    simulate_query(state.max_query_delay_ms).await;

    let products = state.store.all();
    span.set_attributes([
        ("inventory.items_count", json!(products.len())),
        ("operation.type", json!("read")),
    ]);

    Json(products)
}

pub(crate) async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
) -> Response {
    let mut span = state.tracer.span("get_inventory_by_product");
    span.set_attributes([
        ("product.id", json!(product_id)),
        ("operation.type", json!("read")),
    ]);

    simulate_query(state.max_query_delay_ms).await;

    match state.store.get(product_id) {
        Some(product) => {
            span.set_attribute("product.stock", product.stock);
            span.set_attribute("product.name", product.name.as_str());
            Json(product).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Product not found" })),
        )
            .into_response(),
    }
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

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use shop_client::testing::TestServer;
    use shop_trace::Tracer;

    use super::*;
    use crate::{create_router, InventoryStore};

    async fn serve() -> TestServer {
        let state = AppState::new(InventoryStore::seeded(), Tracer::disabled("inventory-service"));
        TestServer::start(create_router(state)).await.unwrap()
    }

    #[tokio::test]
    async fn health_reports_the_service_name() {
        let server = serve().await;

        let body: serde_json::Value = reqwest::get(server.url("/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(
            body,
            json!({ "status": "healthy", "service": "inventory-service" })
        );
    }

    #[tokio::test]
    async fn lists_the_catalog_in_id_order() {
        let server = serve().await;

        let products: Vec<Product> = reqwest::get(server.url("/inventory"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let ids: Vec<u64> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, [101, 102, 103]);
    }

    #[tokio::test]
    async fn fetches_one_product() {
        let server = serve().await;

        let product: Product = reqwest::get(server.url("/inventory/101"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(product.name, "Laptop");
        assert_eq!(product.price, 999.99);
    }

    #[tokio::test]
    async fn unknown_product_is_a_404() {
        let server = serve().await;

        let response = reqwest::get(server.url("/inventory/999")).await.unwrap();
        assert_eq!(response.status(), 404);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "error": "Product not found" }));
    }

    #[tokio::test]
    async fn lookup_span_carries_stock_and_name() {
        let (tracer, exporter) = Tracer::with_memory("inventory-service");
        let state = AppState::new(InventoryStore::seeded(), tracer);
        let server = TestServer::start(create_router(state)).await.unwrap();

        reqwest::get(server.url("/inventory/103")).await.unwrap();

        let spans = exporter.finished();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, "get_inventory_by_product");
        assert_eq!(spans[0].attributes["product.id"], json!(103));
        assert_eq!(spans[0].attributes["product.stock"], json!(75));
        assert_eq!(spans[0].attributes["product.name"], json!("Keyboard"));
    }
}
