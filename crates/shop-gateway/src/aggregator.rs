//! Aggregator - composes one user's order view from three backends
//!
//! The pipeline is strictly ordered: fetch the user, fetch the order
//! collection, filter it down to the user's orders, enrich the line items
//! from inventory, assemble. The first two steps abort the request on
//! failure; enrichment never does.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use shop_core::models::{EnrichedOrder, EnrichedOrderItem, Order, OrderItem, UserOrders};
use shop_core::ShopBackend;
use shop_trace::Tracer;
use tracing::warn;

use crate::error::{AggregateError, AggregateResult};

/// Upper bound on in-flight inventory lookups per order
const ENRICH_CONCURRENCY: usize = 4;

/// Orchestrates the user-orders aggregation.
///
/// Holds no per-request state; one instance serves all requests
/// concurrently. The backend seam makes the whole pipeline testable
/// against in-memory fakes.
#[derive(Clone)]
pub struct Aggregator {
    backend: Arc<dyn ShopBackend>,
    tracer: Tracer,
}

impl Aggregator {
    pub fn new(backend: Arc<dyn ShopBackend>, tracer: Tracer) -> Self {
        Self { backend, tracer }
    }

    /// Build the composite "user with enriched orders" view.
    ///
    /// The whole operation runs under a `get_user_orders_aggregate` span
    /// that ends on every exit path. Upstream failures are recorded on
    /// the span before being classified; the caller only ever sees the
    /// [`AggregateError`] taxonomy.
    pub async fn user_orders(&self, user_id: u64) -> AggregateResult<UserOrders> {
        let mut span = self.tracer.span("get_user_orders_aggregate");
        span.set_attributes([
            ("user.id", serde_json::json!(user_id)),
            ("operation.type", serde_json::json!("aggregate")),
        ]);

        let user = match self.backend.fetch_user(user_id).await {
            Ok(user) => user,
            Err(e) => {
                span.record_exception(&e);
                let err = if e.is_not_found() {
                    AggregateError::EntityNotFound { user_id }
                } else {
                    AggregateError::UpstreamUnavailable { source: e }
                };
                span.set_status_error(err.to_string());
                return Err(err);
            }
        };

        let orders = match self.backend.fetch_orders().await {
            Ok(orders) => orders,
            Err(e) => {
                span.record_exception(&e);
                let err = AggregateError::UpstreamUnavailable { source: e };
                span.set_status_error(err.to_string());
                return Err(err);
            }
        };

        let own_orders: Vec<Order> = orders
            .into_iter()
            .filter(|order| order.user_id == user_id)
            .collect();

        let mut enriched = Vec::with_capacity(own_orders.len());
        for order in own_orders {
            enriched.push(self.enrich_order(order).await);
        }

        let result = UserOrders::new(user, enriched);

        span.set_attribute("user.orders_count", result.total_orders as u64);
        if let Ok(body) = serde_json::to_vec(&result) {
            span.set_attribute("response.size", body.len() as u64);
        }
        span.set_status_ok();

        Ok(result)
    }

    async fn enrich_order(&self, order: Order) -> EnrichedOrder {
        let Order {
            id,
            user_id,
            items,
            total,
            status,
            extra,
        } = order;
        let items = self.enrich_items(items).await;
        EnrichedOrder {
            id,
            user_id,
            items,
            total,
            status,
            extra,
        }
    }

    /// Attach product details to each line item.
    ///
    /// Lookups run concurrently (at most [`ENRICH_CONCURRENCY`] in
    /// flight) but the output keeps the input order. A failed lookup
    /// degrades exactly that item to `product_details: null`; the batch
    /// itself cannot fail.
    async fn enrich_items(&self, items: Vec<OrderItem>) -> Vec<EnrichedOrderItem> {
        stream::iter(items)
            .map(|item| {
                let backend = Arc::clone(&self.backend);
                async move {
                    let mut enriched = EnrichedOrderItem::from(item);
                    match backend.fetch_product(enriched.product_id).await {
                        Ok(product) => enriched.product_details = Some(product),
                        Err(e) => {
                            warn!(
                                product_id = enriched.product_id,
                                error = %e,
                                "Failed to fetch product details"
                            );
                        }
                    }
                    enriched
                }
            })
            .buffered(ENRICH_CONCURRENCY)
            .collect()
            .await
    }
}
