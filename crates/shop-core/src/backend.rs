//! ShopBackend trait - the seam between aggregation and transport
//!
//! The gateway's orchestration logic talks to the three upstream services
//! through this trait, so it can be exercised against in-memory fakes in
//! tests and against HTTP in production (`shop-client::HttpShopBackend`).

use async_trait::async_trait;

use crate::error::BackendResult;
use crate::models::{Order, Product, User};

/// Read access to the three upstream services the gateway aggregates.
///
/// All calls are single-shot: no retries, no caching. Failure semantics
/// are carried by [`crate::BackendError`].
#[async_trait]
pub trait ShopBackend: Send + Sync {
    /// Fetch one user by id
    async fn fetch_user(&self, user_id: u64) -> BackendResult<User>;

    /// Fetch the full order collection
    async fn fetch_orders(&self) -> BackendResult<Vec<Order>>;

    /// Fetch one product by id from the inventory backend
    async fn fetch_product(&self, product_id: u64) -> BackendResult<Product>;
}
