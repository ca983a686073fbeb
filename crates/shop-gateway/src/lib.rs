//! shop-gateway - Order aggregation core
//!
//! This crate implements the gateway's composite read: one user's orders,
//! enriched with product details, assembled from the three backend
//! services behind the [`ShopBackend`] seam.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Aggregator                          │
//! │                                                            │
//! │  fetch user ──▶ fetch orders ──▶ filter ──▶ enrich items   │
//! │      │               │                          │          │
//! │      ▼               ▼                          ▼          │
//! │  user-service   order-service          inventory-service   │
//! │  (abort on      (abort on              (per-item failure   │
//! │   failure)       failure)               degrades to null)  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The whole pipeline runs under a single `get_user_orders_aggregate`
//! span; enrichment failures surface only as a `null` product and a
//! warning log, never as a request failure.
//!
//! # Usage
//!
//! ```rust,ignore
//! use shop_gateway::Aggregator;
//!
//! let backend = Arc::new(HttpShopBackend::new(users_url, orders_url, inventory_url)?);
//! let aggregator = Aggregator::new(backend, tracer);
//!
//! let view = aggregator.user_orders(1).await?;
//! // view.total_orders == view.orders.len()
//! ```

mod aggregator;
mod error;

pub use aggregator::Aggregator;
pub use error::{AggregateError, AggregateResult};

// Re-export core types for convenience
pub use shop_core::{BackendError, BackendResult, ShopBackend, UserOrders};
