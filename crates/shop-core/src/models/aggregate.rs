//! Composite result models for the aggregate endpoint
//!
//! These mirror the order models but make the enrichment state explicit:
//! every item in an [`EnrichedOrder`] carries a `product_details` field,
//! serialized even when enrichment failed. Clients must treat a `null`
//! there as "unknown", not as an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Order, OrderItem, Product, User};

/// An order line item after enrichment.
///
/// `product_details` is always present in the serialized form; `None`
/// means the inventory lookup for this product failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedOrderItem {
    pub product_id: u64,
    pub quantity: u32,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub product_details: Option<Product>,
}

impl From<OrderItem> for EnrichedOrderItem {
    fn from(item: OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
            extra: item.extra,
            product_details: None,
        }
    }
}

/// An order whose items have been through enrichment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedOrder {
    pub id: u64,
    pub user_id: u64,
    pub items: Vec<EnrichedOrderItem>,
    pub total: f64,
    pub status: String,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl From<Order> for EnrichedOrder {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            items: order.items.into_iter().map(Into::into).collect(),
            total: order.total,
            status: order.status,
            extra: order.extra,
        }
    }
}

/// The composite "user with orders" view returned by the aggregate endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserOrders {
    pub user: User,
    pub orders: Vec<EnrichedOrder>,
    pub total_orders: usize,
}

impl UserOrders {
    /// Assemble the composite result. `total_orders` is derived from the
    /// order list, never supplied by the caller.
    pub fn new(user: User, orders: Vec<EnrichedOrder>) -> Self {
        let total_orders = orders.len();
        Self {
            user,
            orders,
            total_orders,
        }
    }
}
