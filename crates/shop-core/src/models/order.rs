//! Order models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An order record as served by the order backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier
    pub id: u64,
    /// Owning user (foreign key into the user backend)
    pub user_id: u64,
    /// Line items, in the order the backend stores them
    pub items: Vec<OrderItem>,
    /// Order total
    pub total: f64,
    /// Order status (e.g., "pending", "completed")
    pub status: String,
    /// Additional backend-defined fields, passed through as-is
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A single line item within an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product this line refers to
    pub product_id: u64,
    /// Ordered quantity
    pub quantity: u32,
    /// Additional backend-defined fields (e.g., a unit price override)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl OrderItem {
    pub fn new(product_id: u64, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
            extra: HashMap::new(),
        }
    }

    /// Unit price carried on the item itself, if the backend included one
    pub fn unit_price(&self) -> Option<f64> {
        self.extra.get("price").and_then(|v| v.as_f64())
    }
}
