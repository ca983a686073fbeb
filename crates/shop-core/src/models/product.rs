//! Product (inventory) models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A product record as served by the inventory backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: u64,
    /// Display name
    pub name: String,
    /// Units in stock
    pub stock: u32,
    /// Unit price
    pub price: f64,
    /// Additional backend-defined fields, passed through as-is
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Product {
    pub fn new(id: u64, name: impl Into<String>, stock: u32, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            stock,
            price,
            extra: HashMap::new(),
        }
    }
}
