//! Seeded order store
//!
//! Orders live in a lock-guarded vector; ids are assigned from the
//! current length, so they stay dense and predictable for the demo
//! dataset.

use std::collections::HashMap;

use parking_lot::RwLock;
use shop_core::{Order, OrderItem};

/// Unit price assumed for items that do not carry one of their own
pub const DEFAULT_UNIT_PRICE: f64 = 25.99;

/// In-memory order records
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: RwLock<Vec<Order>>,
}

impl OrderStore {
    pub fn new(orders: Vec<Order>) -> Self {
        Self {
            orders: RwLock::new(orders),
        }
    }

    /// The fixed demo dataset
    pub fn seeded() -> Self {
        Self::new(vec![
            Order {
                id: 1,
                user_id: 1,
                items: vec![OrderItem::new(101, 2)],
                total: 99.98,
                status: "completed".to_string(),
                extra: HashMap::new(),
            },
            Order {
                id: 2,
                user_id: 2,
                items: vec![OrderItem::new(102, 1)],
                total: 49.99,
                status: "pending".to_string(),
                extra: HashMap::new(),
            },
        ])
    }

    /// All orders, in storage order
    pub fn all(&self) -> Vec<Order> {
        self.orders.read().clone()
    }

    /// Look up one order by id
    pub fn get(&self, id: u64) -> Option<Order> {
        self.orders.read().iter().find(|o| o.id == id).cloned()
    }

    /// Append a new order: next id, status `"pending"`, total summed
    /// from the items with [`DEFAULT_UNIT_PRICE`] standing in for items
    /// carrying no price of their own.
    pub fn append(&self, user_id: u64, items: Vec<OrderItem>) -> Order {
        let total = order_total(&items);
        let mut orders = self.orders.write();
        let order = Order {
            id: orders.len() as u64 + 1,
            user_id,
            items,
            total,
            status: "pending".to_string(),
            extra: HashMap::new(),
        };
        orders.push(order.clone());
        order
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }
}

fn order_total(items: &[OrderItem]) -> f64 {
    items
        .iter()
        .map(|item| item.unit_price().unwrap_or(DEFAULT_UNIT_PRICE) * f64::from(item.quantity))
        .sum()
}
