//! Seeded product catalog
//!
//! Keyed by product id; listing returns ascending id order, which the
//! fixtures and tests rely on.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use shop_core::Product;

/// In-memory product records
#[derive(Debug, Default)]
pub struct InventoryStore {
    products: RwLock<BTreeMap<u64, Product>>,
}

impl InventoryStore {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: RwLock::new(products.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    /// The fixed demo catalog
    pub fn seeded() -> Self {
        Self::new([
            Product::new(101, "Laptop", 50, 999.99),
            Product::new(102, "Mouse", 200, 49.99),
            Product::new(103, "Keyboard", 75, 79.99),
        ])
    }

    /// All products, ascending by id
    pub fn all(&self) -> Vec<Product> {
        self.products.read().values().cloned().collect()
    }

    /// Look up one product by id
    pub fn get(&self, id: u64) -> Option<Product> {
        self.products.read().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}
