//! Seeded user store
//!
//! The demo stand-in for a user database: a lock-guarded vector holding
//! the fixed records the rest of the stack expects.

use parking_lot::RwLock;
use shop_core::User;

/// In-memory user records
#[derive(Debug, Default)]
pub struct UserStore {
    users: RwLock<Vec<User>>,
}

impl UserStore {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: RwLock::new(users),
        }
    }

    /// The fixed demo dataset
    pub fn seeded() -> Self {
        Self::new(vec![
            User::new(1, "John Doe", "john@example.com"),
            User::new(2, "Jane Smith", "jane@example.com"),
        ])
    }

    /// All users, in storage order
    pub fn all(&self) -> Vec<User> {
        self.users.read().clone()
    }

    /// Look up one user by id
    pub fn get(&self, id: u64) -> Option<User> {
        self.users.read().iter().find(|u| u.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}
