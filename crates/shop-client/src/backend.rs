//! HTTP implementation of the ShopBackend trait

use std::time::Duration;

use async_trait::async_trait;

use shop_core::{BackendError, BackendResult, Order, Product, ShopBackend, User};

use crate::client::BackendClient;
use crate::error::ClientError;
use crate::Result;

/// Talks to the three backend services over HTTP.
///
/// Each service gets its own [`BackendClient`] so the failure of one
/// never ties up another's connection pool.
#[derive(Debug, Clone)]
pub struct HttpShopBackend {
    users: BackendClient,
    orders: BackendClient,
    inventory: BackendClient,
}

impl HttpShopBackend {
    pub fn new(users_url: &str, orders_url: &str, inventory_url: &str) -> Result<Self> {
        Ok(Self {
            users: BackendClient::new("user-service", users_url)?,
            orders: BackendClient::new("order-service", orders_url)?,
            inventory: BackendClient::new("inventory-service", inventory_url)?,
        })
    }

    /// Create with custom per-call timeouts applied to all three clients
    pub fn with_timeouts(
        users_url: &str,
        orders_url: &str,
        inventory_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            users: BackendClient::with_config("user-service", users_url, timeout, connect_timeout)?,
            orders: BackendClient::with_config(
                "order-service",
                orders_url,
                timeout,
                connect_timeout,
            )?,
            inventory: BackendClient::with_config(
                "inventory-service",
                inventory_url,
                timeout,
                connect_timeout,
            )?,
        })
    }

    pub fn users(&self) -> &BackendClient {
        &self.users
    }

    pub fn orders(&self) -> &BackendClient {
        &self.orders
    }

    pub fn inventory(&self) -> &BackendClient {
        &self.inventory
    }
}

#[async_trait]
impl ShopBackend for HttpShopBackend {
    async fn fetch_user(&self, user_id: u64) -> BackendResult<User> {
        let path = format!("/users/{}", user_id);
        self.users
            .get_json(&path)
            .await
            .map_err(|e| to_backend_error(self.users.name(), &path, e))
    }

    async fn fetch_orders(&self) -> BackendResult<Vec<Order>> {
        let path = "/orders";
        self.orders
            .get_json(path)
            .await
            .map_err(|e| to_backend_error(self.orders.name(), path, e))
    }

    async fn fetch_product(&self, product_id: u64) -> BackendResult<Product> {
        let path = format!("/inventory/{}", product_id);
        self.inventory
            .get_json(&path)
            .await
            .map_err(|e| to_backend_error(self.inventory.name(), &path, e))
    }
}

/// Map a client error onto the backend error taxonomy. A 404 is the
/// backend reporting absence; everything else it answered with is
/// "unavailable", as are transport failures and timeouts.
fn to_backend_error(backend: &str, path: &str, err: ClientError) -> BackendError {
    match err {
        ClientError::NotFound { path, .. } => BackendError::not_found(backend, path),
        ClientError::Decode { path, detail } => BackendError::malformed(backend, path, detail),
        ClientError::Server { status, message } => {
            BackendError::unavailable(backend, path, format!("HTTP {}: {}", status, message))
        }
        ClientError::Http(e) => {
            let detail = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            };
            BackendError::unavailable(backend, path, detail)
        }
        ClientError::InvalidUrl(e) => BackendError::unavailable(backend, path, e.to_string()),
        ClientError::Io(e) => BackendError::unavailable(backend, path, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_backend_not_found() {
        let err = to_backend_error(
            "user-service",
            "/users/999",
            ClientError::NotFound {
                path: "/users/999".to_string(),
                message: "User not found".to_string(),
            },
        );
        assert!(err.is_not_found());
        assert_eq!(err.backend(), "user-service");
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn server_errors_map_to_unavailable() {
        let err = to_backend_error(
            "order-service",
            "/orders",
            ClientError::server_error(500, "boom"),
        );
        assert!(matches!(err, BackendError::Unavailable { .. }));
        assert_eq!(err.status_code(), 503);
    }

    #[test]
    fn decode_failures_map_to_malformed() {
        let err = to_backend_error(
            "inventory-service",
            "/inventory/101",
            ClientError::Decode {
                path: "/inventory/101".to_string(),
                detail: "expected value at line 1".to_string(),
            },
        );
        assert!(matches!(err, BackendError::Malformed { .. }));
        assert_eq!(err.status_code(), 502);
    }
}
