//! shop-client - HTTP client for the storefront backend services
//!
//! Provides [`BackendClient`], a thin typed wrapper over `reqwest` with
//! per-call timeouts and a uniform error taxonomy, and
//! [`HttpShopBackend`], which implements the `ShopBackend` trait over the
//! three backend services.
//!
//! # Example
//!
//! ```rust,no_run
//! use shop_client::HttpShopBackend;
//! use shop_core::ShopBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = HttpShopBackend::new(
//!         "http://localhost:3001",
//!         "http://localhost:3002",
//!         "http://localhost:3003",
//!     )?;
//!
//!     let user = backend.fetch_user(1).await?;
//!     println!("{} <{}>", user.name, user.email);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod client;
pub mod error;
pub mod testing;

pub use backend::HttpShopBackend;
pub use client::BackendClient;
pub use error::{ClientError, Result};
