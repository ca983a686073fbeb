//! shop-core - Core traits and types for the storefront gateway
//!
//! This crate provides the fundamental abstractions shared by the gateway
//! and the backend services: the wire-level data models, the error taxonomy
//! for upstream calls, and the `ShopBackend` trait that decouples the
//! aggregation logic from HTTP transport.

pub mod backend;
pub mod error;
pub mod models;

pub use backend::ShopBackend;
pub use error::{BackendError, BackendResult};
pub use models::*;
