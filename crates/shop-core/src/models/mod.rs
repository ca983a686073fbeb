//! Shared data models for the storefront services

mod aggregate;
mod order;
mod product;
mod user;

pub use aggregate::*;
pub use order::*;
pub use product::*;
pub use user::*;
