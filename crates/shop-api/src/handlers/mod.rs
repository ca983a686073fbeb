//! Request handlers for the gateway API

pub mod aggregate;
pub mod health;
