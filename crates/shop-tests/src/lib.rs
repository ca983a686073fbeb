//! Integration tests for the storefront gateway stack
//!
//! This crate contains end-to-end tests that exercise the full stack in
//! one process: the three backend services on real listeners, the
//! gateway wired against them over HTTP, and assertions on both the
//! client-visible responses and the spans the tiers record.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shop-tests
//! ```
//!
//! # Test Structure
//!
//! - `stack_e2e_test.rs` - Gateway + real services over HTTP
//! - `tracing_e2e_test.rs` - Span capture across the tiers

// This crate only contains tests, no library code
