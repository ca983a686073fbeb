//! shop-proxy - Passthrough routes to the backend services
//!
//! The gateway exposes each backend service directly under an `/api`
//! prefix, next to the aggregated view. These routes are plain
//! passthroughs: the prefix is rewritten, the rest of the request is
//! forwarded as-is, and the upstream's response comes back verbatim.
//!
//! | Mounted at       | Forwards to                      |
//! |------------------|----------------------------------|
//! | `/api/users`     | user-service `/users`            |
//! | `/api/orders`    | order-service `/orders`          |
//! | `/api/inventory` | inventory-service `/inventory`   |
//!
//! An unreachable upstream is the only failure the proxy answers for
//! itself (502); everything else, including upstream error statuses,
//! passes through.

mod proxy;

pub use proxy::{proxy_router, ProxyError, UpstreamProxy};
