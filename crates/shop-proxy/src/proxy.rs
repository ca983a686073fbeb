//! UpstreamProxy - forwards one route prefix to one backend service

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Bytes};
use axum::extract::{Request, State};
use axum::http::header::{self, HeaderMap, HeaderName};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Total time budget for one forwarded request
const FORWARD_TIMEOUT: Duration = Duration::from_secs(30);
/// Connection timeout towards the upstream
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
/// Largest request body the proxy will buffer
const MAX_FORWARD_BODY: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Forwards requests under one route prefix to a backend service,
/// rewriting the prefix on the way through.
///
/// `/api/users/1` with prefix `/api/users` and rewrite `/users` becomes
/// `{base_url}/users/1`. Everything else passes through unchanged:
/// method, query string, body, and all end-to-end headers. The upstream
/// response (status, headers, body) is returned verbatim; only an
/// unreachable upstream is answered by the proxy itself, with 502.
pub struct UpstreamProxy {
    name: String,
    client: reqwest::Client,
    base_url: Url,
    prefix: String,
    rewrite: String,
}

impl UpstreamProxy {
    /// # Arguments
    /// * `name` - Upstream name used in diagnostics (e.g., "user-service")
    /// * `base_url` - Base URL of the service (e.g., "http://localhost:3001")
    /// * `prefix` - Route prefix this proxy is mounted on (e.g., "/api/users")
    /// * `rewrite` - Replacement prefix on the upstream (e.g., "/users")
    pub fn new(
        name: &str,
        base_url: &str,
        prefix: &str,
        rewrite: &str,
    ) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(FORWARD_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            name: name.to_string(),
            client,
            base_url: Url::parse(base_url)?,
            prefix: prefix.to_string(),
            rewrite: rewrite.to_string(),
        })
    }

    /// Route prefix this proxy serves
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Forward one request to the upstream.
    ///
    /// Never returns an error: upstream failures become a 502 response.
    pub async fn forward(&self, req: Request) -> Response {
        let (parts, body) = req.into_parts();

        let url = match self.rewrite_url(parts.uri.path(), parts.uri.query()) {
            Ok(url) => url,
            Err(e) => {
                warn!(upstream = %self.name, error = %e, "Failed to build upstream URL");
                return unreachable_response();
            }
        };

        let body = match to_bytes(body, MAX_FORWARD_BODY).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(upstream = %self.name, error = %e, "Failed to read request body");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "error": "unreadable request body" })),
                )
                    .into_response();
            }
        };

        debug!(upstream = %self.name, method = %parts.method, url = %url, "Forwarding request");

        let mut request = self
            .client
            .request(parts.method, url)
            .headers(request_headers(&parts.headers));
        if !body.is_empty() {
            request = request.body(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(upstream = %self.name, error = %e, "Upstream request failed");
                return unreachable_response();
            }
        };

        let status = response.status();
        let headers = response_headers(response.headers());
        let body: Bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(upstream = %self.name, error = %e, "Failed to read upstream response");
                return unreachable_response();
            }
        };

        (status, headers, body).into_response()
    }

    fn rewrite_url(&self, path: &str, query: Option<&str>) -> Result<Url, url::ParseError> {
        let suffix = path.strip_prefix(&self.prefix).unwrap_or("");
        let mut url = self.base_url.join(&format!("{}{}", self.rewrite, suffix))?;
        url.set_query(query);
        Ok(url)
    }
}

/// Mount a proxy on its prefix (with and without a trailing path)
pub fn proxy_router(proxy: Arc<UpstreamProxy>) -> Router {
    let prefix = proxy.prefix.clone();
    Router::new()
        .route(&prefix, any(forward_handler))
        .route(&format!("{prefix}/{{*rest}}"), any(forward_handler))
        .with_state(proxy)
}

async fn forward_handler(State(proxy): State<Arc<UpstreamProxy>>, req: Request) -> Response {
    proxy.forward(req).await
}

fn unreachable_response() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(serde_json::json!({ "error": "upstream unreachable" })),
    )
        .into_response()
}

/// Headers that describe the connection rather than the message.
/// These never cross the proxy in either direction.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    name == header::CONNECTION
        || name == header::TE
        || name == header::TRAILER
        || name == header::TRANSFER_ENCODING
        || name == header::UPGRADE
        || name == header::PROXY_AUTHENTICATE
        || name == header::PROXY_AUTHORIZATION
        || name.as_str() == "keep-alive"
}

fn request_headers(original: &HeaderMap) -> HeaderMap {
    original
        .iter()
        .filter(|(name, _)| {
            // the client library derives host and content-length itself
            !is_hop_by_hop(name) && *name != header::HOST && *name != header::CONTENT_LENGTH
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

fn response_headers(upstream: &HeaderMap) -> HeaderMap {
    upstream
        .iter()
        .filter(|(name, _)| {
            // framing is recomputed when the response is re-serialized
            !is_hop_by_hop(name) && *name != header::CONTENT_LENGTH
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use axum::extract::{Path, RawQuery};
    use axum::routing::{get, post};
    use pretty_assertions::assert_eq;
    use shop_client::testing::TestServer;

    use super::*;

    fn upstream_router() -> Router {
        Router::new()
            .route(
                "/users/{id}",
                get(|Path(id): Path<u64>| async move {
                    if id == 1 {
                        Json(serde_json::json!({ "id": 1, "name": "John Doe" })).into_response()
                    } else {
                        (
                            StatusCode::NOT_FOUND,
                            Json(serde_json::json!({ "error": "User not found" })),
                        )
                            .into_response()
                    }
                }),
            )
            .route(
                "/orders",
                post(
                    |RawQuery(query): RawQuery, headers: HeaderMap, body: Bytes| async move {
                        Json(serde_json::json!({
                            "query": query,
                            "content_type": headers
                                .get(header::CONTENT_TYPE)
                                .and_then(|v| v.to_str().ok()),
                            "body_len": body.len(),
                        }))
                    },
                ),
            )
    }

    async fn proxied(prefix: &str, rewrite: &str) -> (TestServer, TestServer) {
        let upstream = TestServer::start(upstream_router()).await.unwrap();
        let proxy = Arc::new(
            UpstreamProxy::new("test-upstream", &upstream.base_url(), prefix, rewrite).unwrap(),
        );
        let front = TestServer::start(proxy_router(proxy)).await.unwrap();
        (upstream, front)
    }

    #[tokio::test]
    async fn rewrites_the_prefix_and_forwards() {
        let (_upstream, front) = proxied("/api/users", "/users").await;

        let response = reqwest::get(front.url("/api/users/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["name"], "John Doe");
    }

    #[tokio::test]
    async fn passes_the_upstream_status_and_body_through() {
        let (_upstream, front) = proxied("/api/users", "/users").await;

        let response = reqwest::get(front.url("/api/users/999")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn forwards_method_query_and_body() {
        let (_upstream, front) = proxied("/api/orders", "/orders").await;

        let client = reqwest::Client::new();
        let response = client
            .post(front.url("/api/orders?dry_run=true"))
            .json(&serde_json::json!({ "user_id": 1, "items": [] }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["query"], "dry_run=true");
        assert_eq!(body["content_type"], "application/json");
        assert!(body["body_len"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn unreachable_upstream_becomes_a_502() {
        // port 9 (discard) is not listening
        let proxy = Arc::new(
            UpstreamProxy::new("dead-upstream", "http://127.0.0.1:9", "/api/users", "/users")
                .unwrap(),
        );
        let front = TestServer::start(proxy_router(proxy)).await.unwrap();

        let response = reqwest::get(front.url("/api/users/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "upstream unreachable");
    }

    #[tokio::test]
    async fn bare_prefix_maps_to_the_rewrite_root() {
        let (_upstream, front) = proxied("/api/orders", "/orders").await;

        let client = reqwest::Client::new();
        let response = client
            .post(front.url("/api/orders"))
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["query"], serde_json::Value::Null);
    }
}
