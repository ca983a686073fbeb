//! Backend HTTP client implementation

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ClientError, Result};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Error body shape the backend services reply with
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Typed HTTP client for one backend service.
///
/// One call, one result: no retries. Timeouts surface as transport
/// errors like any other connection failure.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    name: String,
}

impl BackendClient {
    /// Create a client with default timeouts
    ///
    /// # Arguments
    /// * `name` - Backend name used in diagnostics (e.g., "user-service")
    /// * `base_url` - Base URL of the service (e.g., "http://localhost:3001")
    pub fn new(name: &str, base_url: &str) -> Result<Self> {
        Self::with_config(name, base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a client with custom timeouts
    pub fn with_config(
        name: &str,
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;

        let base_url = Url::parse(base_url)?;

        Ok(Self {
            client,
            base_url,
            name: name.to_string(),
        })
    }

    /// Backend name used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET a resource and decode the JSON body
    #[instrument(skip(self), fields(backend = %self.name))]
    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        self.handle_response(path, response).await
    }

    /// POST a JSON body and decode the JSON response
    #[instrument(skip(self, body), fields(backend = %self.name))]
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let url = self.base_url.join(path)?;
        debug!("POST {}", url);

        let response = self.client.post(url).json(body).send().await?;
        self.handle_response(path, response).await
    }

    /// GET a resource and return only the response status. Transport
    /// failures still surface as errors.
    #[instrument(skip(self), fields(backend = %self.name))]
    pub async fn get_status(&self, path: &str) -> Result<StatusCode> {
        let url = self.base_url.join(path)?;
        let response = self.client.get(url).send().await?;
        Ok(response.status())
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| ClientError::Decode {
                path: path.to_string(),
                detail: e.to_string(),
            })
        } else {
            Err(self.extract_error_from_status(path, response, status).await)
        }
    }

    async fn extract_error_from_status(
        &self,
        path: &str,
        response: reqwest::Response,
        status: StatusCode,
    ) -> ClientError {
        // Try to parse the error response body
        let message = match response.json::<ErrorResponse>().await {
            Ok(err) => err.error,
            Err(_) => format!("HTTP {}", status),
        };

        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound {
                path: path.to_string(),
                message,
            },
            _ => ClientError::server_error(status.as_u16(), message),
        }
    }
}
