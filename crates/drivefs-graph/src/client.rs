//! Microsoft Graph API client
//!
//! Thin authenticated wrapper around `reqwest::Client`. Every request gets a
//! fresh bearer token from the configured [`ITokenSource`], and every answer
//! with a status >= 400 is turned into [`GraphError::RequestFailed`]. No
//! retries are attempted.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use drivefs_core::domain::Credentials;
//! use drivefs_graph::{GraphClient, StaticToken};
//! use reqwest::Method;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let credentials = Credentials::new("client", "tenant", "secret", "user@example.com")?;
//! let client = GraphClient::new(&credentials, Arc::new(StaticToken::new("token")));
//! let url = client.resolver().item_url("docs/report.pdf");
//! let item = client.send_json(Method::GET, &url, None).await?;
//! println!("{:?}", item.get("size"));
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use drivefs_core::config::DEFAULT_API_BASE_URL;
use drivefs_core::domain::Credentials;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::auth::ITokenSource;
use crate::paths::PathResolver;
use crate::GraphError;

/// Request payload variants
pub enum RequestBody {
    Empty,
    Json(Value),
    /// Raw bytes sent as `application/octet-stream`
    Binary(reqwest::Body),
}

/// HTTP client for one user's drive
pub struct GraphClient {
    client: Client,
    resolver: PathResolver,
    tokens: Arc<dyn ITokenSource>,
    user_id: String,
}

impl GraphClient {
    /// Creates a client against the public Graph endpoint
    pub fn new(credentials: &Credentials, tokens: Arc<dyn ITokenSource>) -> Self {
        Self::with_base_url(credentials, tokens, DEFAULT_API_BASE_URL)
    }

    /// Creates a client with a custom API base URL (useful for testing)
    pub fn with_base_url(
        credentials: &Credentials,
        tokens: Arc<dyn ITokenSource>,
        base_url: impl AsRef<str>,
    ) -> Self {
        Self {
            client: Client::new(),
            resolver: PathResolver::new(
                base_url.as_ref(),
                credentials.user_id(),
                credentials.base_path(),
            ),
            tokens,
            user_id: credentials.user_id().to_string(),
        }
    }

    /// Replaces the underlying HTTP client (timeouts, proxies)
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Owner of the drive this client talks to
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Sends an authenticated request and maps failing statuses
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        body: RequestBody,
    ) -> Result<Response, GraphError> {
        let token = self.tokens.access_token().await?;

        debug!(%method, url, "Sending Graph request");

        let builder = self.client.request(method, url).bearer_auth(token);
        let builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Binary(bytes) => builder
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(bytes),
        };

        let response = builder.send().await?;
        let status = response.status();

        if status.as_u16() >= 400 {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
            debug!(status = status.as_u16(), "Graph request failed");
            return Err(GraphError::RequestFailed {
                status: Some(status),
                body,
            });
        }

        Ok(response)
    }

    /// Sends a request and decodes the answer as a JSON object
    ///
    /// An empty body (204, 202) decodes to an empty map.
    pub async fn send_json(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<Map<String, Value>, GraphError> {
        let body = body.map(RequestBody::Json).unwrap_or(RequestBody::Empty);
        let response = self.execute(method, url, body).await?;
        let bytes = response.bytes().await?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(GraphError::InvalidResponse(format!(
                "expected a JSON object, got {other}"
            ))),
            Err(e) => Err(GraphError::InvalidResponse(e.to_string())),
        }
    }

    /// Sends a request and deserializes the JSON answer into `T`
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<Value>,
    ) -> Result<T, GraphError> {
        let map = self.send_json(method, url, body).await?;
        serde_json::from_value(Value::Object(map))
            .map_err(|e| GraphError::InvalidResponse(e.to_string()))
    }
}
