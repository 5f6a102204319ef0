//! HTTP transport seam
//!
//! Every API call goes through [`StoryTransport`]. Production uses
//! [`HttpTransport`] over reqwest; tests plug in [`crate::MockTransport`].
//! Transports report any received status as a response; mapping statuses
//! to errors happens in the client.

use crate::{StoryConfig, StoryError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Header selecting the chain
pub const CHAIN_HEADER: &str = "X-Chain";

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST with a JSON body
    Post,
}

/// A request relative to the API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path below the base URL, starting with `/`
    pub path: String,
    /// JSON body for POST
    pub body: Option<Value>,
}

impl ApiRequest {
    /// GET `path`
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    /// POST `body` to `path`
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Status and parsed body of a response
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Body as JSON; non-JSON text arrives as a JSON string
    pub body: Value,
}

impl ApiResponse {
    /// 200 with the given body
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    /// Bare status with a null body
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Value::Null,
        }
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request to the Story Protocol API
#[async_trait]
pub trait StoryTransport: Send + Sync {
    /// Send the request once; no retries at this layer
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, StoryError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with the key and chain headers preset
    pub fn new(config: &StoryConfig) -> Result<Self, StoryError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let value = HeaderValue::from_str(key)
                .map_err(|e| StoryError::InvalidRequest(format!("Invalid API key header: {}", e)))?;
            headers.insert(API_KEY_HEADER, value);
        }
        let chain = HeaderValue::from_str(&config.chain)
            .map_err(|e| StoryError::InvalidRequest(format!("Invalid chain header: {}", e)))?;
        headers.insert(CHAIN_HEADER, chain);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl StoryTransport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, StoryError> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(method = ?request.method, %url, "Sending Story API request");

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self
                .client
                .post(&url)
                .json(request.body.as_ref().unwrap_or(&Value::Null)),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(ApiResponse { status, body })
    }
}
