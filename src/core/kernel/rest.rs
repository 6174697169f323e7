use crate::core::errors::TransportError;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::{debug, instrument, trace};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A single outgoing HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// POST with a URL-form-encoded body, fields kept in the given order
    pub fn post_form(url: String, fields: Vec<(String, String)>) -> Result<Self, TransportError> {
        let body = serde_urlencoded::to_string(&fields).map_err(|e| {
            TransportError::Failed(format!("Failed to encode form body: {}", e))
        })?;

        Ok(Self {
            method: Method::POST,
            url,
            headers: vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())],
            body: body.into_bytes(),
        })
    }

    /// POST with a JSON body
    pub fn post_json(url: String, payload: &serde_json::Value) -> Result<Self, TransportError> {
        let body = serde_json::to_vec(payload).map_err(|e| {
            TransportError::Failed(format!("Failed to serialize request body: {}", e))
        })?;

        Ok(Self {
            method: Method::POST,
            url,
            headers: vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())],
            body,
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Raw transport outcome: status code and body, not yet interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport collaborator: performs exactly one HTTP exchange per call.
///
/// Implementations must report timeouts as [`TransportError::TimedOut`] and
/// must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}

/// Configuration for the reqwest transport
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("anypay-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Implementation of `Transport` using reqwest
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| TransportError::Failed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Wrap an existing reqwest client, e.g. one shared with the rest of an application
    pub fn with_client(client: Client, config: TransportConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn map_error(error: &reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::TimedOut
        } else {
            TransportError::Failed(error.to_string())
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!(body_len = request.body.len(), "sending request");

        let mut builder = self.client.request(request.method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| Self::map_error(&e))?;

        trace!(status, "Response body: {}", body);

        Ok(HttpResponse { status, body })
    }
}
