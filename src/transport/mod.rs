//! HTTP transport layer.
//!
//! The transport moves bytes and nothing else: it hands status, headers and
//! body back to the [`ApiCaller`](crate::api_caller::ApiCaller), which owns
//! every Slack-specific interpretation. Only network failures become errors
//! here.

use crate::errors::{NetworkError, SlackError, SlackResult};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// HTTP transport trait for making API requests
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one request and return the raw response
    async fn send(&self, request: HttpRequest) -> SlackResult<HttpResponse>;
}

/// Request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document
    Json(Value),
    /// Opaque bytes with their content type
    Bytes {
        /// Body content
        content: Bytes,
        /// MIME type
        content_type: String,
    },
}

/// Outbound request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Request headers
    pub headers: HeaderMap,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// Request body
    pub body: Option<RequestBody>,
    /// Request timeout
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Create a request with no body
    pub fn new(method: Method, url: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            method,
            url: url.into(),
            headers,
            query: Vec::new(),
            body: None,
            timeout: None,
        }
    }

    /// Attach a JSON body
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Attach a raw body
    pub fn bytes(mut self, content: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Bytes {
            content: content.into(),
            content_type: content_type.into(),
        });
        self
    }

    /// Append query parameters
    pub fn query(mut self, query: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(query);
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// JSON body, if any
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Some(RequestBody::Json(value)) => Some(value),
            _ => None,
        }
    }
}

/// Raw response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Content type header, if present
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }
}

/// Default HTTP transport implementation using reqwest
pub struct ReqwestTransport {
    client: Client,
    default_timeout: Duration,
}

impl ReqwestTransport {
    /// Create a new transport with the given timeout
    pub fn new(timeout: Duration) -> SlackResult<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|e| SlackError::Network(NetworkError::Http(e.to_string())))?;

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    /// Create a new transport with a pre-built client
    pub fn with_client(client: Client, default_timeout: Duration) -> Self {
        Self {
            client,
            default_timeout,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method))]
    async fn send(&self, request: HttpRequest) -> SlackResult<HttpResponse> {
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .timeout(timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match request.body {
            Some(RequestBody::Json(body)) => builder.json(&body),
            Some(RequestBody::Bytes {
                content,
                content_type,
            }) => builder
                .header(http::header::CONTENT_TYPE, content_type)
                .body(content),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| SlackError::Network(NetworkError::from(e)))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| SlackError::Network(NetworkError::from(e)))?;

        debug!(status = %status, bytes = body.len(), "Received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::new(Method::GET, "https://slack.com/api/test", HeaderMap::new())
            .query([("count".to_string(), "10".to_string())])
            .with_timeout(Duration::from_secs(5));

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query.len(), 1);
        assert!(request.body.is_none());
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_json_body() {
        let request = HttpRequest::new(Method::POST, "https://slack.com/api/test", HeaderMap::new())
            .json(json!({"channel": "C123"}));

        assert_eq!(request.json_body(), Some(&json!({"channel": "C123"})));
    }

    #[test]
    fn test_bytes_body_is_not_json() {
        let request = HttpRequest::new(Method::POST, "https://files.slack.com/upload", HeaderMap::new())
            .bytes(b"hello".to_vec(), "text/plain");

        assert!(request.json_body().is_none());
        assert!(matches!(request.body, Some(RequestBody::Bytes { .. })));
    }
}
