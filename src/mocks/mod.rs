//! Mock implementations for testing.
//!
//! [`MockHttpTransport`] stands in for the network. Responses come from a
//! FIFO queue first, then from endpoint routes, then from an optional
//! default. Every request is recorded so tests can assert call counts and
//! payloads.

use crate::errors::{NetworkError, ResponseError, SlackError, SlackResult};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, RequestBody};
use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;

/// Mock response configuration
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
    /// Content type header
    pub content_type: Option<String>,
    /// Network failure to report instead of a response
    pub network_error: Option<String>,
}

impl MockResponse {
    /// JSON response with an explicit status
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Bytes::from(body.to_string()),
            content_type: Some("application/json".to_string()),
            network_error: None,
        }
    }

    /// Successful Web API response; adds `"ok": true` unless already set
    pub fn ok_json(mut body: Value) -> Self {
        if let Value::Object(map) = &mut body {
            map.entry("ok").or_insert(Value::Bool(true));
        }
        Self::json(200, body)
    }

    /// Create a Slack API error response
    pub fn slack_error(error_code: &str) -> Self {
        Self::json(200, serde_json::json!({"ok": false, "error": error_code}))
    }

    /// HTTP failure with a Web API style error body
    pub fn http_error(status: u16, error_code: &str) -> Self {
        Self::json(status, serde_json::json!({"ok": false, "error": error_code}))
    }

    /// Plain text response
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: Bytes::from(body.to_string()),
            content_type: Some("text/plain".to_string()),
            network_error: None,
        }
    }

    /// Raw bytes response
    pub fn bytes(content: impl Into<Bytes>, content_type: &str) -> Self {
        Self {
            status: 200,
            body: content.into(),
            content_type: Some(content_type.to_string()),
            network_error: None,
        }
    }

    /// Fail at the network layer
    pub fn network_error(message: &str) -> Self {
        Self {
            status: 0,
            body: Bytes::new(),
            content_type: None,
            network_error: Some(message.to_string()),
        }
    }

    fn into_result(self) -> SlackResult<HttpResponse> {
        if let Some(message) = self.network_error {
            return Err(SlackError::Network(NetworkError::ConnectionFailed { message }));
        }
        let status = StatusCode::from_u16(self.status).map_err(|e| {
            SlackError::Response(ResponseError::UnexpectedResponse {
                message: e.to_string(),
            })
        })?;
        let mut headers = HeaderMap::new();
        if let Some(content_type) = self.content_type.as_deref() {
            if let Ok(value) = HeaderValue::from_str(content_type) {
                headers.insert(http::header::CONTENT_TYPE, value);
            }
        }
        Ok(HttpResponse {
            status,
            headers,
            body: self.body,
        })
    }
}

/// Recorded request for verification
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request method
    pub method: Method,
    /// Request URL, without query string
    pub url: String,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// JSON body, if one was sent
    pub body: Option<Value>,
    /// Raw body, if bytes were sent
    pub raw_body: Option<Bytes>,
    /// Content type of the raw body
    pub raw_content_type: Option<String>,
}

impl RecordedRequest {
    fn from_request(request: &HttpRequest) -> Self {
        let (body, raw_body, raw_content_type) = match &request.body {
            Some(RequestBody::Json(value)) => (Some(value.clone()), None, None),
            Some(RequestBody::Bytes {
                content,
                content_type,
            }) => (None, Some(content.clone()), Some(content_type.clone())),
            None => (None, None, None),
        };
        Self {
            method: request.method.clone(),
            url: request.url.clone(),
            query: request.query.clone(),
            headers: request
                .headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
                .collect(),
            body,
            raw_body,
            raw_content_type,
        }
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body parameter by name
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|b| b.get(key))
    }

    /// Query parameter by name
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the URL path ends with `endpoint` (`users.info`, `Users/U1`)
    pub fn is_for(&self, endpoint: &str) -> bool {
        route_matches(&self.url, endpoint)
    }
}

fn route_matches(url: &str, endpoint: &str) -> bool {
    let path = url.split('?').next().unwrap_or(url);
    path == endpoint || path.ends_with(&format!("/{}", endpoint.trim_start_matches('/')))
}

/// Mock HTTP transport for testing
#[derive(Default)]
pub struct MockHttpTransport {
    queue: Mutex<VecDeque<MockResponse>>,
    routes: Mutex<Vec<(String, MockResponse)>>,
    default_response: Mutex<Option<MockResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttpTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unmatched call
    pub fn push_response(&self, response: MockResponse) -> &Self {
        self.queue.lock().push_back(response);
        self
    }

    /// Queue several responses
    pub fn push_responses(&self, responses: impl IntoIterator<Item = MockResponse>) -> &Self {
        self.queue.lock().extend(responses);
        self
    }

    /// Answer every call to `endpoint` with `response` once the queue is empty
    pub fn add_response(&self, endpoint: &str, response: MockResponse) -> &Self {
        self.routes.lock().push((endpoint.to_string(), response));
        self
    }

    /// Response used when neither the queue nor a route applies
    pub fn with_default_response(&self, response: MockResponse) -> &Self {
        *self.default_response.lock() = Some(response);
        self
    }

    /// Get recorded requests
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Recorded requests for one endpoint
    pub fn requests_to(&self, endpoint: &str) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.is_for(endpoint))
            .cloned()
            .collect()
    }

    /// Number of requests received
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Get the last recorded request
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }

    /// Clear recorded requests
    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }

    /// Get remaining queued response count
    pub fn remaining_responses(&self) -> usize {
        self.queue.lock().len()
    }

    fn next_response(&self, url: &str) -> Option<MockResponse> {
        if let Some(response) = self.queue.lock().pop_front() {
            return Some(response);
        }
        let routed = self
            .routes
            .lock()
            .iter()
            .rev()
            .find(|(endpoint, _)| route_matches(url, endpoint))
            .map(|(_, response)| response.clone());
        routed.or_else(|| self.default_response.lock().clone())
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> SlackResult<HttpResponse> {
        self.requests
            .lock()
            .push(RecordedRequest::from_request(&request));

        let response = self.next_response(&request.url).ok_or_else(|| {
            SlackError::Response(ResponseError::UnexpectedResponse {
                message: format!("No mock response configured for {}", request.url),
            })
        })?;

        response.into_result()
    }
}

impl std::fmt::Debug for MockHttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHttpTransport")
            .field("pending_responses", &self.queue.lock().len())
            .field("routes", &self.routes.lock().len())
            .field("recorded_requests", &self.requests.lock().len())
            .finish()
    }
}
