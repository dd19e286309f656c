//! The low-level API caller.
//!
//! Every outbound call passes through [`ApiCaller::call`], for all three API
//! families. A call:
//!
//! 1. resolves the bearer token for the required [`TokenKind`], failing with
//!    [`SlackError::MissingCredential`] before anything touches the network;
//! 2. sleeps for the rate tier resolved for the endpoint;
//! 3. sends exactly one request;
//! 4. turns a non-success status, an `"ok": false` payload or a SCIM
//!    `Errors` payload into an [`ApiCallError`].
//!
//! There is no retry loop.

mod request;
mod response;

pub use request::*;
pub use response::*;

use crate::auth::{AuthManager, TokenKind};
use crate::config::SlackObjectsConfig;
use crate::errors::{ApiCallError, SlackError, SlackResult};
use crate::observability::redact_url;
use crate::rate_limits::Pacer;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use bytes::Bytes;
use http::Method;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// The three API surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiFamily {
    /// General Web API
    Web,
    /// Admin and Discovery methods (Enterprise Grid)
    Admin,
    /// SCIM provisioning API
    Scim,
}

impl ApiFamily {
    /// Token kind the family authenticates with by default
    pub fn default_token(&self) -> TokenKind {
        match self {
            ApiFamily::Web => TokenKind::Bot,
            ApiFamily::Admin => TokenKind::User,
            ApiFamily::Scim => TokenKind::Scim,
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ApiFamily::Web => "web",
            ApiFamily::Admin => "admin",
            ApiFamily::Scim => "scim",
        })
    }
}

/// Single point of contact with the Slack APIs
#[derive(Clone)]
pub struct ApiCaller {
    config: Arc<SlackObjectsConfig>,
    auth: AuthManager,
    transport: Arc<dyn HttpTransport>,
    pacer: Pacer,
}

impl ApiCaller {
    /// Create a caller over a transport
    pub fn new(config: Arc<SlackObjectsConfig>, transport: Arc<dyn HttpTransport>) -> Self {
        let pacer = Pacer::new(config.rate_limit_policy());
        Self {
            auth: AuthManager::new(config.clone()),
            config,
            transport,
            pacer,
        }
    }

    /// Configuration this caller was built with
    pub fn config(&self) -> &SlackObjectsConfig {
        &self.config
    }

    pub(crate) fn shared_config(&self) -> Arc<SlackObjectsConfig> {
        self.config.clone()
    }

    /// Credential selection for this caller
    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    /// Issue one API call
    #[instrument(
        skip(self, request),
        fields(family = %request.family, endpoint = %request.endpoint, token = %request.token)
    )]
    pub async fn call(&self, request: ApiRequest) -> SlackResult<ApiResponse> {
        let headers = self.auth.json_headers(request.token)?;

        self.pacer
            .pace(&request.rate_key(), request.rate_tier)
            .await;

        let url = match request.family {
            ApiFamily::Web | ApiFamily::Admin => self.config.build_url(&request.endpoint),
            ApiFamily::Scim => self.config.build_scim_url(&request.endpoint),
        };
        debug!(method = %request.method, url = %redact_url(&url), "Dispatching call");

        let mut http = HttpRequest::new(request.method.clone(), url, headers)
            .query(request.query.clone())
            .with_timeout(self.config.timeout());
        if let Some(body) = request.json_body() {
            http = http.json(body);
        }

        let response = self.transport.send(http).await?;
        interpret(&request, response)
    }

    /// Authenticated download of a file URL such as `url_private`
    #[instrument(skip(self, url), fields(url = %redact_url(url)))]
    pub async fn download(&self, url: &str, token: TokenKind) -> SlackResult<Bytes> {
        let headers = self.auth.bearer_headers(token)?;
        let http = HttpRequest::new(Method::GET, url, headers).with_timeout(self.config.timeout());
        let response = self.transport.send(http).await?;
        raw_result(url, response)
    }

    /// Post content to a presigned upload URL
    #[instrument(skip(self, url, content), fields(url = %redact_url(url), bytes = content.len()))]
    pub async fn upload(
        &self,
        url: &str,
        content: Bytes,
        content_type: &str,
        token: TokenKind,
    ) -> SlackResult<()> {
        let headers = self.auth.bearer_headers(token)?;
        let http = HttpRequest::new(Method::POST, url, headers)
            .bytes(content, content_type)
            .with_timeout(self.config.timeout());
        let response = self.transport.send(http).await?;
        raw_result(url, response).map(|_| ())
    }
}

impl fmt::Debug for ApiCaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCaller")
            .field("config", &self.config)
            .field("pacer", &self.pacer)
            .finish_non_exhaustive()
    }
}

fn interpret(request: &ApiRequest, response: HttpResponse) -> SlackResult<ApiResponse> {
    let status = response.status.as_u16();
    let data = decode_body(&response.body);

    if !response.status.is_success() {
        let (code, message) = match &data {
            Ok(body) if has_error_detail(request.family, body) => {
                error_details(request.family, body)
            }
            _ => {
                let code = http_code(response.status);
                let text = String::from_utf8_lossy(&response.body).trim().to_string();
                let message = if text.is_empty() { code.clone() } else { text };
                (code, message)
            }
        };
        return Err(api_error(request, status, code, message));
    }

    let data = data?;

    match request.family {
        ApiFamily::Web | ApiFamily::Admin => {
            if data.get("ok").and_then(Value::as_bool) == Some(false) {
                let (code, message) = error_details(request.family, &data);
                return Err(api_error(request, status, code, message));
            }
        }
        ApiFamily::Scim => {
            if data.get("Errors").is_some() {
                let (code, message) = error_details(request.family, &data);
                return Err(api_error(request, status, code, message));
            }
        }
    }

    Ok(ApiResponse::new(
        request.family,
        request.endpoint.clone(),
        status,
        data,
    ))
}

fn decode_body(body: &[u8]) -> SlackResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_slice(body)?)
}

fn error_details(family: ApiFamily, body: &Value) -> (String, String) {
    match family {
        ApiFamily::Web | ApiFamily::Admin => {
            let code = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string();
            let mut message = code.clone();
            if let Some(needed) = body.get("needed").and_then(Value::as_str) {
                message.push_str(&format!(" (needed: {needed})"));
            }
            if let Some(warning) = body.get("warning").and_then(Value::as_str) {
                message.push_str(&format!(" (warning: {warning})"));
            }
            (code, message)
        }
        ApiFamily::Scim => {
            let first_error = match body.get("Errors") {
                Some(Value::Array(errors)) => errors.first(),
                Some(other) => Some(other),
                None => None,
            };
            let code = first_error
                .and_then(|e| e.get("code"))
                .map(|c| match c {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .or_else(|| {
                    body.get("status")
                        .map(|s| s.as_str().map(String::from).unwrap_or_else(|| s.to_string()))
                })
                .unwrap_or_else(|| "scim_error".to_string());
            let message = first_error
                .and_then(|e| e.get("description"))
                .or_else(|| body.get("detail"))
                .and_then(Value::as_str)
                .unwrap_or("SCIM request failed")
                .to_string();
            (code, message)
        }
    }
}

fn has_error_detail(family: ApiFamily, body: &Value) -> bool {
    match family {
        ApiFamily::Web | ApiFamily::Admin => body.get("error").is_some(),
        ApiFamily::Scim => body.get("Errors").is_some() || body.get("detail").is_some(),
    }
}

fn http_code(status: http::StatusCode) -> String {
    status
        .canonical_reason()
        .map(|reason| reason.to_ascii_lowercase().replace(' ', "_"))
        .unwrap_or_else(|| format!("http_{}", status.as_u16()))
}

fn api_error(request: &ApiRequest, status: u16, code: String, message: String) -> SlackError {
    warn!(
        family = %request.family,
        endpoint = %request.endpoint,
        status,
        code = %code,
        "API call failed"
    );
    SlackError::ApiCall(ApiCallError {
        family: request.family,
        endpoint: request.endpoint.clone(),
        status,
        code,
        message,
    })
}

fn raw_result(url: &str, response: HttpResponse) -> SlackResult<Bytes> {
    if response.status.is_success() {
        return Ok(response.body);
    }
    let message = String::from_utf8_lossy(&response.body).trim().to_string();
    warn!(url = %redact_url(url), status = %response.status, "Transfer failed");
    Err(SlackError::ApiCall(ApiCallError {
        family: ApiFamily::Web,
        endpoint: redact_url(url),
        status: response.status.as_u16(),
        code: http_code(response.status),
        message,
    }))
}
