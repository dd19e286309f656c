//! Description of a single API call.

use super::ApiFamily;
use crate::auth::TokenKind;
use crate::rate_limits::RateTier;
use http::Method;
use serde_json::{Map, Value};

/// One call against one of the three API families
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// API family
    pub family: ApiFamily,
    /// Web method name (`users.info`) or SCIM resource path (`Users/U123`)
    pub endpoint: String,
    /// HTTP method
    pub method: Method,
    /// Token kind that must be configured
    pub token: TokenKind,
    /// Explicit tier overriding the policy table
    pub rate_tier: Option<RateTier>,
    pub(crate) params: Map<String, Value>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
}

impl ApiRequest {
    /// Create a request with explicit family, method and token
    pub fn new(family: ApiFamily, endpoint: impl Into<String>, method: Method) -> Self {
        Self {
            family,
            endpoint: endpoint.into(),
            method,
            token: family.default_token(),
            rate_tier: None,
            params: Map::new(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Web API method, POSTed with the bot token
    pub fn web(endpoint: impl Into<String>) -> Self {
        Self::new(ApiFamily::Web, endpoint, Method::POST)
    }

    /// Admin or Discovery method, POSTed with the user token
    pub fn admin(endpoint: impl Into<String>) -> Self {
        Self::new(ApiFamily::Admin, endpoint, Method::POST)
    }

    /// SCIM resource request, sent with the SCIM token
    pub fn scim(method: Method, path: impl Into<String>) -> Self {
        Self::new(ApiFamily::Scim, path, method)
    }

    /// Require a different token kind
    pub fn token(mut self, kind: TokenKind) -> Self {
        self.token = kind;
        self
    }

    /// Pin the rate tier for this call
    pub fn rate_tier(mut self, tier: RateTier) -> Self {
        self.rate_tier = Some(tier);
        self
    }

    /// Add a body parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a body parameter when present
    pub fn opt_param<V: Into<Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Merge an object of body parameters
    pub fn params(mut self, params: Map<String, Value>) -> Self {
        self.params.extend(params);
        self
    }

    /// Add a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Set a complete JSON body (SCIM writes)
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Body parameter previously set
    pub fn get_param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    /// Key used to look up the rate tier
    ///
    /// SCIM paths are namespaced under `scim.` so that a single prefix rule
    /// covers them.
    pub fn rate_key(&self) -> String {
        match self.family {
            ApiFamily::Scim => format!("scim.{}", self.endpoint),
            ApiFamily::Web | ApiFamily::Admin => self.endpoint.clone(),
        }
    }

    /// JSON document sent with the request
    pub(crate) fn json_body(&self) -> Option<Value> {
        match self.family {
            ApiFamily::Web | ApiFamily::Admin => Some(
                self.body
                    .clone()
                    .unwrap_or_else(|| Value::Object(self.params.clone())),
            ),
            ApiFamily::Scim => self.body.clone(),
        }
    }
}
