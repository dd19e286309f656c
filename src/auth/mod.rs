//! Credential selection and authorization headers.
//!
//! Each API family authenticates with a bearer token of a specific kind. The
//! [`AuthManager`] resolves that token from configuration and refuses, before
//! any request is built, when it is absent.

use crate::config::{SlackObjectsConfig, SlackToken};
use crate::errors::{NetworkError, SlackError, SlackResult};
use http::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::fmt;
use std::sync::Arc;

/// Token kind selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Bot token (xoxb-*), used for the Web API
    Bot,
    /// User token (xoxp-*), used for the Admin and Discovery APIs
    User,
    /// SCIM provisioning token
    Scim,
}

impl TokenKind {
    /// Name of the configuration field holding this token
    pub fn field_name(&self) -> &'static str {
        match self {
            TokenKind::Bot => "bot_token",
            TokenKind::User => "user_token",
            TokenKind::Scim => "scim_token",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Authentication manager for API requests
#[derive(Clone)]
pub struct AuthManager {
    config: Arc<SlackObjectsConfig>,
}

impl AuthManager {
    /// Create a new authentication manager
    pub fn new(config: Arc<SlackObjectsConfig>) -> Self {
        Self { config }
    }

    /// Check if a specific token kind is available
    pub fn has_token(&self, kind: TokenKind) -> bool {
        self.config.has_token(kind)
    }

    /// Fail with [`SlackError::MissingCredential`] unless `kind` is configured
    pub fn require(&self, kind: TokenKind) -> SlackResult<&SlackToken> {
        self.config
            .token(kind)
            .ok_or(SlackError::MissingCredential { kind })
    }

    /// First configured kind out of `preferred`, or the last one if none is
    ///
    /// The fallback keeps the eventual [`SlackError::MissingCredential`]
    /// naming a concrete field.
    pub fn preferred(&self, preferred: &[TokenKind]) -> TokenKind {
        preferred
            .iter()
            .copied()
            .find(|kind| self.has_token(*kind))
            .or_else(|| preferred.last().copied())
            .unwrap_or(TokenKind::Bot)
    }

    /// Headers for a JSON request authenticated with `kind`
    pub fn json_headers(&self, kind: TokenKind) -> SlackResult<HeaderMap> {
        let mut headers = self.bearer_headers(kind)?;
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Headers carrying only the bearer token for `kind`
    pub fn bearer_headers(&self, kind: TokenKind) -> SlackResult<HeaderMap> {
        let token = self.require(kind)?;
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", token.expose())).map_err(|_| {
            SlackError::Network(NetworkError::InvalidRequest {
                message: format!("{kind} is not a valid header value"),
            })
        })?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

impl fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthManager")
            .field("bot", &self.has_token(TokenKind::Bot))
            .field("user", &self.has_token(TokenKind::User))
            .field("scim", &self.has_token(TokenKind::Scim))
            .finish()
    }
}
