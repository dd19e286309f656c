//! Configuration for the Slack objects client.
//!
//! Supports configuration via:
//! - Explicit values through [`SlackObjectsConfigBuilder`]
//! - Environment variables through [`SlackObjectsConfig::from_env`]
//!
//! Every token is optional. A missing token only becomes an error when a
//! method that needs it is called.

pub use crate::auth::TokenKind;
use crate::errors::{ConfigurationError, SlackResult};
use crate::observability::Redacted;
use crate::rate_limits::{RateLimitPolicy, RateTier};
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Secure wrapper for a bearer token
#[derive(Clone)]
pub struct SlackToken {
    token: SecretString,
}

impl SlackToken {
    /// Create a new token, rejecting values that cannot travel in a header
    pub fn new(kind: TokenKind, token: impl Into<String>) -> Result<Self, ConfigurationError> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(ConfigurationError::InvalidToken {
                kind,
                reason: "must not be empty".to_string(),
            });
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ConfigurationError::InvalidToken {
                kind,
                reason: "must not contain whitespace or control characters".to_string(),
            });
        }
        Ok(Self {
            token: SecretString::new(trimmed.to_string()),
        })
    }

    /// Expose the token for use in requests
    pub(crate) fn expose(&self) -> &str {
        self.token.expose_secret()
    }
}

impl fmt::Debug for SlackToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SlackToken")
            .field(&Redacted::new(self.expose()))
            .finish()
    }
}

/// SCIM API version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScimVersion {
    /// SCIM 1.1
    V1,
    /// SCIM 2.0
    #[default]
    V2,
}

impl ScimVersion {
    /// Path segment for this version
    pub fn as_str(&self) -> &'static str {
        match self {
            ScimVersion::V1 => "v1",
            ScimVersion::V2 => "v2",
        }
    }
}

impl fmt::Display for ScimVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScimVersion {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(ScimVersion::V1),
            "v2" | "2" => Ok(ScimVersion::V2),
            _ => Err(ConfigurationError::InvalidScimVersion(s.to_string())),
        }
    }
}

/// Access level checked against IdP group membership
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessLevel {
    /// Read access
    Read,
    /// Write access
    Write,
}

/// Configuration for the Slack objects client
#[derive(Clone)]
pub struct SlackObjectsConfig {
    pub(crate) bot_token: Option<SlackToken>,
    pub(crate) user_token: Option<SlackToken>,
    pub(crate) scim_token: Option<SlackToken>,
    base_url: Url,
    scim_base_url: Url,
    scim_version: ScimVersion,
    timeout: Duration,
    default_rate_tier: RateTier,
    rate_limit_policy: RateLimitPolicy,
    auth_idp_groups_read_access: HashMap<String, Vec<String>>,
    auth_idp_groups_write_access: HashMap<String, Vec<String>>,
    contingent_worker_label: String,
}

impl fmt::Debug for SlackObjectsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackObjectsConfig")
            .field("bot_token", &self.bot_token)
            .field("user_token", &self.user_token)
            .field("scim_token", &self.scim_token)
            .field("base_url", &self.base_url.as_str())
            .field("scim_base_url", &self.scim_base_url.as_str())
            .field("scim_version", &self.scim_version)
            .field("timeout", &self.timeout)
            .field("default_rate_tier", &self.default_rate_tier)
            .finish_non_exhaustive()
    }
}

impl Default for SlackObjectsConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            user_token: None,
            scim_token: None,
            base_url: default_url(crate::DEFAULT_BASE_URL),
            scim_base_url: default_url(crate::DEFAULT_SCIM_BASE_URL),
            scim_version: ScimVersion::default(),
            timeout: Duration::from_secs(crate::DEFAULT_TIMEOUT_SECS),
            default_rate_tier: RateTier::Tier2,
            rate_limit_policy: RateLimitPolicy::slack_default(),
            auth_idp_groups_read_access: HashMap::new(),
            auth_idp_groups_write_access: HashMap::new(),
            contingent_worker_label: crate::DEFAULT_CONTINGENT_WORKER_LABEL.to_string(),
        }
    }
}

// The defaults are compile-time constants known to parse.
fn default_url(raw: &str) -> Url {
    Url::parse(raw).unwrap_or_else(|_| unreachable!("invalid built-in URL {raw}"))
}

impl SlackObjectsConfig {
    /// Create a new configuration builder
    pub fn builder() -> SlackObjectsConfigBuilder {
        SlackObjectsConfigBuilder::new()
    }

    /// Create configuration from environment variables
    ///
    /// Reads `SLACK_BOT_TOKEN`, `SLACK_USER_TOKEN`, `SLACK_SCIM_TOKEN`,
    /// `SLACK_BASE_URL`, `SLACK_SCIM_BASE_URL`, `SLACK_SCIM_VERSION`,
    /// `SLACK_HTTP_TIMEOUT_SECONDS` and `SLACK_DEFAULT_RATE_TIER`.
    pub fn from_env() -> SlackResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SlackResult<Self> {
        let mut builder = SlackObjectsConfigBuilder::new();

        if let Some(token) = lookup("SLACK_BOT_TOKEN") {
            builder = builder.bot_token(&token)?;
        }
        if let Some(token) = lookup("SLACK_USER_TOKEN") {
            builder = builder.user_token(&token)?;
        }
        if let Some(token) = lookup("SLACK_SCIM_TOKEN") {
            builder = builder.scim_token(&token)?;
        }
        if let Some(url) = lookup("SLACK_BASE_URL") {
            builder = builder.base_url(&url)?;
        }
        if let Some(url) = lookup("SLACK_SCIM_BASE_URL") {
            builder = builder.scim_base_url(&url)?;
        }
        if let Some(version) = lookup("SLACK_SCIM_VERSION") {
            builder = builder.scim_version(version.parse()?);
        }
        if let Some(timeout) = lookup("SLACK_HTTP_TIMEOUT_SECONDS") {
            let secs = timeout.trim().parse::<u64>().map_err(|_| {
                ConfigurationError::EnvVar(format!(
                    "SLACK_HTTP_TIMEOUT_SECONDS must be an integer, got {timeout:?}"
                ))
            })?;
            builder = builder.http_timeout_seconds(secs);
        }
        if let Some(tier) = lookup("SLACK_DEFAULT_RATE_TIER") {
            builder = builder.default_rate_tier(tier.parse()?);
        }

        builder.build()
    }

    /// Token of the given kind, if configured
    pub fn token(&self, kind: TokenKind) -> Option<&SlackToken> {
        match kind {
            TokenKind::Bot => self.bot_token.as_ref(),
            TokenKind::User => self.user_token.as_ref(),
            TokenKind::Scim => self.scim_token.as_ref(),
        }
    }

    /// Whether a token of the given kind is configured
    pub fn has_token(&self, kind: TokenKind) -> bool {
        self.token(kind).is_some()
    }

    /// Web and Admin API base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// SCIM API base URL (without version segment)
    pub fn scim_base_url(&self) -> &Url {
        &self.scim_base_url
    }

    /// SCIM API version
    pub fn scim_version(&self) -> ScimVersion {
        self.scim_version
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fallback rate tier
    pub fn default_rate_tier(&self) -> RateTier {
        self.default_rate_tier
    }

    /// Rate limit policy, with the configured default tier applied
    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        self.rate_limit_policy.with_default(self.default_rate_tier)
    }

    /// Label marking contingent workers in their display names
    pub fn contingent_worker_label(&self) -> &str {
        &self.contingent_worker_label
    }

    /// IdP group ids granting `level` access to `service`
    pub fn idp_groups_for(&self, service: &str, level: AccessLevel) -> &[String] {
        let map = match level {
            AccessLevel::Read => &self.auth_idp_groups_read_access,
            AccessLevel::Write => &self.auth_idp_groups_write_access,
        };
        map.get(service).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether guest expiration dates can be computed in this build
    pub fn supports_guest_expiration(&self) -> bool {
        cfg!(feature = "guest-expiration")
    }

    /// Build the full URL for a Web or Admin API method
    pub fn build_url(&self, endpoint: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = endpoint.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Build the full URL for a SCIM resource path
    pub fn build_scim_url(&self, path: &str) -> String {
        let base = self.scim_base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}/{}", base, self.scim_version, path)
    }
}

/// Builder for [`SlackObjectsConfig`]
#[derive(Default)]
pub struct SlackObjectsConfigBuilder {
    config: SlackObjectsConfig,
}

impl SlackObjectsConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: SlackObjectsConfig::default(),
        }
    }

    /// Set the bot token
    pub fn bot_token(mut self, token: &str) -> Result<Self, ConfigurationError> {
        self.config.bot_token = Some(SlackToken::new(TokenKind::Bot, token)?);
        Ok(self)
    }

    /// Set the user token
    pub fn user_token(mut self, token: &str) -> Result<Self, ConfigurationError> {
        self.config.user_token = Some(SlackToken::new(TokenKind::User, token)?);
        Ok(self)
    }

    /// Set the SCIM token
    pub fn scim_token(mut self, token: &str) -> Result<Self, ConfigurationError> {
        self.config.scim_token = Some(SlackToken::new(TokenKind::Scim, token)?);
        Ok(self)
    }

    /// Set the Web API base URL
    pub fn base_url(mut self, url: &str) -> Result<Self, ConfigurationError> {
        self.config.base_url = parse_url("base_url", url)?;
        Ok(self)
    }

    /// Set the SCIM base URL
    pub fn scim_base_url(mut self, url: &str) -> Result<Self, ConfigurationError> {
        self.config.scim_base_url = parse_url("scim_base_url", url)?;
        Ok(self)
    }

    /// Set the SCIM version
    pub fn scim_version(mut self, version: ScimVersion) -> Self {
        self.config.scim_version = version;
        self
    }

    /// Set the per-request timeout in seconds
    pub fn http_timeout_seconds(mut self, secs: u64) -> Self {
        self.config.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the fallback rate tier
    pub fn default_rate_tier(mut self, tier: RateTier) -> Self {
        self.config.default_rate_tier = tier;
        self
    }

    /// Replace the method-to-tier table
    pub fn rate_limit_policy(mut self, policy: RateLimitPolicy) -> Self {
        self.config.rate_limit_policy = policy;
        self
    }

    /// IdP groups granting read access to a service
    pub fn idp_read_access(
        mut self,
        service: impl Into<String>,
        groups: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.config
            .auth_idp_groups_read_access
            .insert(service.into(), groups.into_iter().map(Into::into).collect());
        self
    }

    /// IdP groups granting write access to a service
    pub fn idp_write_access(
        mut self,
        service: impl Into<String>,
        groups: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.config
            .auth_idp_groups_write_access
            .insert(service.into(), groups.into_iter().map(Into::into).collect());
        self
    }

    /// Label marking contingent workers
    pub fn contingent_worker_label(mut self, label: impl Into<String>) -> Self {
        self.config.contingent_worker_label = label.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> SlackResult<SlackObjectsConfig> {
        if self.config.timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout.into());
        }
        if self.config.contingent_worker_label.trim().is_empty() {
            return Err(ConfigurationError::InvalidConfiguration {
                message: "contingent_worker_label must not be empty".to_string(),
            }
            .into());
        }
        Ok(self.config)
    }
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, ConfigurationError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigurationError::InvalidUrl {
        field,
        message: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigurationError::InvalidUrl {
            field,
            message: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(url)
}
