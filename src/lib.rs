//! Slack objects
//!
//! Object-style wrappers over the Slack Web, Admin and SCIM APIs:
//! - Entity wrappers for users, conversations, messages, files, workspaces,
//!   IdP groups and usergroups, each optionally bound to one id
//! - Per-endpoint rate-tier pacing shared by every wrapper of a client
//! - Lazy pagination streams over cursor, offset, page and SCIM listings
//! - Typed errors carrying the upstream status and error code
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use slack_objects::SlackObjectsClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads SLACK_BOT_TOKEN, SLACK_USER_TOKEN, SLACK_SCIM_TOKEN, ...
//!     let client = SlackObjectsClient::from_env()?;
//!
//!     let user = client.users(Some("U0123456789"));
//!     if user.is_guest(None).await? {
//!         println!("guest: {:?}", user.user().await?.real_name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `guest-expiration` - Compute guest expiration timestamps from dates (default)
//! - `rustls` / `native-tls` - TLS backend for the HTTPS transport

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// Core modules
pub mod api_caller;
pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod pagination;
pub mod rate_limits;
pub mod transport;
pub mod types;

// Entity wrappers
pub mod services;

// Observability
pub mod observability;

// Testing utilities
pub mod fixtures;
pub mod mocks;

// Tests
#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use api_caller::{ApiCaller, ApiFamily, ApiRequest, ApiResponse};
pub use client::SlackObjectsClient;
pub use config::{AccessLevel, ScimVersion, SlackObjectsConfig, SlackObjectsConfigBuilder};
pub use errors::{SlackError, SlackResult};
pub use pagination::Page;
pub use rate_limits::{RateLimitPolicy, RateTier};
pub use services::{
    Conversations, Files, IdpGroups, Messages, Usergroups, Users, Workspaces,
};
pub use types::MessageCoordinates;

/// Default base URL for the Web and Admin APIs
pub const DEFAULT_BASE_URL: &str = "https://slack.com/api";

/// Default base URL for the SCIM API, without the version segment
pub const DEFAULT_SCIM_BASE_URL: &str = "https://api.slack.com/scim";

/// Default timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default label marking contingent workers in names
pub const DEFAULT_CONTINGENT_WORKER_LABEL: &str = "[External]";

/// Create a client with the given configuration
pub fn create_client(config: SlackObjectsConfig) -> SlackResult<SlackObjectsClient> {
    SlackObjectsClient::new(config)
}

/// Create a client from environment variables
///
/// Reads:
/// - `SLACK_BOT_TOKEN` - Bot token (xoxb-*)
/// - `SLACK_USER_TOKEN` - User token (xoxp-*), for Admin and Discovery methods
/// - `SLACK_SCIM_TOKEN` - Token with the `admin` scope, for SCIM
/// - `SLACK_BASE_URL`, `SLACK_SCIM_BASE_URL`, `SLACK_SCIM_VERSION`
/// - `SLACK_HTTP_TIMEOUT_SECONDS`, `SLACK_DEFAULT_RATE_TIER`
pub fn create_client_from_env() -> SlackResult<SlackObjectsClient> {
    SlackObjectsClient::from_env()
}
