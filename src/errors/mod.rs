//! Error types for the Slack objects client.
//!
//! Every failure surfaces as a [`SlackError`] identifying either the
//! credential that was missing or the endpoint that failed. Nothing in the
//! stack retries: one failed call is one reported error.

use crate::api_caller::ApiFamily;
use crate::config::TokenKind;
use thiserror::Error;

/// Result type for Slack operations
pub type SlackResult<T> = Result<T, SlackError>;

/// Root error type
#[derive(Error, Debug)]
pub enum SlackError {
    /// Invalid option value at construction time
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A method needs a token kind that is absent from configuration
    #[error("Missing credential: {kind} is not configured")]
    MissingCredential {
        /// The token kind that was required
        kind: TokenKind,
    },

    /// Upstream HTTP or platform-reported failure
    #[error("API call failed: {0}")]
    ApiCall(#[from] ApiCallError),

    /// A successful call returned no matching record
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of record looked up
        entity: &'static str,
        /// Lookup key
        key: String,
    },

    /// Local input rejected before any call was made
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Response parsing error
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}

impl SlackError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "SLACK_CONFIG",
            Self::MissingCredential { .. } => "SLACK_MISSING_CREDENTIAL",
            Self::ApiCall(_) => "SLACK_API",
            Self::NotFound { .. } => "SLACK_NOT_FOUND",
            Self::InvalidArgument { .. } => "SLACK_INVALID_ARGUMENT",
            Self::Network(_) => "SLACK_NETWORK",
            Self::Response(_) => "SLACK_RESPONSE",
        }
    }

    /// HTTP status of a failed upstream call
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::ApiCall(err) => Some(err.status),
            _ => None,
        }
    }

    /// Upstream error identifier of a failed call (e.g. `already_archived`)
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::ApiCall(err) => Some(err.code.as_str()),
            _ => None,
        }
    }

    /// Shorthand for [`SlackError::InvalidArgument`]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Shorthand for [`SlackError::NotFound`]
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// Invalid token value
    #[error("Invalid {kind}: {reason}")]
    InvalidToken {
        /// Which token field
        kind: TokenKind,
        /// Why it was rejected
        reason: String,
    },

    /// Invalid URL option
    #[error("Invalid {field}: {message}")]
    InvalidUrl {
        /// Option name
        field: &'static str,
        /// Parser message
        message: String,
    },

    /// Timeout must be positive
    #[error("http_timeout_seconds must be positive")]
    InvalidTimeout,

    /// Unknown rate tier name
    #[error("Unknown rate tier: {0}")]
    InvalidRateTier(String),

    /// Unknown SCIM version
    #[error("Unknown SCIM version: {0} (expected v1 or v2)")]
    InvalidScimVersion(String),

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },

    /// Optional capability not compiled into this build
    #[error("Capability unavailable: {capability} (enable the `{feature}` feature)")]
    CapabilityUnavailable {
        /// Capability name
        capability: &'static str,
        /// Cargo feature providing it
        feature: &'static str,
    },

    /// Environment variable error
    #[error("Environment variable error: {0}")]
    EnvVar(String),
}

/// Failure reported by an upstream API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{family} {endpoint} returned {status} ({code}): {message}")]
pub struct ApiCallError {
    /// API family the endpoint belongs to
    pub family: ApiFamily,
    /// Endpoint or SCIM path
    pub endpoint: String,
    /// HTTP status code
    pub status: u16,
    /// Upstream error identifier
    pub code: String,
    /// Upstream error message
    pub message: String,
}

/// Network errors
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Connection failed
    #[error("Connection failed: {message}")]
    ConnectionFailed {
        /// Error message
        message: String,
    },

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// Request could not be built
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error message
        message: String,
    },

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout
        } else if err.is_connect() {
            NetworkError::ConnectionFailed {
                message: err.to_string(),
            }
        } else if err.is_builder() {
            NetworkError::InvalidRequest {
                message: err.to_string(),
            }
        } else {
            NetworkError::Http(err.to_string())
        }
    }
}

/// Response parsing errors
#[derive(Error, Debug)]
pub enum ResponseError {
    /// JSON deserialization error
    #[error("Deserialization error: {message}")]
    DeserializationError {
        /// Error message
        message: String,
    },

    /// Expected field absent from payload
    #[error("Missing field '{field}' in {endpoint} response")]
    MissingField {
        /// Endpoint that produced the payload
        endpoint: String,
        /// Field name
        field: String,
    },

    /// Unexpected response format
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Error message
        message: String,
    },
}

impl From<serde_json::Error> for ResponseError {
    fn from(err: serde_json::Error) -> Self {
        ResponseError::DeserializationError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SlackError {
    fn from(err: serde_json::Error) -> Self {
        SlackError::Response(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, code: &str) -> SlackError {
        SlackError::ApiCall(ApiCallError {
            family: ApiFamily::Web,
            endpoint: "users.info".to_string(),
            status,
            code: code.to_string(),
            message: code.to_string(),
        })
    }

    #[test]
    fn test_missing_credential_names_field() {
        let err = SlackError::MissingCredential {
            kind: TokenKind::Scim,
        };
        assert!(err.to_string().contains("scim_token"));
        assert_eq!(err.error_code(), "SLACK_MISSING_CREDENTIAL");
        assert_eq!(err.http_status(), None);
    }

    #[test]
    fn test_api_call_accessors() {
        let err = api_error(200, "already_archived");
        assert_eq!(err.http_status(), Some(200));
        assert_eq!(err.api_code(), Some("already_archived"));
        assert!(err.to_string().contains("users.info"));
    }

    #[test]
    fn test_not_found_display() {
        let err = SlackError::not_found("workspace", "Acme");
        assert_eq!(err.to_string(), "workspace not found: Acme");
        assert_eq!(err.api_code(), None);
    }

    #[test]
    fn test_serde_error_converts_to_response_error() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let err: SlackError = parse.unwrap_err().into();
        assert!(matches!(
            err,
            SlackError::Response(ResponseError::DeserializationError { .. })
        ));
    }
}
