//! Common types for the Slack APIs.
//!
//! Identifiers are newtypes over the raw strings; records mirror upstream
//! objects loosely, with defaults for absent fields and unknown fields kept
//! in an `extra` map.

use crate::errors::{SlackError, SlackResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod conversation;
pub mod file;
pub mod message;
pub mod scim;
pub mod team;
pub mod user;
pub mod usergroup;

pub use conversation::*;
pub use file::*;
pub use message::*;
pub use scim::*;
pub use team::*;
pub use user::*;
pub use usergroup::*;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create a new identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<&String> for $name {
            fn from(s: &String) -> Self {
                Self(s.clone())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Slack user ID
    UserId
);
string_id!(
    /// Slack conversation (channel, private channel, DM) ID
    ChannelId
);
string_id!(
    /// Slack team/workspace ID
    TeamId
);
string_id!(
    /// Slack file ID
    FileId
);
string_id!(
    /// IdP (SCIM) group ID
    GroupId
);
string_id!(
    /// Slack user group ID
    UsergroupId
);
string_id!(
    /// Slack timestamp (ts), the unique identifier of a message
    Timestamp
);

fn prefixed_upper_alnum(id: &str, prefixes: &[char]) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if prefixes.contains(&first) => {
            let rest = chars.as_str();
            !rest.is_empty()
                && rest
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        }
        _ => false,
    }
}

impl UserId {
    /// Whether this has the shape of a user ID (`U`/`W` then uppercase alphanumerics)
    pub fn is_user(&self) -> bool {
        prefixed_upper_alnum(&self.0, &['U', 'W'])
    }

    /// Check if this is a bot user ID (starts with B)
    pub fn is_bot(&self) -> bool {
        self.0.starts_with('B')
    }
}

impl ChannelId {
    /// Whether this has the shape of a conversation ID (`C`/`G`/`D` then uppercase alphanumerics)
    pub fn looks_valid(&self) -> bool {
        prefixed_upper_alnum(&self.0, &['C', 'G', 'D'])
    }

    /// Check if this is a public channel ID (starts with C)
    pub fn is_public_channel(&self) -> bool {
        self.0.starts_with('C')
    }

    /// Check if this is a legacy private channel ID (starts with G)
    pub fn is_private_channel(&self) -> bool {
        self.0.starts_with('G')
    }

    /// Check if this is a DM channel ID (starts with D)
    pub fn is_dm(&self) -> bool {
        self.0.starts_with('D')
    }
}

impl Timestamp {
    /// Parse timestamp to DateTime
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let secs = self.0.split('.').next()?.parse::<i64>().ok()?;
        DateTime::from_timestamp(secs, 0)
    }
}

/// Location of a conversation, optionally narrowed to one message
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageCoordinates {
    /// Conversation holding the message
    pub channel: ChannelId,
    /// Message timestamp
    pub ts: Option<Timestamp>,
}

impl MessageCoordinates {
    /// Coordinates of a whole conversation
    pub fn channel(channel: impl Into<ChannelId>) -> Self {
        Self {
            channel: channel.into(),
            ts: None,
        }
    }

    /// Coordinates of one message
    pub fn message(channel: impl Into<ChannelId>, ts: impl Into<Timestamp>) -> Self {
        Self {
            channel: channel.into(),
            ts: Some(ts.into()),
        }
    }
}

/// Response metadata for pagination
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Next cursor for pagination
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl ResponseMetadata {
    /// Check if there are more results
    pub fn has_more(&self) -> bool {
        self.next_cursor
            .as_ref()
            .map(|c| !c.is_empty())
            .unwrap_or(false)
    }
}

/// Reject SCIM ids that could alter the request path
pub fn validate_scim_id(id: &str) -> SlackResult<&str> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(id)
    } else {
        Err(SlackError::invalid_argument(format!(
            "invalid SCIM id {id:?}: only letters, digits, '_' and '-' are allowed"
        )))
    }
}

/// Light structural email check: `local@domain.tld`, no whitespace
pub fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    }
}
