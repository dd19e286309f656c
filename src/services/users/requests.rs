//! Request types for users.

use crate::errors::{SlackError, SlackResult};
use crate::services::join_ids;
use crate::types::{looks_like_email, ChannelId, TeamId};
use serde_json::{json, Map, Value};

/// Invitation of a new user to a workspace (`admin.users.invite`)
#[derive(Debug, Clone, PartialEq)]
pub struct InviteUserRequest {
    /// Invitee email
    pub email: String,
    /// Workspace to join
    pub team_id: TeamId,
    /// Channels to join on acceptance; at least one
    pub channel_ids: Vec<ChannelId>,
    /// Allow email and password sign-in
    pub email_password_policy_enabled: bool,
    /// Message included in the invitation email
    pub custom_message: Option<String>,
    /// Invitee full name
    pub real_name: Option<String>,
    /// Invite as a multi-channel guest
    pub is_restricted: bool,
    /// Invite as a single-channel guest
    pub is_ultra_restricted: bool,
    /// Guest expiration (Unix seconds)
    pub guest_expiration_ts: Option<i64>,
}

impl InviteUserRequest {
    /// Create a new request
    pub fn new(
        email: impl Into<String>,
        team_id: impl Into<TeamId>,
        channel_ids: impl IntoIterator<Item = impl Into<ChannelId>>,
    ) -> Self {
        Self {
            email: email.into(),
            team_id: team_id.into(),
            channel_ids: channel_ids.into_iter().map(Into::into).collect(),
            email_password_policy_enabled: false,
            custom_message: None,
            real_name: None,
            is_restricted: false,
            is_ultra_restricted: false,
            guest_expiration_ts: None,
        }
    }

    /// Allow email and password sign-in
    pub fn email_password_policy_enabled(mut self, enabled: bool) -> Self {
        self.email_password_policy_enabled = enabled;
        self
    }

    /// Set the invitation message
    pub fn custom_message(mut self, message: impl Into<String>) -> Self {
        self.custom_message = Some(message.into());
        self
    }

    /// Set the invitee name
    pub fn real_name(mut self, name: impl Into<String>) -> Self {
        self.real_name = Some(name.into());
        self
    }

    /// Invite as a multi-channel guest
    pub fn multi_channel_guest(mut self) -> Self {
        self.is_restricted = true;
        self.is_ultra_restricted = false;
        self
    }

    /// Invite as a single-channel guest
    pub fn single_channel_guest(mut self) -> Self {
        self.is_restricted = false;
        self.is_ultra_restricted = true;
        self
    }

    /// Set the guest expiration
    pub fn guest_expiration_ts(mut self, ts: i64) -> Self {
        self.guest_expiration_ts = Some(ts);
        self
    }

    pub(crate) fn validate(&self) -> SlackResult<()> {
        if !looks_like_email(&self.email) {
            return Err(SlackError::invalid_argument(format!(
                "invalid invitee email {:?}",
                self.email
            )));
        }
        if self.channel_ids.is_empty() {
            return Err(SlackError::invalid_argument(
                "an invitation needs at least one channel id",
            ));
        }
        Ok(())
    }

    pub(crate) fn to_params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("email".into(), json!(self.email));
        params.insert("team_id".into(), json!(self.team_id));
        params.insert("channel_ids".into(), json!(join_ids(&self.channel_ids)));
        params.insert(
            "email_password_policy_enabled".into(),
            json!(self.email_password_policy_enabled),
        );
        if let Some(message) = &self.custom_message {
            params.insert("custom_message".into(), json!(message));
        }
        if let Some(name) = &self.real_name {
            params.insert("real_name".into(), json!(name));
        }
        if self.is_restricted {
            params.insert("is_restricted".into(), json!(true));
        }
        if self.is_ultra_restricted {
            params.insert("is_ultra_restricted".into(), json!(true));
        }
        if let Some(ts) = self.guest_expiration_ts {
            params.insert("guest_expiration_ts".into(), json!(ts));
        }
        params
    }
}

/// Per-target result of a bulk removal
///
/// Each target is attempted once; a failure does not stop the others.
#[derive(Debug, Default)]
pub struct RemovalReport<T> {
    /// Targets the user was removed from
    pub removed: Vec<T>,
    /// Targets left alone on request
    pub skipped: Vec<T>,
    /// Targets whose removal failed, with the error
    pub failed: Vec<(T, SlackError)>,
}

impl<T> RemovalReport<T> {
    /// Whether every attempted removal succeeded
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
