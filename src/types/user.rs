//! User records.

use super::{TeamId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Slack user, as returned by `users.info` and `users.lookupByEmail`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub id: UserId,
    /// Home team ID
    #[serde(default)]
    pub team_id: Option<TeamId>,
    /// Username
    #[serde(default)]
    pub name: Option<String>,
    /// Real name
    #[serde(default)]
    pub real_name: Option<String>,
    /// Whether deactivated
    #[serde(default)]
    pub deleted: bool,
    /// Whether a workspace admin
    #[serde(default)]
    pub is_admin: bool,
    /// Whether a workspace owner
    #[serde(default)]
    pub is_owner: bool,
    /// Multi-channel guest
    #[serde(default)]
    pub is_restricted: bool,
    /// Single-channel guest
    #[serde(default)]
    pub is_ultra_restricted: bool,
    /// Whether a bot user
    #[serde(default)]
    pub is_bot: bool,
    /// Guest expiration (Unix seconds), if any
    #[serde(default)]
    pub expiration_ts: Option<i64>,
    /// User profile
    #[serde(default)]
    pub profile: UserProfile,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Guest of either kind
    pub fn is_guest(&self) -> bool {
        self.is_restricted || self.is_ultra_restricted
    }

    /// Not deactivated
    pub fn is_active(&self) -> bool {
        !self.deleted
    }

    /// Whether `label` appears in the real name or the display name
    pub fn has_label(&self, label: &str) -> bool {
        let in_real_name = self
            .real_name
            .as_deref()
            .or(self.profile.real_name.as_deref())
            .map(|name| name.contains(label))
            .unwrap_or(false);
        let in_display_name = self
            .profile
            .display_name
            .as_deref()
            .map(|name| name.contains(label))
            .unwrap_or(false);
        in_real_name || in_display_name
    }

    /// Get the user's email if available
    pub fn email(&self) -> Option<&str> {
        self.profile.email.as_deref()
    }
}

/// User profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Real name
    #[serde(default)]
    pub real_name: Option<String>,
    /// Display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Job title
    #[serde(default)]
    pub title: Option<String>,
    /// Status text
    #[serde(default)]
    pub status_text: Option<String>,
    /// Remaining upstream fields, including custom `fields`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_with_defaults() {
        let user: User = serde_json::from_value(json!({
            "id": "U1",
            "is_restricted": true,
            "profile": {"display_name": "ada [External]", "phone": "555"},
            "tz": "Europe/London"
        }))
        .unwrap();

        assert!(user.is_guest());
        assert!(user.is_active());
        assert!(user.has_label("[External]"));
        assert_eq!(user.extra["tz"], "Europe/London");
        assert_eq!(user.profile.extra["phone"], "555");
    }

    #[test]
    fn test_label_in_real_name() {
        let user = User {
            real_name: Some("[External] Bob".to_string()),
            ..Default::default()
        };
        assert!(user.has_label("[External]"));
        assert!(!User::default().has_label("[External]"));
    }
}
