//! Workspace records.

use super::{TeamId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Slack workspace, from `team.info` or `admin.teams.list`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// Team ID
    pub id: TeamId,
    /// Workspace name
    #[serde(default)]
    pub name: Option<String>,
    /// Workspace subdomain
    #[serde(default)]
    pub domain: Option<String>,
    /// Email domain
    #[serde(default)]
    pub email_domain: Option<String>,
    /// Enterprise (org) ID, on Enterprise Grid
    #[serde(default)]
    pub enterprise_id: Option<String>,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Team {
    /// Case-insensitive name comparison, ignoring surrounding whitespace
    pub fn is_named(&self, name: &str) -> bool {
        self.name
            .as_deref()
            .map(|n| n.trim().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(false)
    }
}

/// Member of a workspace, from `admin.users.list`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceUser {
    /// User ID
    pub id: UserId,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Workspace admin
    #[serde(default)]
    pub is_admin: bool,
    /// Workspace owner
    #[serde(default)]
    pub is_owner: bool,
    /// Multi-channel guest
    #[serde(default)]
    pub is_restricted: bool,
    /// Single-channel guest
    #[serde(default)]
    pub is_ultra_restricted: bool,
    /// Bot user
    #[serde(default)]
    pub is_bot: bool,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
