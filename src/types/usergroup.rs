//! User group records.

use super::{TeamId, UserId, UsergroupId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Slack user group (`@handle` mention group)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usergroup {
    /// User group ID
    pub id: UsergroupId,
    /// Workspace
    #[serde(default)]
    pub team_id: Option<TeamId>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Mention handle
    #[serde(default)]
    pub handle: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Member count
    #[serde(default)]
    pub user_count: Option<u64>,
    /// Members, when requested with `include_users`
    #[serde(default)]
    pub users: Vec<UserId>,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
