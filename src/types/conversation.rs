//! Conversation records.

use super::{ChannelId, TeamId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Slack conversation (public or private channel, DM, MPIM)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Conversation ID
    pub id: ChannelId,
    /// Name (without #)
    #[serde(default)]
    pub name: Option<String>,
    /// Whether this is a channel
    #[serde(default)]
    pub is_channel: bool,
    /// Whether this is a legacy private group
    #[serde(default)]
    pub is_group: bool,
    /// Whether this is a DM
    #[serde(default)]
    pub is_im: bool,
    /// Whether this is a multi-party DM
    #[serde(default)]
    pub is_mpim: bool,
    /// Whether private
    #[serde(default)]
    pub is_private: bool,
    /// Whether archived
    #[serde(default)]
    pub is_archived: bool,
    /// Whether shared with an external organization
    #[serde(default)]
    pub is_ext_shared: bool,
    /// Whether shared across the organization
    #[serde(default)]
    pub is_org_shared: bool,
    /// Creator
    #[serde(default)]
    pub creator: Option<UserId>,
    /// Creation time (Unix seconds)
    #[serde(default)]
    pub created: Option<i64>,
    /// Member count, under either upstream spelling
    #[serde(default, alias = "member_count")]
    pub num_members: Option<u64>,
    /// Workspaces the conversation is shared to (admin search results)
    #[serde(default)]
    pub connected_team_ids: Vec<TeamId>,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Membership of one user in a conversation, from discovery listings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationMembership {
    /// Conversation ID
    #[serde(alias = "channel_id")]
    pub id: ChannelId,
    /// Workspace of the conversation
    #[serde(default)]
    pub team_id: Option<TeamId>,
    /// When the user left (Unix seconds), 0 while still a member
    #[serde(default)]
    pub date_left: i64,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConversationMembership {
    /// Still a member
    pub fn is_active(&self) -> bool {
        self.date_left == 0
    }
}

/// Member entry from `discovery.conversations.members`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationMember {
    /// Member user ID
    #[serde(alias = "id")]
    pub user_id: UserId,
    /// When the user joined (Unix seconds)
    #[serde(default)]
    pub date_joined: Option<i64>,
    /// When the user left (Unix seconds), 0 while still a member
    #[serde(default)]
    pub date_left: i64,
}
