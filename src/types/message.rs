//! Message records.

use super::{ChannelId, File, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Slack message, as returned by `conversations.history` and `conversations.replies`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message type, usually `message`
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    /// Message subtype
    #[serde(default)]
    pub subtype: Option<String>,
    /// Message text
    #[serde(default)]
    pub text: Option<String>,
    /// Author
    #[serde(default)]
    pub user: Option<UserId>,
    /// Bot ID if sent by a bot
    #[serde(default)]
    pub bot_id: Option<String>,
    /// Message timestamp
    #[serde(default)]
    pub ts: Timestamp,
    /// Parent timestamp when part of a thread
    #[serde(default)]
    pub thread_ts: Option<Timestamp>,
    /// Number of replies on a thread parent
    #[serde(default)]
    pub reply_count: Option<u32>,
    /// Block Kit blocks, kept as raw JSON
    #[serde(default)]
    pub blocks: Vec<Value>,
    /// Files shared with the message
    #[serde(default)]
    pub files: Vec<File>,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    /// Whether this message starts a thread with replies
    pub fn has_replies(&self) -> bool {
        self.reply_count.unwrap_or(0) > 0
    }

    /// Whether the message carries the file `file_id`
    pub fn carries_file(&self, file_id: &str) -> bool {
        self.files.iter().any(|f| f.id == file_id)
    }

    /// Index of the first block matching `block_id`, or `block_type` when no id is given
    pub fn find_block(&self, block_id: Option<&str>, block_type: Option<&str>) -> Option<usize> {
        find_block(&self.blocks, block_id, block_type)
    }
}

/// Index of the first block matching `block_id`, or `block_type` when no id is given
pub fn find_block(blocks: &[Value], block_id: Option<&str>, block_type: Option<&str>) -> Option<usize> {
    let (key, target) = match (block_id, block_type) {
        (Some(id), _) => ("block_id", id),
        (None, Some(ty)) => ("type", ty),
        (None, None) => return None,
    };
    blocks
        .iter()
        .position(|block| block.get(key).and_then(Value::as_str) == Some(target))
}

/// A message returned by an update, with its conversation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatedMessage {
    /// Conversation ID
    #[serde(default)]
    pub channel: ChannelId,
    /// Message timestamp
    #[serde(default)]
    pub ts: Timestamp,
    /// Text after the update
    #[serde(default)]
    pub text: Option<String>,
}
