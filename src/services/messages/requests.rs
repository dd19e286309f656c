//! Request types for messages.

use crate::types::{ChannelId, Timestamp, UpdatedMessage};
use serde::Serialize;
use serde_json::{json, Value};

/// Largest page size `conversations.history` and `conversations.replies` accept
pub const MAX_HISTORY_PAGE: u32 = 1000;

/// Request to update a message (`chat.update`)
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateMessageRequest {
    /// Conversation; defaults to the bound one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelId>,
    /// Message timestamp; defaults to the bound one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<Timestamp>,
    /// New text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// New Block Kit blocks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Value>>,
    /// New legacy attachments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Value>>,
    /// Update as the authed user
    pub as_user: bool,
}

impl UpdateMessageRequest {
    /// Create an update of the bound message
    pub fn new() -> Self {
        Self {
            as_user: true,
            ..Default::default()
        }
    }

    /// Target a specific message
    pub fn message(mut self, channel: impl Into<ChannelId>, ts: impl Into<Timestamp>) -> Self {
        self.channel = Some(channel.into());
        self.ts = Some(ts.into());
        self
    }

    /// Set the text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the blocks
    pub fn blocks(mut self, blocks: Vec<Value>) -> Self {
        self.blocks = Some(blocks);
        self
    }

    /// Set the attachments
    pub fn attachments(mut self, attachments: Vec<Value>) -> Self {
        self.attachments = Some(attachments);
        self
    }

    /// Whether to update as the authed user
    pub fn as_user(mut self, as_user: bool) -> Self {
        self.as_user = as_user;
        self
    }
}

/// Request for conversation history (`conversations.history`)
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRequest {
    /// Conversation; defaults to the bound one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelId>,
    /// Stop after this many messages across all pages
    #[serde(skip)]
    pub limit: Option<usize>,
    /// Include messages at `latest` and `oldest`
    pub inclusive: bool,
    /// Only messages before this timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<Timestamp>,
    /// Only messages after this timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest: Option<Timestamp>,
    /// Return all metadata attached to messages
    pub include_all_metadata: bool,
}

impl Default for HistoryRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryRequest {
    /// History of the bound conversation
    pub fn new() -> Self {
        Self {
            channel: None,
            limit: None,
            inclusive: true,
            latest: None,
            oldest: None,
            include_all_metadata: false,
        }
    }

    /// Read another conversation
    pub fn channel(mut self, channel: impl Into<ChannelId>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Stop after `limit` messages
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set inclusive bounds
    pub fn inclusive(mut self, inclusive: bool) -> Self {
        self.inclusive = inclusive;
        self
    }

    /// Upper bound
    pub fn latest(mut self, ts: impl Into<Timestamp>) -> Self {
        self.latest = Some(ts.into());
        self
    }

    /// Lower bound
    pub fn oldest(mut self, ts: impl Into<Timestamp>) -> Self {
        self.oldest = Some(ts.into());
        self
    }

    /// Include message metadata
    pub fn include_all_metadata(mut self, include: bool) -> Self {
        self.include_all_metadata = include;
        self
    }

    pub(crate) fn page_size(&self) -> Option<u32> {
        self.limit
            .map(|limit| limit.clamp(1, MAX_HISTORY_PAGE as usize) as u32)
    }
}

/// Request for thread replies (`conversations.replies`)
#[derive(Debug, Clone, Serialize)]
pub struct RepliesRequest {
    /// Conversation; defaults to the bound one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelId>,
    /// Parent message timestamp; defaults to the bound one
    #[serde(rename = "ts", skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<Timestamp>,
    /// Stop after this many messages, parent included
    #[serde(skip)]
    pub limit: Option<usize>,
    /// Include messages at `latest` and `oldest`
    pub inclusive: bool,
    /// Only replies before this timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<Timestamp>,
    /// Only replies after this timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest: Option<Timestamp>,
}

impl Default for RepliesRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl RepliesRequest {
    /// Replies to the bound message
    pub fn new() -> Self {
        Self {
            channel: None,
            thread_ts: None,
            limit: None,
            inclusive: true,
            latest: None,
            oldest: None,
        }
    }

    /// Replies to another thread
    pub fn thread(mut self, channel: impl Into<ChannelId>, thread_ts: impl Into<Timestamp>) -> Self {
        self.channel = Some(channel.into());
        self.thread_ts = Some(thread_ts.into());
        self
    }

    /// Stop after `limit` messages
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set inclusive bounds
    pub fn inclusive(mut self, inclusive: bool) -> Self {
        self.inclusive = inclusive;
        self
    }

    /// Upper bound
    pub fn latest(mut self, ts: impl Into<Timestamp>) -> Self {
        self.latest = Some(ts.into());
        self
    }

    /// Lower bound
    pub fn oldest(mut self, ts: impl Into<Timestamp>) -> Self {
        self.oldest = Some(ts.into());
        self
    }

    pub(crate) fn page_size(&self) -> Option<u32> {
        self.limit
            .map(|limit| limit.clamp(1, MAX_HISTORY_PAGE as usize) as u32)
    }
}

/// Replace one block of a message and update it
#[derive(Debug, Clone, Default)]
pub struct ReplaceBlockRequest {
    /// Conversation; defaults to the bound one
    pub channel: Option<ChannelId>,
    /// Message timestamp; defaults to the bound one
    pub ts: Option<Timestamp>,
    /// Current blocks; fetched from history when absent
    pub blocks: Option<Vec<Value>>,
    /// Match on `block_id`; takes precedence over `block_type`
    pub block_id: Option<String>,
    /// Match on block `type`
    pub block_type: Option<String>,
    /// Text of the default mrkdwn replacement
    pub text: String,
    /// Replacement block; overrides `text`
    pub new_block: Option<Value>,
    /// `block_id` given to the replacement
    pub new_block_id: Option<String>,
}

impl ReplaceBlockRequest {
    /// Replace the block with this `block_id`
    pub fn by_block_id(block_id: impl Into<String>) -> Self {
        Self {
            block_id: Some(block_id.into()),
            ..Default::default()
        }
    }

    /// Replace the first block of this type
    pub fn by_block_type(block_type: impl Into<String>) -> Self {
        Self {
            block_type: Some(block_type.into()),
            ..Default::default()
        }
    }

    /// Target a specific message
    pub fn message(mut self, channel: impl Into<ChannelId>, ts: impl Into<Timestamp>) -> Self {
        self.channel = Some(channel.into());
        self.ts = Some(ts.into());
        self
    }

    /// Use these blocks instead of fetching the message
    pub fn blocks(mut self, blocks: Vec<Value>) -> Self {
        self.blocks = Some(blocks);
        self
    }

    /// Replacement text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Replacement block
    pub fn new_block(mut self, block: Value) -> Self {
        self.new_block = Some(block);
        self
    }

    /// Id of the replacement block
    pub fn new_block_id(mut self, block_id: impl Into<String>) -> Self {
        self.new_block_id = Some(block_id.into());
        self
    }

    /// The block that goes in; empty text becomes a single space
    pub(crate) fn replacement(&self) -> Value {
        let mut block = self.new_block.clone().unwrap_or_else(|| {
            let text = if self.text.is_empty() { " " } else { self.text.as_str() };
            json!({"type": "section", "text": {"type": "mrkdwn", "text": text}})
        });
        if let (Some(id), Value::Object(map)) = (&self.new_block_id, &mut block) {
            map.insert("block_id".to_string(), json!(id));
        }
        block
    }
}

/// Result of [`ReplaceBlockRequest`]
#[derive(Debug, Clone, PartialEq)]
pub enum ReplaceOutcome {
    /// The block was replaced and the message updated
    Replaced(UpdatedMessage),
    /// Nothing matched; the message was left alone
    BlockNotFound {
        /// `block_id` or `type`
        key: &'static str,
        /// Value searched for
        target: String,
    },
}
