//! File records.

use super::{ChannelId, FileId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Slack file metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// File ID
    pub id: FileId,
    /// File name
    #[serde(default)]
    pub name: Option<String>,
    /// Title
    #[serde(default)]
    pub title: Option<String>,
    /// MIME type
    #[serde(default)]
    pub mimetype: Option<String>,
    /// Slack file type (`text`, `png`, ...)
    #[serde(default)]
    pub filetype: Option<String>,
    /// Human readable type
    #[serde(default)]
    pub pretty_type: Option<String>,
    /// Size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    /// Private URL, needs a bearer token
    #[serde(default)]
    pub url_private: Option<String>,
    /// Private download URL
    #[serde(default)]
    pub url_private_download: Option<String>,
    /// Uploader
    #[serde(default)]
    pub user: Option<UserId>,
    /// Channels the file is shared in
    #[serde(default)]
    pub channels: Vec<ChannelId>,
    /// Upload time (Unix seconds)
    #[serde(default)]
    pub created: Option<i64>,
    /// Number of comments
    #[serde(default)]
    pub comments_count: Option<u32>,
    /// Remaining upstream fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl File {
    /// Whether the MIME type is `text/*`
    pub fn is_text(&self) -> bool {
        self.mimetype
            .as_deref()
            .map(|m| m.starts_with("text/"))
            .unwrap_or(false)
    }
}

/// Comment on a file, from `files.info`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileComment {
    /// Comment ID
    #[serde(default)]
    pub id: String,
    /// Author
    #[serde(default)]
    pub user: Option<UserId>,
    /// Comment text
    #[serde(default)]
    pub comment: Option<String>,
    /// Creation time (Unix seconds)
    #[serde(default)]
    pub created: Option<i64>,
}

/// File metadata together with every comment page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileDetails {
    /// File metadata
    pub file: File,
    /// Comments across all pages, in upstream order
    pub comments: Vec<FileComment>,
}
