//! Request types for files.

use crate::types::{ChannelId, TeamId, Timestamp, UserId};
use bytes::Bytes;
use serde::Serialize;

/// Page size requested from `files.list`
pub const DEFAULT_FILES_PAGE_SIZE: u32 = 100;

/// Request to list files (`files.list`)
#[derive(Debug, Clone, Serialize)]
pub struct ListFilesRequest {
    /// Filter by conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelId>,
    /// Filter by uploader
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserId>,
    /// Filter by type (`images`, `pdfs`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<String>,
    /// Created after (Unix seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts_from: Option<i64>,
    /// Created before (Unix seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts_to: Option<i64>,
    /// Workspace, on Enterprise Grid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    /// Page size
    pub count: u32,
}

impl Default for ListFilesRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl ListFilesRequest {
    /// List every visible file
    pub fn new() -> Self {
        Self {
            channel: None,
            user: None,
            types: None,
            ts_from: None,
            ts_to: None,
            team_id: None,
            count: DEFAULT_FILES_PAGE_SIZE,
        }
    }

    /// Filter by conversation
    pub fn channel(mut self, channel: impl Into<ChannelId>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Filter by uploader
    pub fn user(mut self, user: impl Into<UserId>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Filter by type
    pub fn types(mut self, types: impl Into<String>) -> Self {
        self.types = Some(types.into());
        self
    }

    /// Restrict to a creation window
    pub fn between(mut self, from: Option<i64>, to: Option<i64>) -> Self {
        self.ts_from = from;
        self.ts_to = to;
        self
    }

    /// Set the workspace
    pub fn team_id(mut self, team: impl Into<TeamId>) -> Self {
        self.team_id = Some(team.into());
        self
    }

    /// Set the page size
    pub fn count(mut self, n: u32) -> Self {
        self.count = n;
        self
    }
}

/// Content to upload with `upload_to_slack`
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// File content
    pub content: Bytes,
    /// File name, also used to guess the content type
    pub filename: String,
    /// Title shown in Slack
    pub title: Option<String>,
    /// Share into this conversation
    pub channel: Option<ChannelId>,
    /// Share as a reply in this thread
    pub thread_ts: Option<Timestamp>,
    /// Message posted with the file
    pub initial_comment: Option<String>,
    /// Explicit content type
    pub content_type: Option<String>,
}

impl UploadRequest {
    /// Upload `content` as `filename`
    pub fn new(content: impl Into<Bytes>, filename: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            filename: filename.into(),
            title: None,
            channel: None,
            thread_ts: None,
            initial_comment: None,
            content_type: None,
        }
    }

    /// Set title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Share into a conversation
    pub fn channel(mut self, channel: impl Into<ChannelId>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Share into a thread
    pub fn thread_ts(mut self, ts: impl Into<Timestamp>) -> Self {
        self.thread_ts = Some(ts.into());
        self
    }

    /// Set initial comment
    pub fn initial_comment(mut self, comment: impl Into<String>) -> Self {
        self.initial_comment = Some(comment.into());
        self
    }

    /// Override the guessed content type
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Explicit content type, else a guess from the file name
    pub(crate) fn resolved_content_type(&self) -> String {
        self.content_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.filename)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("report.csv", "text/csv"; "csv")]
    #[test_case("notes.txt", "text/plain"; "text")]
    #[test_case("photo.png", "image/png"; "png")]
    #[test_case("blob", "application/octet-stream"; "no extension")]
    fn test_guessed_content_type(filename: &str, expected: &str) {
        assert_eq!(UploadRequest::new("x", filename).resolved_content_type(), expected);
    }

    #[test]
    fn test_explicit_content_type_wins() {
        let request = UploadRequest::new("x", "notes.txt").content_type("text/markdown");
        assert_eq!(request.resolved_content_type(), "text/markdown");
    }
}
