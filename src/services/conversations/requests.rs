//! Request types for conversations.

use crate::types::TeamId;
use serde::Serialize;

/// Page size requested from `conversations.list`
pub const DEFAULT_LIST_PAGE_SIZE: u32 = 200;

/// Conversation type filter for `conversations.list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversationType {
    /// Public channel
    PublicChannel,
    /// Private channel
    PrivateChannel,
    /// Multi-party direct message
    Mpim,
    /// Direct message
    Im,
}

impl ConversationType {
    /// Filter value used by the API
    pub fn as_api_filter(&self) -> &'static str {
        match self {
            Self::PublicChannel => "public_channel",
            Self::PrivateChannel => "private_channel",
            Self::Mpim => "mpim",
            Self::Im => "im",
        }
    }
}

/// Request to list conversations (`conversations.list`)
#[derive(Debug, Clone, Serialize)]
pub struct ListConversationsRequest {
    /// Exclude archived channels
    pub exclude_archived: bool,
    /// Page size
    pub limit: u32,
    /// Workspace, on Enterprise Grid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<TeamId>,
    /// Comma-separated conversation types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<String>,
}

impl Default for ListConversationsRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl ListConversationsRequest {
    /// List public channels, archived included
    pub fn new() -> Self {
        Self {
            exclude_archived: false,
            limit: DEFAULT_LIST_PAGE_SIZE,
            team_id: None,
            types: None,
        }
    }

    /// Exclude archived channels
    pub fn exclude_archived(mut self, exclude: bool) -> Self {
        self.exclude_archived = exclude;
        self
    }

    /// Set the page size
    pub fn limit(mut self, n: u32) -> Self {
        self.limit = n;
        self
    }

    /// Set the workspace
    pub fn team_id(mut self, id: impl Into<TeamId>) -> Self {
        self.team_id = Some(id.into());
        self
    }

    /// Set conversation types
    pub fn types(mut self, types: &[ConversationType]) -> Self {
        self.types = Some(
            types
                .iter()
                .map(|t| t.as_api_filter())
                .collect::<Vec<_>>()
                .join(","),
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::to_params;
    use serde_json::json;

    #[test]
    fn test_list_request_params() {
        let request = ListConversationsRequest::new()
            .exclude_archived(true)
            .types(&[ConversationType::PublicChannel, ConversationType::PrivateChannel]);
        let params = to_params(&request).unwrap();

        assert_eq!(params["types"], json!("public_channel,private_channel"));
        assert_eq!(params["limit"], json!(200));
        assert!(!params.contains_key("team_id"));
    }
}
