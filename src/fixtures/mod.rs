//! Test fixtures for Slack API responses.
//!
//! Provides realistic payloads for unit and integration tests, plus a
//! ready-made configuration and caller wired to a mock transport.

use crate::api_caller::ApiCaller;
use crate::config::{SlackObjectsConfig, SlackObjectsConfigBuilder};
use crate::mocks::MockHttpTransport;
use crate::rate_limits::{RateLimitPolicy, RateTier};
use crate::types::*;
use serde_json::{json, Value};
use std::sync::Arc;

/// Builder with all three tokens and the shortest pacing
pub fn config_builder() -> SlackObjectsConfigBuilder {
    SlackObjectsConfig::builder()
        .bot_token("xoxb-test-bot")
        .and_then(|b| b.user_token("xoxp-test-user"))
        .and_then(|b| b.scim_token("xoxp-test-scim"))
        .unwrap_or_else(|e| panic!("fixture tokens are valid: {e}"))
        .rate_limit_policy(RateLimitPolicy::new())
        .default_rate_tier(RateTier::TierD)
}

/// Configuration with all three tokens
pub fn config() -> SlackObjectsConfig {
    config_builder()
        .build()
        .unwrap_or_else(|e| panic!("fixture config is valid: {e}"))
}

/// Caller over `transport` using [`config`]
pub fn caller(transport: &Arc<MockHttpTransport>) -> ApiCaller {
    caller_with(transport, config())
}

/// Caller over `transport` with an explicit configuration
pub fn caller_with(transport: &Arc<MockHttpTransport>, config: SlackObjectsConfig) -> ApiCaller {
    ApiCaller::new(Arc::new(config), transport.clone())
}

/// Create a fixture user
pub fn user() -> User {
    User {
        id: UserId::new("U1234567890"),
        team_id: Some(TeamId::new("T1234567890")),
        name: Some("testuser".to_string()),
        real_name: Some("Test User".to_string()),
        profile: UserProfile {
            real_name: Some("Test User".to_string()),
            display_name: Some("testuser".to_string()),
            email: Some("test@example.com".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Create a fixture multi-channel guest
pub fn guest_user() -> User {
    User {
        id: UserId::new("U0GUEST0001"),
        is_restricted: true,
        real_name: Some("[External] Guest".to_string()),
        ..user()
    }
}

/// Create a fixture conversation
pub fn conversation() -> Conversation {
    Conversation {
        id: ChannelId::new("C1234567890"),
        name: Some("general".to_string()),
        is_channel: true,
        num_members: Some(42),
        ..Default::default()
    }
}

/// Create a fixture message
pub fn message() -> Message {
    Message {
        message_type: Some("message".to_string()),
        text: Some("Hello, world!".to_string()),
        user: Some(UserId::new("U1234567890")),
        ts: Timestamp::new("1234567890.123456"),
        blocks: vec![
            json!({"type": "header", "block_id": "title", "text": {"type": "plain_text", "text": "Status"}}),
            json!({"type": "section", "block_id": "body", "text": {"type": "mrkdwn", "text": "All good"}}),
        ],
        ..Default::default()
    }
}

/// Create a fixture text file
pub fn file() -> File {
    File {
        id: FileId::new("F1234567890"),
        name: Some("notes.txt".to_string()),
        title: Some("Notes".to_string()),
        mimetype: Some("text/plain".to_string()),
        filetype: Some("text".to_string()),
        size: Some(12),
        url_private: Some("https://files.slack.com/files-pri/T1-F1234567890/notes.txt".to_string()),
        user: Some(UserId::new("U1234567890")),
        channels: vec![ChannelId::new("C1234567890")],
        ..Default::default()
    }
}

/// Create a fixture image file
pub fn image_file() -> File {
    File {
        id: FileId::new("F0IMAGE0001"),
        name: Some("screenshot.png".to_string()),
        mimetype: Some("image/png".to_string()),
        filetype: Some("png".to_string()),
        ..file()
    }
}

/// Create a fixture workspace
pub fn team() -> Team {
    Team {
        id: TeamId::new("T1234567890"),
        name: Some("Acme Corp".to_string()),
        domain: Some("acme".to_string()),
        ..Default::default()
    }
}

/// Canned JSON payloads
pub mod responses {
    use super::*;

    fn to_json<T: serde::Serialize>(value: &T) -> Value {
        serde_json::to_value(value).unwrap_or(Value::Null)
    }

    /// `{"ok": true}`
    pub fn ok() -> Value {
        json!({"ok": true})
    }

    /// Web API error payload
    pub fn error(code: &str) -> Value {
        json!({"ok": false, "error": code})
    }

    /// `users.info` / `users.lookupByEmail` payload
    pub fn user(user: &User) -> Value {
        json!({"ok": true, "user": to_json(user)})
    }

    /// `conversations.info` payload
    pub fn conversation(conversation: &Conversation) -> Value {
        json!({"ok": true, "channel": to_json(conversation)})
    }

    /// `team.info` payload
    pub fn team(team: &Team) -> Value {
        json!({"ok": true, "team": to_json(team)})
    }

    /// `files.info` payload with comments
    pub fn file_info(file: &File, comments: Value, next_cursor: &str) -> Value {
        json!({
            "ok": true,
            "file": to_json(file),
            "comments": comments,
            "response_metadata": {"next_cursor": next_cursor}
        })
    }

    /// A cursor-paginated page; an empty cursor marks the last page
    pub fn cursor_page(key: &str, items: Vec<Value>, next_cursor: &str) -> Value {
        let mut page = json!({"ok": true, "response_metadata": {"next_cursor": next_cursor}});
        page[key] = Value::Array(items);
        page
    }

    /// A Discovery page; `None` marks the last page
    pub fn offset_page(key: &str, items: Vec<Value>, offset: Option<&str>) -> Value {
        let mut page = json!({"ok": true});
        page[key] = Value::Array(items);
        if let Some(offset) = offset {
            page["offset"] = json!(offset);
        }
        page
    }

    /// `conversations.history` page
    pub fn history(messages: &[Message], next_cursor: &str) -> Value {
        let items = messages.iter().map(to_json).collect();
        let mut page = cursor_page("messages", items, next_cursor);
        page["has_more"] = json!(!next_cursor.is_empty());
        page
    }

    /// SCIM user resource
    pub fn scim_user(id: &str, user_name: &str, active: bool) -> Value {
        json!({
            "schemas": ["urn:scim:schemas:core:1.0"],
            "id": id,
            "userName": user_name,
            "active": active,
            "emails": [{"value": format!("{user_name}@example.com"), "primary": true}]
        })
    }

    /// SCIM group resource
    pub fn scim_group(id: &str, name: &str, member_ids: &[&str]) -> Value {
        let members: Vec<Value> = member_ids
            .iter()
            .map(|m| json!({"value": m, "display": format!("user {m}")}))
            .collect();
        json!({
            "schemas": ["urn:scim:schemas:core:1.0"],
            "id": id,
            "displayName": name,
            "members": members
        })
    }

    /// SCIM list page
    pub fn scim_list(resources: Vec<Value>, total: u32, start_index: u32) -> Value {
        json!({
            "schemas": ["urn:scim:schemas:core:1.0"],
            "totalResults": total,
            "itemsPerPage": resources.len(),
            "startIndex": start_index,
            "Resources": resources
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenKind;

    #[test]
    fn test_fixture_config_has_every_token() {
        let config = config();
        assert!(config.has_token(TokenKind::Bot));
        assert!(config.has_token(TokenKind::User));
        assert!(config.has_token(TokenKind::Scim));
        assert_eq!(config.default_rate_tier(), RateTier::TierD);
    }

    #[test]
    fn test_payloads_decode_into_records() {
        let payload = responses::user(&guest_user());
        let decoded: User = serde_json::from_value(payload["user"].clone()).unwrap();
        assert!(decoded.is_guest());

        let page = responses::history(&[message()], "");
        assert_eq!(page["has_more"], false);
        assert_eq!(page["messages"][0]["ts"], "1234567890.123456");
    }
}
