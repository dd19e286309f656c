//! One method per conversations endpoint.

use super::ListConversationsRequest;
use crate::api_caller::{ApiCaller, ApiRequest};
use crate::auth::TokenKind;
use crate::errors::SlackResult;
use crate::pagination::Page;
use crate::rate_limits::RateTier;
use crate::services::messages::Messages;
use crate::services::{join_ids, to_params};
use crate::types::{ChannelId, Conversation, ConversationMember, MessageCoordinates, TeamId, UserId};
use serde::Deserialize;
use tracing::instrument;

/// Largest page `admin.conversations.search` serves
const SEARCH_PAGE_SIZE: u32 = 20;

/// Page size requested from `discovery.conversations.members`
const DISCOVERY_PAGE_SIZE: u32 = 1000;

/// Discovery returns either bare ids or member records
#[derive(Deserialize)]
#[serde(untagged)]
enum MemberEntry {
    Id(UserId),
    Record(ConversationMember),
}

impl From<MemberEntry> for UserId {
    fn from(entry: MemberEntry) -> Self {
        match entry {
            MemberEntry::Id(id) => id,
            MemberEntry::Record(member) => member.user_id,
        }
    }
}

/// Endpoints behind the conversations wrapper
#[derive(Debug, Clone)]
pub struct ConversationsEndpoints {
    caller: ApiCaller,
}

impl ConversationsEndpoints {
    pub(crate) fn new(caller: ApiCaller) -> Self {
        Self { caller }
    }

    /// Messages wrapper sharing this caller
    pub(crate) fn messages(&self, coordinates: MessageCoordinates) -> Messages {
        Messages::new(self.caller.clone(), Some(coordinates))
    }

    /// `conversations.info`, with the user token when one is configured
    ///
    /// User tokens see private conversations the bot has not joined.
    #[instrument(skip(self))]
    pub async fn conversations_info(&self, channel: &ChannelId) -> SlackResult<Conversation> {
        let token = self
            .caller
            .auth()
            .preferred(&[TokenKind::User, TokenKind::Bot]);
        let request = ApiRequest::web("conversations.info")
            .token(token)
            .rate_tier(RateTier::Tier3)
            .param("channel", channel.as_str());
        self.caller.call(request).await?.field("channel")
    }

    /// `conversations.list`, one page
    #[instrument(skip(self, request))]
    pub async fn conversations_list(
        &self,
        request: &ListConversationsRequest,
        cursor: Option<String>,
    ) -> SlackResult<Page<Conversation>> {
        let call = ApiRequest::web("conversations.list")
            .params(to_params(request)?)
            .opt_param("cursor", cursor);
        let response = self.caller.call(call).await?;
        Ok(Page::new(
            response.field_or_default("channels")?,
            response.next_cursor(),
        ))
    }

    /// `admin.conversations.search`, one page
    #[instrument(skip(self))]
    pub async fn admin_conversations_search(
        &self,
        query: &str,
        team: Option<&TeamId>,
        cursor: Option<String>,
    ) -> SlackResult<Page<Conversation>> {
        let request = ApiRequest::admin("admin.conversations.search")
            .rate_tier(RateTier::Tier2)
            .param("query", query)
            .param("limit", SEARCH_PAGE_SIZE)
            .opt_param("team_ids", team.map(TeamId::as_str))
            .opt_param("cursor", cursor);
        let response = self.caller.call(request).await?;
        Ok(Page::new(
            response.field_or_default("conversations")?,
            response.next_cursor(),
        ))
    }

    /// `admin.conversations.archive`
    #[instrument(skip(self))]
    pub async fn admin_conversations_archive(&self, channel: &ChannelId) -> SlackResult<()> {
        let request = ApiRequest::admin("admin.conversations.archive")
            .rate_tier(RateTier::Tier2)
            .param("channel_id", channel.as_str());
        self.caller.call(request).await.map(|_| ())
    }

    /// `admin.conversations.setTeams`
    #[instrument(skip(self))]
    pub async fn admin_conversations_set_teams(
        &self,
        channel: &ChannelId,
        team: Option<&TeamId>,
        target_teams: &[TeamId],
    ) -> SlackResult<()> {
        let request = ApiRequest::admin("admin.conversations.setTeams")
            .rate_tier(RateTier::Tier2)
            .param("channel_id", channel.as_str())
            .opt_param("team_id", team.map(TeamId::as_str))
            .param("target_team_ids", join_ids(target_teams));
        self.caller.call(request).await.map(|_| ())
    }

    /// `admin.conversations.restrictAccess.addGroup`
    #[instrument(skip(self))]
    pub async fn admin_conversations_restrict_access_add_group(
        &self,
        channel: &ChannelId,
        group_id: &str,
        team: Option<&TeamId>,
    ) -> SlackResult<()> {
        let request = ApiRequest::admin("admin.conversations.restrictAccess.addGroup")
            .rate_tier(RateTier::Tier2)
            .param("channel_id", channel.as_str())
            .param("group_id", group_id)
            .opt_param("team_id", team.map(TeamId::as_str));
        self.caller.call(request).await.map(|_| ())
    }

    /// `discovery.conversations.members`, one page
    #[instrument(skip(self))]
    pub async fn discovery_conversations_members(
        &self,
        channel: &ChannelId,
        team: Option<&TeamId>,
        include_member_left: bool,
        offset: Option<String>,
    ) -> SlackResult<Page<UserId>> {
        let request = ApiRequest::admin("discovery.conversations.members")
            .rate_tier(RateTier::Tier3)
            .param("channel", channel.as_str())
            .param("limit", DISCOVERY_PAGE_SIZE)
            .opt_param("team", team.map(TeamId::as_str))
            .opt_param("include_member_left", include_member_left.then_some(true))
            .opt_param("offset", offset);
        let response = self.caller.call(request).await?;
        let members: Vec<MemberEntry> = response.field_or_default("members")?;
        Ok(Page::new(
            members.into_iter().map(UserId::from).collect(),
            response.next_offset(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, responses};
    use crate::mocks::{MockHttpTransport, MockResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_info_prefers_user_token() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(responses::conversation(&fixtures::conversation())));
        let endpoints = ConversationsEndpoints::new(fixtures::caller(&mock));

        let conversation = endpoints
            .conversations_info(&ChannelId::new("C1234567890"))
            .await
            .unwrap();

        assert_eq!(conversation, fixtures::conversation());
        assert_eq!(
            mock.last_request().unwrap().header("authorization"),
            Some("Bearer xoxp-test-user")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_info_falls_back_to_bot_token() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(responses::conversation(&fixtures::conversation())));
        let mut config = fixtures::config();
        config.user_token = None;
        let endpoints = ConversationsEndpoints::new(fixtures::caller_with(&mock, config));

        endpoints
            .conversations_info(&ChannelId::new("C1234567890"))
            .await
            .unwrap();

        assert_eq!(
            mock.last_request().unwrap().header("authorization"),
            Some("Bearer xoxb-test-bot")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_members_accepts_ids_and_records() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(responses::offset_page(
            "members",
            vec![json!("U1"), json!({"user_id": "U2", "date_left": 0})],
            None,
        )));
        let endpoints = ConversationsEndpoints::new(fixtures::caller(&mock));

        let page = endpoints
            .discovery_conversations_members(&ChannelId::new("C1"), None, true, None)
            .await
            .unwrap();

        assert_eq!(page.items, vec![UserId::new("U1"), UserId::new("U2")]);
        assert_eq!(page.next, None);
        let sent = mock.last_request().unwrap();
        assert_eq!(sent.param("include_member_left"), Some(&json!(true)));
        assert_eq!(sent.param("limit"), Some(&json!(1000)));
    }
}
