//! Conversations wrapper.

use super::{ConversationsEndpoints, ListConversationsRequest};
use crate::api_caller::ApiCaller;
use crate::errors::{SlackError, SlackResult};
use crate::pagination::paginate;
use crate::services::messages::{HistoryRequest, Messages, RepliesRequest};
use crate::services::resolve_id;
use crate::types::{ChannelId, Conversation, Message, MessageCoordinates, TeamId, UserId};
use futures::stream::{BoxStream, TryStreamExt};
use futures::FutureExt;
use tracing::{info, instrument};

/// Conversations, optionally bound to one conversation
#[derive(Debug, Clone)]
pub struct Conversations {
    endpoints: ConversationsEndpoints,
    channel_id: Option<ChannelId>,
}

impl Conversations {
    pub(crate) fn new(caller: ApiCaller, channel_id: Option<ChannelId>) -> Self {
        Self {
            endpoints: ConversationsEndpoints::new(caller),
            channel_id,
        }
    }

    /// Bound conversation id, if any
    pub fn channel_id(&self) -> Option<&ChannelId> {
        self.channel_id.as_ref()
    }

    /// A wrapper bound to `channel_id`
    pub fn with_channel(&self, channel_id: impl Into<ChannelId>) -> Self {
        Self {
            channel_id: Some(channel_id.into()),
            ..self.clone()
        }
    }

    /// The endpoint layer
    pub fn endpoints(&self) -> &ConversationsEndpoints {
        &self.endpoints
    }

    fn resolve(&self, channel_id: Option<&str>) -> SlackResult<ChannelId> {
        resolve_id(channel_id, self.channel_id.as_ref(), "channel_id")
    }

    /// Every conversation matching `request`
    pub fn list_conversations(
        &self,
        request: ListConversationsRequest,
    ) -> BoxStream<'static, SlackResult<Conversation>> {
        let endpoints = self.endpoints.clone();
        paginate(move |cursor: Option<String>| {
            let endpoints = endpoints.clone();
            let request = request.clone();
            async move { endpoints.conversations_list(&request, cursor).await }.boxed()
        })
    }

    /// `conversations.info` for the given or bound conversation
    #[instrument(skip(self))]
    pub async fn get_conversation_info(&self, channel_id: Option<&str>) -> SlackResult<Conversation> {
        let cid = self.resolve(channel_id)?;
        self.endpoints.conversations_info(&cid).await
    }

    /// The bound conversation's record
    pub async fn info(&self) -> SlackResult<Conversation> {
        self.get_conversation_info(None).await
    }

    /// Whether the conversation is private
    pub async fn is_private(&self, channel_id: Option<&str>) -> SlackResult<bool> {
        Ok(self.get_conversation_info(channel_id).await?.is_private)
    }

    /// Name of the conversation, without `#`
    pub async fn get_conversation_name(&self, channel_id: Option<&str>) -> SlackResult<String> {
        let conversation = self.get_conversation_info(channel_id).await?;
        conversation
            .name
            .ok_or_else(|| SlackError::not_found("conversation name", conversation.id.to_string()))
    }

    /// Ids of every conversation named exactly `name`
    ///
    /// The admin search matches substrings, so results are filtered locally.
    #[instrument(skip(self))]
    pub async fn get_conversation_ids_from_name(
        &self,
        name: &str,
        workspace_id: Option<&str>,
    ) -> SlackResult<Vec<ChannelId>> {
        let team = workspace_id.filter(|w| !w.is_empty()).map(TeamId::from);
        let endpoints = self.endpoints.clone();
        let query = name.to_string();
        let found = paginate(move |cursor: Option<String>| {
            let endpoints = endpoints.clone();
            let query = query.clone();
            let team = team.clone();
            async move {
                endpoints
                    .admin_conversations_search(&query, team.as_ref(), cursor)
                    .await
            }
            .boxed()
        });
        found
            .try_filter_map(|conversation| async move {
                Ok((conversation.name.as_deref() == Some(name)).then_some(conversation.id))
            })
            .try_collect()
            .await
    }

    /// Archive the given or bound conversation
    ///
    /// Upstream errors such as `already_archived` are returned; inspect them
    /// with [`SlackError::api_code`].
    #[instrument(skip(self))]
    pub async fn archive(&self, channel_id: Option<&str>) -> SlackResult<()> {
        let cid = self.resolve(channel_id)?;
        self.endpoints.admin_conversations_archive(&cid).await
    }

    /// Share the conversation to more workspaces
    ///
    /// With `source_workspace`, the conversation stays in the source as well.
    #[instrument(skip(self))]
    pub async fn share_to_workspaces(
        &self,
        target_workspaces: &[&str],
        source_workspace: Option<&str>,
        channel_id: Option<&str>,
    ) -> SlackResult<()> {
        let cid = self.resolve(channel_id)?;
        if target_workspaces.is_empty() {
            return Err(SlackError::invalid_argument("at least one target workspace is required"));
        }
        let source = source_workspace.filter(|s| !s.is_empty()).map(TeamId::from);
        let targets: Vec<TeamId> = source
            .iter()
            .cloned()
            .chain(target_workspaces.iter().copied().map(TeamId::from))
            .collect();
        self.endpoints
            .admin_conversations_set_teams(&cid, source.as_ref(), &targets)
            .await
    }

    /// Move the conversation from `source` to `target`
    ///
    /// Shares to both first, then narrows to the target. A failing first
    /// step leaves the conversation untouched.
    #[instrument(skip(self))]
    pub async fn move_to_workspace(
        &self,
        source_workspace: &str,
        target_workspace: &str,
        channel_id: Option<&str>,
    ) -> SlackResult<()> {
        let cid = self.resolve(channel_id)?;
        let source = TeamId::from(source_workspace);
        let target = TeamId::from(target_workspace);
        self.endpoints
            .admin_conversations_set_teams(&cid, None, &[source.clone(), target.clone()])
            .await?;
        self.endpoints
            .admin_conversations_set_teams(&cid, None, &[target])
            .await?;
        info!(channel = %cid, from = %source, to = %target_workspace, "Moved conversation");
        Ok(())
    }

    /// Restrict the conversation to members of an IdP group
    #[instrument(skip(self))]
    pub async fn restrict_access_add_group(
        &self,
        group_id: &str,
        workspace_id: Option<&str>,
        channel_id: Option<&str>,
    ) -> SlackResult<()> {
        let cid = self.resolve(channel_id)?;
        if group_id.is_empty() {
            return Err(SlackError::invalid_argument("group_id is required"));
        }
        let team = workspace_id.filter(|w| !w.is_empty()).map(TeamId::from);
        self.endpoints
            .admin_conversations_restrict_access_add_group(&cid, group_id, team.as_ref())
            .await
    }

    /// Member ids of the given or bound conversation
    pub fn get_members(
        &self,
        channel_id: Option<&str>,
        workspace_id: Option<&str>,
        include_left: bool,
    ) -> SlackResult<BoxStream<'static, SlackResult<UserId>>> {
        let cid = self.resolve(channel_id)?;
        let team = workspace_id.filter(|w| !w.is_empty()).map(TeamId::from);
        let endpoints = self.endpoints.clone();
        Ok(paginate(move |offset: Option<String>| {
            let endpoints = endpoints.clone();
            let cid = cid.clone();
            let team = team.clone();
            async move {
                endpoints
                    .discovery_conversations_members(&cid, team.as_ref(), include_left, offset)
                    .await
            }
            .boxed()
        }))
    }

    /// Messages wrapper bound to the given or bound conversation
    pub fn messages(&self, channel_id: Option<&str>) -> SlackResult<Messages> {
        let cid = self.resolve(channel_id)?;
        Ok(self.endpoints.messages(MessageCoordinates::channel(cid)))
    }

    /// History of the conversation named in `request`, or the bound one
    pub fn get_messages(
        &self,
        request: HistoryRequest,
    ) -> SlackResult<BoxStream<'static, SlackResult<Message>>> {
        let messages = self.messages(request.channel.as_ref().map(ChannelId::as_str))?;
        messages.get_messages(request)
    }

    /// Replies of a thread in the conversation named in `request`, or the bound one
    pub fn get_message_threads(
        &self,
        request: RepliesRequest,
    ) -> SlackResult<BoxStream<'static, SlackResult<Message>>> {
        let messages = self.messages(request.channel.as_ref().map(ChannelId::as_str))?;
        messages.get_message_threads(request)
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

    fn conversations(mock: &Arc<MockHttpTransport>) -> Conversations {
        Conversations::new(fixtures::caller(mock), None)
    }

    fn channel(id: &str, name: &str) -> serde_json::Value {
        json!({"id": id, "name": name})
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_concatenates_pages() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(responses::cursor_page(
            "channels",
            vec![channel("C1", "a"), channel("C2", "b"), channel("C3", "c")],
            "page2",
        )));
        mock.push_response(MockResponse::ok_json(responses::cursor_page(
            "channels",
            vec![channel("C4", "d"), channel("C5", "e")],
            "",
        )));

        let ids: Vec<String> = conversations(&mock)
            .list_conversations(ListConversationsRequest::new())
            .map_ok(|c| c.id.to_string())
            .try_collect()
            .await
            .unwrap();

        assert_eq!(ids, vec!["C1", "C2", "C3", "C4", "C5"]);
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.requests()[1].param("cursor"), Some(&json!("page2")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ids_from_name_exact_match() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(json!({
            "conversations": [channel("C1", "general"), channel("C2", "general-chat")],
            "next_cursor": "more"
        })));
        mock.push_response(MockResponse::ok_json(json!({
            "conversations": [channel("C3", "general")],
            "next_cursor": ""
        })));

        let ids = conversations(&mock)
            .get_conversation_ids_from_name("general", Some("T1"))
            .await
            .unwrap();

        assert_eq!(ids, vec![ChannelId::new("C1"), ChannelId::new("C3")]);
        let first = &mock.requests()[0];
        assert_eq!(first.param("team_ids"), Some(&json!("T1")));
        assert_eq!(first.param("limit"), Some(&json!(20)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_archive_propagates_already_archived() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::slack_error("already_archived"));

        let err = conversations(&mock)
            .with_channel("C1")
            .archive(None)
            .await
            .unwrap_err();

        assert_eq!(err.api_code(), Some("already_archived"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_share_includes_source() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(responses::ok()));

        conversations(&mock)
            .share_to_workspaces(&["T2", "T3"], Some("T1"), Some("C1"))
            .await
            .unwrap();

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.param("team_id"), Some(&json!("T1")));
        assert_eq!(sent.param("target_team_ids"), Some(&json!("T1,T2,T3")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_is_two_set_teams_calls() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.add_response("admin.conversations.setTeams", MockResponse::ok_json(responses::ok()));

        conversations(&mock)
            .move_to_workspace("T1", "T2", Some("C1"))
            .await
            .unwrap();

        let calls = mock.requests_to("admin.conversations.setTeams");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].param("target_team_ids"), Some(&json!("T1,T2")));
        assert_eq!(calls[1].param("target_team_ids"), Some(&json!("T2")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_stops_after_failed_first_step() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::slack_error("not_allowed"));

        let err = conversations(&mock)
            .move_to_workspace("T1", "T2", Some("C1"))
            .await
            .unwrap_err();

        assert_eq!(err.api_code(), Some("not_allowed"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_members_follows_offset() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(responses::offset_page(
            "members",
            vec![json!("U1"), json!("U2")],
            Some("o2"),
        )));
        mock.push_response(MockResponse::ok_json(responses::offset_page(
            "members",
            vec![json!("U3")],
            None,
        )));

        let members: Vec<UserId> = conversations(&mock)
            .get_members(Some("C1"), Some("T1"), false)
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(members.len(), 3);
        let second = &mock.requests()[1];
        assert_eq!(second.param("offset"), Some(&json!("o2")));
        assert_eq!(second.param("team"), Some(&json!("T1")));
        assert_eq!(second.param("include_member_left"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_messages_delegates_to_bound_channel() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(responses::history(&[fixtures::message()], "")));

        let messages: Vec<Message> = conversations(&mock)
            .with_channel("C9")
            .get_messages(HistoryRequest::new())
            .unwrap()
            .try_collect()
            .await
            .unwrap();

        assert_eq!(messages.len(), 1);
        let sent = mock.last_request().unwrap();
        assert!(sent.is_for("conversations.history"));
        assert_eq!(sent.param("channel"), Some(&json!("C9")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_private() {
        let mock = Arc::new(MockHttpTransport::new());
        let private = Conversation {
            is_private: true,
            ..fixtures::conversation()
        };
        mock.push_response(MockResponse::ok_json(responses::conversation(&private)));

        assert!(conversations(&mock).is_private(Some("C1")).await.unwrap());
    }
}
