//! One method per messages endpoint.

use super::{HistoryRequest, RepliesRequest, UpdateMessageRequest};
use crate::api_caller::{ApiCaller, ApiRequest};
use crate::errors::SlackResult;
use crate::pagination::Page;
use crate::services::to_params;
use crate::types::{ChannelId, Message, Timestamp, UpdatedMessage};
use tracing::instrument;

/// Endpoints behind the messages wrapper
#[derive(Debug, Clone)]
pub struct MessagesEndpoints {
    caller: ApiCaller,
}

impl MessagesEndpoints {
    pub(crate) fn new(caller: ApiCaller) -> Self {
        Self { caller }
    }

    /// `chat.update`; channel and ts must already be set
    #[instrument(skip(self, request), fields(channel = ?request.channel, ts = ?request.ts))]
    pub async fn chat_update(&self, request: &UpdateMessageRequest) -> SlackResult<UpdatedMessage> {
        let call = ApiRequest::web("chat.update").params(to_params(request)?);
        self.caller.call(call).await?.decode()
    }

    /// `chat.delete`
    #[instrument(skip(self))]
    pub async fn chat_delete(&self, channel: &ChannelId, ts: &Timestamp) -> SlackResult<()> {
        let request = ApiRequest::web("chat.delete")
            .param("channel", channel.as_str())
            .param("ts", ts.as_str());
        self.caller.call(request).await.map(|_| ())
    }

    /// `conversations.history`, one page
    #[instrument(skip(self, request), fields(channel = ?request.channel))]
    pub async fn conversations_history(
        &self,
        request: &HistoryRequest,
        cursor: Option<String>,
    ) -> SlackResult<Page<Message>> {
        let call = ApiRequest::web("conversations.history")
            .params(to_params(request)?)
            .opt_param("limit", request.page_size())
            .opt_param("cursor", cursor);
        let response = self.caller.call(call).await?;
        Ok(Page::new(
            response.field_or_default("messages")?,
            response.next_cursor(),
        ))
    }

    /// `conversations.replies`, one page
    #[instrument(skip(self, request), fields(channel = ?request.channel, ts = ?request.thread_ts))]
    pub async fn conversations_replies(
        &self,
        request: &RepliesRequest,
        cursor: Option<String>,
    ) -> SlackResult<Page<Message>> {
        let call = ApiRequest::web("conversations.replies")
            .params(to_params(request)?)
            .opt_param("limit", request.page_size())
            .opt_param("cursor", cursor);
        let response = self.caller.call(call).await?;
        Ok(Page::new(
            response.field_or_default("messages")?,
            response.next_cursor(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::mocks::{MockHttpTransport, MockResponse};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_history_page_params() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(fixtures::responses::history(
            &[fixtures::message()],
            "next",
        )));
        let endpoints = MessagesEndpoints::new(fixtures::caller(&mock));

        let request = HistoryRequest::new().channel("C1").limit(1).latest("1.5");
        let page = endpoints
            .conversations_history(&request, Some("abc".to_string()))
            .await
            .unwrap();

        assert_eq!(page.items, vec![fixtures::message()]);
        assert_eq!(page.next.as_deref(), Some("next"));
        let sent = mock.last_request().unwrap();
        assert_eq!(
            sent.body,
            Some(json!({
                "channel": "C1",
                "inclusive": true,
                "latest": "1.5",
                "include_all_metadata": false,
                "limit": 1,
                "cursor": "abc"
            }))
        );
        assert_eq!(sent.header("authorization"), Some("Bearer xoxb-test-bot"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_chat_update_decodes_message() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(
            json!({"channel": "C1", "ts": "1.2", "text": "edited", "message": {"text": "edited"}}),
        ));
        let endpoints = MessagesEndpoints::new(fixtures::caller(&mock));

        let updated = endpoints
            .chat_update(&UpdateMessageRequest::new().message("C1", "1.2").text("edited"))
            .await
            .unwrap();

        assert_eq!(updated.channel, "C1");
        assert_eq!(updated.text.as_deref(), Some("edited"));
        assert_eq!(mock.last_request().unwrap().param("as_user"), Some(&json!(true)));
    }
}
