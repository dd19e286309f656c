//! Behavior shared by every entity wrapper.

use crate::auth::TokenKind;
use crate::client::SlackObjectsClient;
use crate::config::SlackObjectsConfig;
use crate::errors::SlackError;
use crate::fixtures::{self, responses};
use crate::mocks::{MockHttpTransport, MockResponse};
use crate::services::conversations::ListConversationsRequest;
use crate::types::Conversation;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn client_with(mock: &Arc<MockHttpTransport>, config: SlackObjectsConfig) -> SlackObjectsClient {
    SlackObjectsClient::with_transport(config, mock.clone())
}

fn client(mock: &Arc<MockHttpTransport>) -> SlackObjectsClient {
    client_with(mock, fixtures::config())
}

fn bot_only() -> SlackObjectsConfig {
    fixtures::config_builder()
        .build()
        .map(|mut config| {
            config.user_token = None;
            config.scim_token = None;
            config
        })
        .unwrap()
}

fn conversation_pages(mock: &MockHttpTransport) {
    let page = |ids: &[&str], cursor: &str| {
        let items = ids.iter().map(|id| json!({"id": id})).collect();
        MockResponse::ok_json(responses::cursor_page("channels", items, cursor))
    };
    mock.push_response(page(&["C1", "C2", "C3"], "next"));
    mock.push_response(page(&["C4", "C5"], ""));
}

#[tokio::test(start_paused = true)]
async fn test_bound_and_unbound_results_match() {
    let mock = Arc::new(MockHttpTransport::new());
    mock.add_response("users.info", MockResponse::ok_json(responses::user(&fixtures::user())));
    mock.add_response(
        "conversations.info",
        MockResponse::ok_json(responses::conversation(&fixtures::conversation())),
    );
    mock.add_response("team.info", MockResponse::ok_json(responses::team(&fixtures::team())));
    let client = client(&mock);

    assert_eq!(
        client.users(None).is_guest(Some("U1234567890")).await.unwrap(),
        client.users(Some("U1234567890")).is_guest(None).await.unwrap()
    );
    assert_eq!(
        client.conversations(None).get_conversation_info(Some("C1234567890")).await.unwrap(),
        client.conversations(Some("C1234567890")).info().await.unwrap()
    );
    assert_eq!(
        client.workspaces(None).get_workspace_info(Some("T1234567890")).await.unwrap(),
        client.workspaces(Some("T1234567890")).info().await.unwrap()
    );
}

#[tokio::test(start_paused = true)]
async fn test_listing_concatenates_and_restarts() {
    let mock = Arc::new(MockHttpTransport::new());
    conversation_pages(&mock);
    conversation_pages(&mock);
    let conversations = client(&mock).conversations(None);

    let first: Vec<Conversation> = conversations
        .list_conversations(ListConversationsRequest::new())
        .try_collect()
        .await
        .unwrap();
    let second: Vec<Conversation> = conversations
        .list_conversations(ListConversationsRequest::new())
        .try_collect()
        .await
        .unwrap();

    let ids: Vec<&str> = first.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["C1", "C2", "C3", "C4", "C5"]);
    assert_eq!(first, second);
    let cursors: Vec<_> = mock.requests().iter().map(|r| r.param("cursor").cloned()).collect();
    assert_eq!(cursors, vec![None, Some(json!("next")), None, Some(json!("next"))]);
}

#[tokio::test(start_paused = true)]
async fn test_missing_scim_token_names_field() {
    let mock = Arc::new(MockHttpTransport::new());

    let err = client_with(&mock, bot_only())
        .idp_groups(Some("G1"))
        .get_members(None)
        .await
        .unwrap_err();

    assert!(matches!(err, SlackError::MissingCredential { kind: TokenKind::Scim }));
    assert!(err.to_string().contains("scim_token"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_missing_user_token_for_admin_methods() {
    let mock = Arc::new(MockHttpTransport::new());

    let err = client_with(&mock, bot_only())
        .conversations(Some("C1"))
        .archive(None)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("user_token"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_http_failure_single_attempt() {
    let mock = Arc::new(MockHttpTransport::new());
    mock.with_default_response(MockResponse::http_error(503, "service_unavailable"));

    let err = client(&mock)
        .usergroups(Some("S1"))
        .get_members(None)
        .await
        .unwrap_err();

    assert_eq!(err.http_status(), Some(503));
    assert_eq!(err.api_code(), Some("service_unavailable"));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_orchestration_call_counts() {
    let mock = Arc::new(MockHttpTransport::new());
    mock.add_response("users.info", MockResponse::ok_json(responses::user(&fixtures::user())));
    mock.add_response("admin.conversations.setTeams", MockResponse::ok_json(responses::ok()));
    let client = client(&mock);

    client.users(Some("U1234567890")).is_active(None).await.unwrap();
    assert_eq!(mock.call_count(), 1);

    client
        .conversations(Some("C1"))
        .move_to_workspace("T1", "T2", None)
        .await
        .unwrap();
    assert_eq!(mock.call_count(), 3);
}
