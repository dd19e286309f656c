use super::*;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use slack_objects::services::conversations::ListConversationsRequest;
use wiremock::matchers::body_partial_json;

#[tokio::test]
async fn test_list_follows_cursor() {
    let server = MockServer::start().await;
    web_method("conversations.list", BOT_TOKEN)
        .and(body_partial_json(json!({"cursor": "page-2"})))
        .respond_with(ok_response(json!({
            "channels": [{"id": "C3", "name": "random"}],
            "response_metadata": {"next_cursor": ""}
        })))
        .expect(1)
        .with_priority(1)
        .mount(&server)
        .await;
    web_method("conversations.list", BOT_TOKEN)
        .respond_with(ok_response(json!({
            "channels": [{"id": "C1", "name": "general"}, {"id": "C2", "name": "dev"}],
            "response_metadata": {"next_cursor": "page-2"}
        })))
        .expect(1)
        .with_priority(2)
        .mount(&server)
        .await;

    let all: Vec<_> = client_for(&server)
        .conversations(None)
        .list_conversations(ListConversationsRequest::new())
        .try_collect()
        .await
        .unwrap();

    let ids: Vec<&str> = all.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["C1", "C2", "C3"]);
}

#[tokio::test]
async fn test_list_request_fields() {
    let server = MockServer::start().await;
    web_method("conversations.list", BOT_TOKEN)
        .and(body_partial_json(json!({
            "exclude_archived": true,
            "team_id": "T1",
            "limit": 200
        })))
        .respond_with(ok_response(json!({"channels": []})))
        .expect(1)
        .mount(&server)
        .await;

    let all: Vec<_> = client_for(&server)
        .conversations(None)
        .list_conversations(
            ListConversationsRequest::new()
                .exclude_archived(true)
                .team_id("T1"),
        )
        .try_collect()
        .await
        .unwrap();

    assert!(all.is_empty());
}
