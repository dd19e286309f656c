use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use slack_objects::services::messages::UpdateMessageRequest;
use slack_objects::MessageCoordinates;
use wiremock::matchers::body_partial_json;

#[tokio::test]
async fn test_update_then_delete() {
    let server = MockServer::start().await;
    web_method("chat.update", BOT_TOKEN)
        .and(body_partial_json(json!({"channel": "C1", "ts": "1.5", "text": "edited"})))
        .respond_with(ok_response(json!({"channel": "C1", "ts": "1.5", "text": "edited"})))
        .expect(1)
        .mount(&server)
        .await;
    web_method("chat.delete", BOT_TOKEN)
        .and(body_partial_json(json!({"channel": "C1", "ts": "1.5"})))
        .respond_with(ok_response(json!({"channel": "C1", "ts": "1.5"})))
        .expect(1)
        .mount(&server)
        .await;

    let messages = client_for(&server).messages(Some(MessageCoordinates::message("C1", "1.5")));
    let updated = messages
        .update_message(UpdateMessageRequest::new().text("edited"))
        .await
        .unwrap();
    messages.delete_message(None, None).await.unwrap();

    assert_eq!(updated.ts.as_str(), "1.5");
}
