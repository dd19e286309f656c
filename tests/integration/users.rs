use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use slack_objects::SlackError;
use wiremock::matchers::body_partial_json;

#[tokio::test]
async fn test_user_info_over_http() {
    let server = MockServer::start().await;
    web_method("users.info", BOT_TOKEN)
        .and(body_partial_json(json!({"user": "U0123"})))
        .respond_with(ok_response(json!({
            "user": {
                "id": "U0123",
                "name": "ada",
                "real_name": "Ada Lovelace [External]",
                "is_restricted": true
            }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let users = client_for(&server).users(Some("U0123"));

    assert!(users.is_guest(None).await.unwrap());
    assert!(users.is_contingent_worker(None).await.unwrap());
}

#[tokio::test]
async fn test_platform_error_carries_code() {
    let server = MockServer::start().await;
    web_method("users.info", BOT_TOKEN)
        .respond_with(slack_error("user_not_found"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .users(None)
        .get_user_info(Some("U404"))
        .await
        .unwrap_err();

    assert!(matches!(err, SlackError::ApiCall(_)));
    assert_eq!(err.api_code(), Some("user_not_found"));
    assert_eq!(err.http_status(), Some(200));
}

#[tokio::test]
async fn test_http_status_failure_not_retried() {
    let server = MockServer::start().await;
    web_method("users.info", BOT_TOKEN)
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .users(Some("U1"))
        .user()
        .await
        .unwrap_err();

    assert_eq!(err.http_status(), Some(500));
}
