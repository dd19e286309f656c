use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use slack_objects::SlackError;
use wiremock::matchers::query_param;

#[tokio::test]
async fn test_scim_user_uses_scim_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scim/v2/Users"))
        .and(query_param("count", "1"))
        .and(header("Authorization", format!("Bearer {SCIM_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalResults": 1,
            "itemsPerPage": 1,
            "startIndex": 1,
            "Resources": [{"id": "U7", "userName": "ada", "active": true}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client_for(&server)
        .users(None)
        .scim_search_user_by_email("ada@example.com")
        .await
        .unwrap();

    assert_eq!(user.id, "U7");
    assert!(user.active);
}

#[tokio::test]
async fn test_scim_error_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scim/v2/Groups/S404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "Errors": {"code": 404, "description": "group_not_found"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .idp_groups(Some("S404"))
        .get_members(None)
        .await
        .unwrap_err();

    assert!(matches!(err, SlackError::ApiCall(_)));
    assert_eq!(err.http_status(), Some(404));
}
