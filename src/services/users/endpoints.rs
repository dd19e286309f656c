//! One method per users endpoint.
//!
//! Each method issues exactly one call through the [`ApiCaller`]; paginated
//! endpoints return one [`Page`] per call.

use super::InviteUserRequest;
use crate::api_caller::{ApiCaller, ApiRequest, ApiResponse};
use crate::auth::TokenKind;
use crate::errors::SlackResult;
use crate::pagination::Page;
use crate::rate_limits::RateTier;
use crate::services::idp_groups::IdpGroups;
use crate::services::join_ids;
use crate::types::{
    validate_scim_id, ChannelId, ConversationMembership, ScimListResponse, ScimUser, TeamId, User,
    UserId, UserProfile,
};
use http::Method;
use serde_json::Value;
use tracing::instrument;

/// Page size requested from `discovery.user.conversations`
const DISCOVERY_PAGE_SIZE: u32 = 1000;

/// Endpoints behind the users wrapper
#[derive(Debug, Clone)]
pub struct UsersEndpoints {
    caller: ApiCaller,
}

impl UsersEndpoints {
    pub(crate) fn new(caller: ApiCaller) -> Self {
        Self { caller }
    }

    /// IdP groups wrapper sharing this caller
    pub(crate) fn idp_groups(&self) -> IdpGroups {
        IdpGroups::new(self.caller.clone(), None)
    }

    /// `users.info`
    #[instrument(skip(self))]
    pub async fn users_info(&self, user: &UserId) -> SlackResult<User> {
        let request = ApiRequest::web("users.info").param("user", user.as_str());
        self.caller.call(request).await?.field("user")
    }

    /// `users.lookupByEmail`
    #[instrument(skip(self, email))]
    pub async fn users_lookup_by_email(&self, email: &str) -> SlackResult<User> {
        let request = ApiRequest::web("users.lookupByEmail")
            .rate_tier(RateTier::Tier3)
            .param("email", email);
        self.caller.call(request).await?.field("user")
    }

    /// `users.profile.get`
    #[instrument(skip(self))]
    pub async fn users_profile_get(&self, user: &UserId) -> SlackResult<UserProfile> {
        let request = ApiRequest::web("users.profile.get")
            .rate_tier(RateTier::Tier4)
            .param("user", user.as_str());
        self.caller.call(request).await?.field("profile")
    }

    /// `users.profile.set`, with the user token
    #[instrument(skip(self, value))]
    pub async fn users_profile_set(
        &self,
        user: &UserId,
        field: &str,
        value: Value,
    ) -> SlackResult<UserProfile> {
        let mut profile = serde_json::Map::new();
        profile.insert(field.to_string(), value);
        let request = ApiRequest::web("users.profile.set")
            .token(TokenKind::User)
            .rate_tier(RateTier::Tier3)
            .param("user", user.as_str())
            .param("profile", Value::Object(profile));
        self.caller.call(request).await?.field_or_default("profile")
    }

    /// `conversations.invite`
    #[instrument(skip(self))]
    pub async fn conversations_invite(
        &self,
        channel: &ChannelId,
        users: &[UserId],
    ) -> SlackResult<ApiResponse> {
        let request = ApiRequest::web("conversations.invite")
            .param("channel", channel.as_str())
            .param("users", join_ids(users));
        self.caller.call(request).await
    }

    /// `conversations.kick`
    #[instrument(skip(self))]
    pub async fn conversations_kick(&self, channel: &ChannelId, user: &UserId) -> SlackResult<ApiResponse> {
        let request = ApiRequest::web("conversations.kick")
            .param("channel", channel.as_str())
            .param("user", user.as_str());
        self.caller.call(request).await
    }

    /// `admin.users.invite`
    #[instrument(skip(self, request), fields(team = %request.team_id))]
    pub async fn admin_users_invite(&self, request: &InviteUserRequest) -> SlackResult<ApiResponse> {
        let call = ApiRequest::admin("admin.users.invite")
            .rate_tier(RateTier::Tier2)
            .params(request.to_params());
        self.caller.call(call).await
    }

    /// `admin.users.session.reset`
    #[instrument(skip(self))]
    pub async fn admin_users_session_reset(&self, user: &UserId) -> SlackResult<ApiResponse> {
        let request = ApiRequest::admin("admin.users.session.reset")
            .rate_tier(RateTier::Tier2)
            .param("user_id", user.as_str());
        self.caller.call(request).await
    }

    /// `admin.users.assign`
    #[instrument(skip(self))]
    pub async fn admin_users_assign(&self, team: &TeamId, user: &UserId) -> SlackResult<ApiResponse> {
        let request = ApiRequest::admin("admin.users.assign")
            .rate_tier(RateTier::Tier2)
            .param("team_id", team.as_str())
            .param("user_id", user.as_str());
        self.caller.call(request).await
    }

    /// `admin.users.remove`
    #[instrument(skip(self))]
    pub async fn admin_users_remove(&self, team: &TeamId, user: &UserId) -> SlackResult<ApiResponse> {
        let request = ApiRequest::admin("admin.users.remove")
            .rate_tier(RateTier::Tier2)
            .param("team_id", team.as_str())
            .param("user_id", user.as_str());
        self.caller.call(request).await
    }

    /// `admin.users.setExpiration`
    #[instrument(skip(self))]
    pub async fn admin_users_set_expiration(
        &self,
        user: &UserId,
        expiration_ts: i64,
        team: Option<&TeamId>,
    ) -> SlackResult<ApiResponse> {
        let request = ApiRequest::admin("admin.users.setExpiration")
            .rate_tier(RateTier::Tier2)
            .param("user_id", user.as_str())
            .param("expiration_ts", expiration_ts)
            .opt_param("team_id", team.map(TeamId::as_str));
        self.caller.call(request).await
    }

    /// `admin.conversations.invite`
    #[instrument(skip(self))]
    pub async fn admin_conversations_invite(
        &self,
        channel: &ChannelId,
        users: &[UserId],
    ) -> SlackResult<ApiResponse> {
        let request = ApiRequest::admin("admin.conversations.invite")
            .rate_tier(RateTier::Tier2)
            .param("channel_id", channel.as_str())
            .param("user_ids", join_ids(users));
        self.caller.call(request).await
    }

    /// `discovery.user.conversations`, one page
    #[instrument(skip(self))]
    pub async fn discovery_user_conversations(
        &self,
        user: &UserId,
        offset: Option<String>,
    ) -> SlackResult<Page<ConversationMembership, String>> {
        let request = ApiRequest::admin("discovery.user.conversations")
            .param("user", user.as_str())
            .param("limit", DISCOVERY_PAGE_SIZE)
            .opt_param("offset", offset);
        let response = self.caller.call(request).await?;
        Ok(Page::new(
            response.field_or_default("channels")?,
            response.next_offset(),
        ))
    }

    /// `GET Users/{id}`
    #[instrument(skip(self))]
    pub async fn scim_get_user(&self, id: &str) -> SlackResult<ScimUser> {
        let id = validate_scim_id(id)?;
        let request = ApiRequest::scim(Method::GET, format!("Users/{id}"));
        self.caller.call(request).await?.decode()
    }

    /// `GET Users?filter=`
    #[instrument(skip(self))]
    pub async fn scim_filter_users(&self, filter: &str) -> SlackResult<ScimListResponse<ScimUser>> {
        let request = ApiRequest::scim(Method::GET, "Users")
            .query("filter", filter)
            .query("count", 1);
        self.caller.call(request).await?.decode()
    }

    /// `POST Users`
    #[instrument(skip(self, body))]
    pub async fn scim_post_user(&self, body: Value) -> SlackResult<ScimUser> {
        let request = ApiRequest::scim(Method::POST, "Users").body(body);
        self.caller.call(request).await?.decode()
    }

    /// `PATCH Users/{id}`
    #[instrument(skip(self, body))]
    pub async fn scim_patch_user(&self, id: &str, body: Value) -> SlackResult<ScimUser> {
        let id = validate_scim_id(id)?;
        let request = ApiRequest::scim(Method::PATCH, format!("Users/{id}")).body(body);
        self.caller.call(request).await?.decode()
    }

    /// `DELETE Users/{id}`
    #[instrument(skip(self))]
    pub async fn scim_delete_user(&self, id: &str) -> SlackResult<()> {
        let id = validate_scim_id(id)?;
        let request = ApiRequest::scim(Method::DELETE, format!("Users/{id}"));
        self.caller.call(request).await.map(|_| ())
    }

    pub(crate) fn has_user_token(&self) -> bool {
        self.caller.auth().has_token(TokenKind::User)
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
    async fn test_profile_set_uses_user_token() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(json!({"profile": {"status_text": "away"}})));
        let endpoints = UsersEndpoints::new(fixtures::caller(&mock));

        let profile = endpoints
            .users_profile_set(&UserId::new("U1"), "status_text", json!("away"))
            .await
            .unwrap();

        assert_eq!(profile.status_text.as_deref(), Some("away"));
        let sent = mock.last_request().unwrap();
        assert_eq!(sent.header("authorization"), Some("Bearer xoxp-test-user"));
        assert_eq!(sent.body, Some(json!({"user": "U1", "profile": {"status_text": "away"}})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_discovery_offset_page() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::ok_json(fixtures::responses::offset_page(
            "channels",
            vec![json!({"id": "C1", "date_left": 0})],
            Some("next-offset"),
        )));
        let endpoints = UsersEndpoints::new(fixtures::caller(&mock));

        let page = endpoints
            .discovery_user_conversations(&UserId::new("U1"), Some("prev".to_string()))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.next.as_deref(), Some("next-offset"));
        let sent = mock.last_request().unwrap();
        assert_eq!(sent.param("offset"), Some(&json!("prev")));
        assert_eq!(sent.header("authorization"), Some("Bearer xoxp-test-user"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scim_delete_path() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::text(204, ""));
        let endpoints = UsersEndpoints::new(fixtures::caller(&mock));

        endpoints.scim_delete_user("U1").await.unwrap();

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.method, Method::DELETE);
        assert_eq!(sent.url, "https://api.slack.com/scim/v2/Users/U1");
    }
}
