//! Users wrapper.

use super::{scim, InviteUserRequest, RemovalReport, UsersEndpoints};
use crate::api_caller::{ApiCaller, ApiResponse};
use crate::config::{AccessLevel, SlackObjectsConfig};
use crate::errors::{ConfigurationError, SlackError, SlackResult};
use crate::pagination::paginate;
use crate::services::resolve_id;
use crate::types::{ChannelId, ScimUser, TeamId, User, UserId, UserProfile};
use futures::stream::{BoxStream, StreamExt};
use futures::FutureExt;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Users, optionally bound to one user
#[derive(Debug, Clone)]
pub struct Users {
    endpoints: UsersEndpoints,
    user_id: Option<UserId>,
    config: Arc<SlackObjectsConfig>,
}

impl Users {
    pub(crate) fn new(caller: ApiCaller, user_id: Option<UserId>) -> Self {
        Self {
            config: caller.shared_config(),
            endpoints: UsersEndpoints::new(caller),
            user_id,
        }
    }

    /// Bound user id, if any
    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// A wrapper for the same configuration bound to `user_id`
    pub fn with_user(&self, user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..self.clone()
        }
    }

    /// The endpoint layer
    pub fn endpoints(&self) -> &UsersEndpoints {
        &self.endpoints
    }

    fn resolve(&self, user_id: Option<&str>) -> SlackResult<UserId> {
        resolve_id(user_id, self.user_id.as_ref(), "user_id")
    }

    // Lookups

    /// `users.info` for the given or bound user
    #[instrument(skip(self))]
    pub async fn get_user_info(&self, user_id: Option<&str>) -> SlackResult<User> {
        let uid = self.resolve(user_id)?;
        self.endpoints.users_info(&uid).await
    }

    /// The bound user's record
    pub async fn user(&self) -> SlackResult<User> {
        self.get_user_info(None).await
    }

    /// Find a user by email address
    #[instrument(skip(self, email))]
    pub async fn lookup_by_email(&self, email: &str) -> SlackResult<User> {
        self.endpoints.users_lookup_by_email(email).await
    }

    /// User id for an email address
    ///
    /// Errors such as `users_not_found` are returned as is.
    pub async fn get_user_id_from_email(&self, email: &str) -> SlackResult<UserId> {
        Ok(self.lookup_by_email(email).await?.id)
    }

    /// Profile of the given or bound user
    #[instrument(skip(self))]
    pub async fn get_user_profile(&self, user_id: Option<&str>) -> SlackResult<UserProfile> {
        let uid = self.resolve(user_id)?;
        self.endpoints.users_profile_get(&uid).await
    }

    /// Set one profile field (standard or custom) of the given or bound user
    #[instrument(skip(self, value))]
    pub async fn set_user_profile_field(
        &self,
        field: &str,
        value: impl Into<Value>,
        user_id: Option<&str>,
    ) -> SlackResult<UserProfile> {
        let uid = self.resolve(user_id)?;
        if field.trim().is_empty() {
            return Err(SlackError::invalid_argument("profile field name is empty"));
        }
        self.endpoints.users_profile_set(&uid, field, value.into()).await
    }

    // Classification

    /// Whether the configured contingent-worker label appears in the user's
    /// real name or display name
    pub async fn is_contingent_worker(&self, user_id: Option<&str>) -> SlackResult<bool> {
        let user = self.get_user_info(user_id).await?;
        Ok(user.has_label(self.config.contingent_worker_label()))
    }

    /// Whether the user is a single- or multi-channel guest
    pub async fn is_guest(&self, user_id: Option<&str>) -> SlackResult<bool> {
        Ok(self.get_user_info(user_id).await?.is_guest())
    }

    /// Whether the user is not deactivated
    pub async fn is_active(&self, user_id: Option<&str>) -> SlackResult<bool> {
        Ok(self.get_user_info(user_id).await?.is_active())
    }

    /// Activity as reported by SCIM
    #[instrument(skip(self))]
    pub async fn is_active_scim(&self, user_id: Option<&str>) -> SlackResult<bool> {
        let uid = self.resolve(user_id)?;
        Ok(self.endpoints.scim_get_user(uid.as_str()).await?.active)
    }

    // Workspace and sessions

    /// Sign the user out of every session
    #[instrument(skip(self))]
    pub async fn wipe_all_sessions(&self, user_id: Option<&str>) -> SlackResult<ApiResponse> {
        let uid = self.resolve(user_id)?;
        self.endpoints.admin_users_session_reset(&uid).await
    }

    /// Add an existing org user to a workspace
    #[instrument(skip(self))]
    pub async fn add_to_workspace(&self, team_id: &str, user_id: Option<&str>) -> SlackResult<ApiResponse> {
        let uid = self.resolve(user_id)?;
        self.endpoints
            .admin_users_assign(&TeamId::new(team_id), &uid)
            .await
    }

    /// Remove the user from a workspace
    #[instrument(skip(self))]
    pub async fn remove_from_workspace(
        &self,
        team_id: &str,
        user_id: Option<&str>,
    ) -> SlackResult<ApiResponse> {
        let uid = self.resolve(user_id)?;
        self.endpoints
            .admin_users_remove(&TeamId::new(team_id), &uid)
            .await
    }

    /// Remove the user from every workspace in `team_ids` not listed in `keep`
    ///
    /// Failures are logged and reported per workspace; a missing token
    /// aborts before any call.
    #[instrument(skip(self, team_ids, keep))]
    pub async fn remove_from_workspaces(
        &self,
        team_ids: &[&str],
        keep: &[&str],
        user_id: Option<&str>,
    ) -> SlackResult<RemovalReport<TeamId>> {
        let uid = self.resolve(user_id)?;
        let mut report = RemovalReport::default();
        for team_id in team_ids {
            let team = TeamId::new(*team_id);
            if keep.contains(team_id) {
                report.skipped.push(team);
                continue;
            }
            match self.endpoints.admin_users_remove(&team, &uid).await {
                Ok(_) => report.removed.push(team),
                Err(err @ SlackError::MissingCredential { .. }) => return Err(err),
                Err(err) => {
                    warn!(team = %team, user = %uid, error = %err, "Removal from workspace failed");
                    report.failed.push((team, err));
                }
            }
        }
        Ok(report)
    }

    /// Invite someone to a workspace by email
    #[instrument(skip(self, request), fields(team = %request.team_id))]
    pub async fn invite_user(&self, request: InviteUserRequest) -> SlackResult<ApiResponse> {
        request.validate()?;
        self.endpoints.admin_users_invite(&request).await
    }

    // Conversation membership

    /// Add users to a conversation
    ///
    /// Uses `admin.conversations.invite` when a user token is configured,
    /// otherwise `conversations.invite` with the bot token. An empty list
    /// falls back to the bound user.
    #[instrument(skip(self))]
    pub async fn add_to_conversation(
        &self,
        channel_id: &str,
        user_ids: &[&str],
    ) -> SlackResult<ApiResponse> {
        let users: Vec<UserId> = if user_ids.is_empty() {
            vec![self.resolve(None)?]
        } else {
            user_ids.iter().map(|id| UserId::new(*id)).collect()
        };
        let channel = ChannelId::new(channel_id);
        if self.endpoints.has_user_token() {
            self.endpoints.admin_conversations_invite(&channel, &users).await
        } else {
            debug!("No user token; inviting with conversations.invite");
            self.endpoints.conversations_invite(&channel, &users).await
        }
    }

    /// Remove the user from a conversation
    #[instrument(skip(self))]
    pub async fn remove_from_conversation(
        &self,
        channel_id: &str,
        user_id: Option<&str>,
    ) -> SlackResult<ApiResponse> {
        let uid = self.resolve(user_id)?;
        self.endpoints
            .conversations_kick(&ChannelId::new(channel_id), &uid)
            .await
    }

    /// Remove the user from each conversation in `channel_ids`
    ///
    /// Failures are logged and reported per conversation; a missing token
    /// aborts before any call.
    #[instrument(skip(self, channel_ids))]
    pub async fn remove_from_channels(
        &self,
        channel_ids: &[&str],
        user_id: Option<&str>,
    ) -> SlackResult<RemovalReport<ChannelId>> {
        let uid = self.resolve(user_id)?;
        let mut report = RemovalReport::default();
        for channel_id in channel_ids {
            let channel = ChannelId::new(*channel_id);
            match self.endpoints.conversations_kick(&channel, &uid).await {
                Ok(_) => report.removed.push(channel),
                Err(err @ SlackError::MissingCredential { .. }) => return Err(err),
                Err(err) => {
                    warn!(channel = %channel, user = %uid, error = %err, "Removal from conversation failed");
                    report.failed.push((channel, err));
                }
            }
        }
        Ok(report)
    }

    /// Conversations the user belongs to, as a lazy stream of ids
    ///
    /// With `active_only`, conversations the user has left are skipped.
    pub fn get_channels(
        &self,
        user_id: Option<&str>,
        active_only: bool,
    ) -> SlackResult<BoxStream<'static, SlackResult<ChannelId>>> {
        let uid = self.resolve(user_id)?;
        let endpoints = self.endpoints.clone();
        let memberships = paginate(move |offset: Option<String>| {
            let endpoints = endpoints.clone();
            let uid = uid.clone();
            async move { endpoints.discovery_user_conversations(&uid, offset).await }.boxed()
        });
        Ok(memberships
            .filter_map(move |membership| async move {
                match membership {
                    Ok(m) if active_only && !m.is_active() => None,
                    Ok(m) => Some(Ok(m.id)),
                    Err(e) => Some(Err(e)),
                }
            })
            .boxed())
    }

    // Authorization and guests

    /// Whether the user is in any IdP group granting `level` on `service`
    #[instrument(skip(self))]
    pub async fn is_user_authorized(
        &self,
        service: &str,
        level: AccessLevel,
        user_id: Option<&str>,
    ) -> SlackResult<bool> {
        let uid = self.resolve(user_id)?;
        let groups = self.config.idp_groups_for(service, level);
        if groups.is_empty() {
            debug!(service, "No IdP groups configured for service");
            return Ok(false);
        }
        let idp = self.endpoints.idp_groups();
        for group in groups {
            if idp.is_member(uid.as_str(), Some(group.as_str())).await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Set a guest's expiration to UTC midnight of `date` (`YYYY-MM-DD`)
    #[instrument(skip(self))]
    pub async fn set_guest_expiration_date(
        &self,
        date: &str,
        user_id: Option<&str>,
        team_id: Option<&str>,
    ) -> SlackResult<ApiResponse> {
        if !self.config.supports_guest_expiration() {
            return Err(ConfigurationError::CapabilityUnavailable {
                capability: "guest expiration dates",
                feature: "guest-expiration",
            }
            .into());
        }
        let uid = self.resolve(user_id)?;
        let expiration_ts = midnight_utc(date)?;
        let team = team_id.map(TeamId::new);
        self.endpoints
            .admin_users_set_expiration(&uid, expiration_ts, team.as_ref())
            .await
    }

    // SCIM provisioning

    /// Create a user through SCIM
    #[instrument(skip(self, email))]
    pub async fn scim_create_user(&self, user_name: &str, email: &str) -> SlackResult<ScimUser> {
        if !crate::types::looks_like_email(email) {
            return Err(SlackError::invalid_argument(format!("invalid email {email:?}")));
        }
        let body = scim::create_user(self.config.scim_version(), user_name, email);
        self.endpoints.scim_post_user(body).await
    }

    /// Deactivate the user through SCIM
    #[instrument(skip(self))]
    pub async fn scim_deactivate_user(&self, user_id: Option<&str>) -> SlackResult<()> {
        let uid = self.resolve(user_id)?;
        self.endpoints.scim_delete_user(uid.as_str()).await
    }

    /// Reactivate a deactivated user through SCIM
    pub async fn scim_reactivate_user(&self, user_id: Option<&str>) -> SlackResult<ScimUser> {
        self.scim_update_user_attribute("active", Value::Bool(true), user_id)
            .await
    }

    /// Replace one SCIM attribute of the user
    #[instrument(skip(self, value))]
    pub async fn scim_update_user_attribute(
        &self,
        attribute: &str,
        value: impl Into<Value>,
        user_id: Option<&str>,
    ) -> SlackResult<ScimUser> {
        let uid = self.resolve(user_id)?;
        let body = scim::set_attribute(self.config.scim_version(), attribute, value.into());
        self.endpoints.scim_patch_user(uid.as_str(), body).await
    }

    /// Convert the user into a multi-channel guest
    #[instrument(skip(self))]
    pub async fn make_multi_channel_guest(&self, user_id: Option<&str>) -> SlackResult<ScimUser> {
        let uid = self.resolve(user_id)?;
        let body = scim::multi_channel_guest(self.config.scim_version());
        self.endpoints.scim_patch_user(uid.as_str(), body).await
    }

    /// SCIM user with the given email
    #[instrument(skip(self, email))]
    pub async fn scim_search_user_by_email(&self, email: &str) -> SlackResult<ScimUser> {
        self.scim_search("email", email).await
    }

    /// SCIM user with the given username
    #[instrument(skip(self))]
    pub async fn scim_search_user_by_username(&self, user_name: &str) -> SlackResult<ScimUser> {
        self.scim_search("userName", user_name).await
    }

    async fn scim_search(&self, attribute: &str, value: &str) -> SlackResult<ScimUser> {
        let filter = scim::filter_eq(attribute, value);
        let page = self.endpoints.scim_filter_users(&filter).await?;
        page.resources
            .into_iter()
            .next()
            .ok_or_else(|| SlackError::not_found("SCIM user", format!("{attribute}={value}")))
    }
}

#[cfg(feature = "guest-expiration")]
fn midnight_utc(date: &str) -> SlackResult<i64> {
    let day = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
        SlackError::invalid_argument(format!("invalid date {date:?} (expected YYYY-MM-DD): {e}"))
    })?;
    Ok(day.and_time(chrono::NaiveTime::MIN).and_utc().timestamp())
}

#[cfg(not(feature = "guest-expiration"))]
fn midnight_utc(_date: &str) -> SlackResult<i64> {
    Err(ConfigurationError::CapabilityUnavailable {
        capability: "guest expiration dates",
        feature: "guest-expiration",
    }
    .into())
}
