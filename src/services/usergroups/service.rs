//! Usergroups wrapper.

use super::UsergroupsEndpoints;
use crate::api_caller::ApiCaller;
use crate::errors::SlackResult;
use crate::services::resolve_id;
use crate::types::{TeamId, UserId, Usergroup, UsergroupId};
use tracing::instrument;

/// User groups, optionally bound to one group
///
/// Org-wide tokens need a workspace; set one with [`Usergroups::with_team`].
#[derive(Debug, Clone)]
pub struct Usergroups {
    endpoints: UsergroupsEndpoints,
    usergroup_id: Option<UsergroupId>,
    team_id: Option<TeamId>,
}

impl Usergroups {
    pub(crate) fn new(caller: ApiCaller, usergroup_id: Option<UsergroupId>) -> Self {
        Self {
            endpoints: UsergroupsEndpoints::new(caller),
            usergroup_id,
            team_id: None,
        }
    }

    /// Bound user group id, if any
    pub fn usergroup_id(&self) -> Option<&UsergroupId> {
        self.usergroup_id.as_ref()
    }

    /// A wrapper bound to `usergroup_id`
    pub fn with_usergroup(&self, usergroup_id: impl Into<UsergroupId>) -> Self {
        Self {
            usergroup_id: Some(usergroup_id.into()),
            ..self.clone()
        }
    }

    /// A wrapper scoped to one workspace
    pub fn with_team(&self, team_id: impl Into<TeamId>) -> Self {
        Self {
            team_id: Some(team_id.into()),
            ..self.clone()
        }
    }

    /// The endpoint layer
    pub fn endpoints(&self) -> &UsergroupsEndpoints {
        &self.endpoints
    }

    /// Every user group visible to the bot, in `team` or the scoped workspace
    #[instrument(skip(self))]
    pub async fn list_usergroups(&self, team_id: Option<&str>) -> SlackResult<Vec<Usergroup>> {
        let team = team_id
            .filter(|t| !t.is_empty())
            .map(TeamId::from)
            .or_else(|| self.team_id.clone());
        self.endpoints.usergroups_list(team.as_ref()).await
    }

    /// Member ids of the given or bound group
    #[instrument(skip(self))]
    pub async fn get_members(&self, usergroup_id: Option<&str>) -> SlackResult<Vec<UserId>> {
        let gid = resolve_id(usergroup_id, self.usergroup_id.as_ref(), "usergroup_id")?;
        self.endpoints
            .usergroups_users_list(&gid, self.team_id.as_ref())
            .await
    }

    /// Whether `user_id` belongs to the given or bound group
    pub async fn is_member(&self, user_id: &str, usergroup_id: Option<&str>) -> SlackResult<bool> {
        Ok(self
            .get_members(usergroup_id)
            .await?
            .iter()
            .any(|member| member == user_id))
    }
}
