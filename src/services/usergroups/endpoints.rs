//! One method per usergroups endpoint.

use crate::api_caller::{ApiCaller, ApiRequest};
use crate::errors::SlackResult;
use crate::rate_limits::RateTier;
use crate::types::{TeamId, UserId, Usergroup, UsergroupId};
use tracing::instrument;

/// Endpoints behind the usergroups wrapper
#[derive(Debug, Clone)]
pub struct UsergroupsEndpoints {
    caller: ApiCaller,
}

impl UsergroupsEndpoints {
    pub(crate) fn new(caller: ApiCaller) -> Self {
        Self { caller }
    }

    /// `usergroups.list`
    #[instrument(skip(self))]
    pub async fn usergroups_list(&self, team: Option<&TeamId>) -> SlackResult<Vec<Usergroup>> {
        let request = ApiRequest::web("usergroups.list")
            .rate_tier(RateTier::Tier2)
            .opt_param("team_id", team.map(TeamId::as_str));
        self.caller.call(request).await?.field_or_default("usergroups")
    }

    /// `usergroups.users.list`
    #[instrument(skip(self))]
    pub async fn usergroups_users_list(
        &self,
        usergroup: &UsergroupId,
        team: Option<&TeamId>,
    ) -> SlackResult<Vec<UserId>> {
        let request = ApiRequest::web("usergroups.users.list")
            .rate_tier(RateTier::Tier2)
            .param("usergroup", usergroup.as_str())
            .opt_param("team_id", team.map(TeamId::as_str));
        self.caller.call(request).await?.field_or_default("users")
    }
}
