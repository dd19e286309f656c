//! One method per workspaces endpoint.

use crate::api_caller::{ApiCaller, ApiRequest};
use crate::errors::SlackResult;
use crate::pagination::Page;
use crate::rate_limits::RateTier;
use crate::types::{Team, TeamId, UserId, WorkspaceUser};
use tracing::instrument;

/// Page size requested from the admin listings
const ADMIN_PAGE_SIZE: u32 = 100;

/// Endpoints behind the workspaces wrapper
#[derive(Debug, Clone)]
pub struct WorkspacesEndpoints {
    caller: ApiCaller,
}

impl WorkspacesEndpoints {
    pub(crate) fn new(caller: ApiCaller) -> Self {
        Self { caller }
    }

    /// `team.info`
    #[instrument(skip(self))]
    pub async fn team_info(&self, team: &TeamId) -> SlackResult<Team> {
        let request = ApiRequest::web("team.info")
            .rate_tier(RateTier::Tier3)
            .param("team", team.as_str());
        self.caller.call(request).await?.field("team")
    }

    /// `admin.teams.list`, one page
    #[instrument(skip(self))]
    pub async fn admin_teams_list(&self, cursor: Option<String>) -> SlackResult<Page<Team>> {
        let request = ApiRequest::admin("admin.teams.list")
            .rate_tier(RateTier::Tier3)
            .param("limit", ADMIN_PAGE_SIZE)
            .opt_param("cursor", cursor);
        let response = self.caller.call(request).await?;
        Ok(Page::new(
            response.field_or_default("teams")?,
            response.next_cursor(),
        ))
    }

    /// `admin.users.list`, one page
    #[instrument(skip(self))]
    pub async fn admin_users_list(
        &self,
        team: &TeamId,
        cursor: Option<String>,
    ) -> SlackResult<Page<WorkspaceUser>> {
        let request = ApiRequest::admin("admin.users.list")
            .rate_tier(RateTier::Tier4)
            .param("team_id", team.as_str())
            .param("limit", ADMIN_PAGE_SIZE)
            .opt_param("cursor", cursor);
        let response = self.caller.call(request).await?;
        Ok(Page::new(
            response.field_or_default("users")?,
            response.next_cursor(),
        ))
    }

    /// `admin.teams.admins.list`, one page
    #[instrument(skip(self))]
    pub async fn admin_teams_admins_list(
        &self,
        team: &TeamId,
        cursor: Option<String>,
    ) -> SlackResult<Page<UserId>> {
        let request = ApiRequest::admin("admin.teams.admins.list")
            .rate_tier(RateTier::Tier3)
            .param("team_id", team.as_str())
            .param("limit", ADMIN_PAGE_SIZE)
            .opt_param("cursor", cursor);
        let response = self.caller.call(request).await?;
        Ok(Page::new(
            response.field_or_default("admin_ids")?,
            response.next_cursor(),
        ))
    }
}
