//! Workspaces wrapper.

use super::WorkspacesEndpoints;
use crate::api_caller::ApiCaller;
use crate::errors::{SlackError, SlackResult};
use crate::pagination::paginate;
use crate::services::resolve_id;
use crate::types::{Team, TeamId, UserId, WorkspaceUser};
use futures::stream::{BoxStream, TryStreamExt};
use futures::FutureExt;
use tracing::instrument;

/// Workspaces of an Enterprise Grid org, optionally bound to one workspace
#[derive(Debug, Clone)]
pub struct Workspaces {
    endpoints: WorkspacesEndpoints,
    workspace_id: Option<TeamId>,
}

impl Workspaces {
    pub(crate) fn new(caller: ApiCaller, workspace_id: Option<TeamId>) -> Self {
        Self {
            endpoints: WorkspacesEndpoints::new(caller),
            workspace_id,
        }
    }

    /// Bound workspace id, if any
    pub fn workspace_id(&self) -> Option<&TeamId> {
        self.workspace_id.as_ref()
    }

    /// A wrapper bound to `workspace_id`
    pub fn with_workspace(&self, workspace_id: impl Into<TeamId>) -> Self {
        Self {
            workspace_id: Some(workspace_id.into()),
            ..self.clone()
        }
    }

    /// The endpoint layer
    pub fn endpoints(&self) -> &WorkspacesEndpoints {
        &self.endpoints
    }

    fn resolve(&self, workspace_id: Option<&str>) -> SlackResult<TeamId> {
        resolve_id(workspace_id, self.workspace_id.as_ref(), "workspace_id")
    }

    /// `team.info` for the given or bound workspace
    #[instrument(skip(self))]
    pub async fn get_workspace_info(&self, workspace_id: Option<&str>) -> SlackResult<Team> {
        let wid = self.resolve(workspace_id)?;
        self.endpoints.team_info(&wid).await
    }

    /// The bound workspace's record
    pub async fn info(&self) -> SlackResult<Team> {
        self.get_workspace_info(None).await
    }

    /// Every workspace of the org
    pub fn list_workspaces(&self) -> BoxStream<'static, SlackResult<Team>> {
        let endpoints = self.endpoints.clone();
        paginate(move |cursor: Option<String>| {
            let endpoints = endpoints.clone();
            async move { endpoints.admin_teams_list(cursor).await }.boxed()
        })
    }

    async fn find_workspace<P>(&self, matches: P) -> SlackResult<Option<Team>>
    where
        P: Fn(&Team) -> bool,
    {
        let mut workspaces = self.list_workspaces();
        while let Some(team) = workspaces.try_next().await? {
            if matches(&team) {
                return Ok(Some(team));
            }
        }
        Ok(None)
    }

    /// Name of the given or bound workspace, from the org listing
    #[instrument(skip(self))]
    pub async fn get_workspace_name(&self, workspace_id: Option<&str>) -> SlackResult<String> {
        let wid = self.resolve(workspace_id)?;
        self.find_workspace(|team| team.id == wid)
            .await?
            .and_then(|team| team.name)
            .ok_or_else(|| SlackError::not_found("workspace", wid.to_string()))
    }

    /// Workspace whose name matches `name`, ignoring case and surrounding whitespace
    #[instrument(skip(self))]
    pub async fn get_workspace_from_name(&self, name: &str) -> SlackResult<Team> {
        self.find_workspace(|team| team.is_named(name))
            .await?
            .ok_or_else(|| SlackError::not_found("workspace", name.trim()))
    }

    /// Id of the workspace named `name`
    pub async fn get_workspace_id(&self, name: &str) -> SlackResult<TeamId> {
        Ok(self.get_workspace_from_name(name).await?.id)
    }

    /// Members of the given or bound workspace
    pub fn list_users(
        &self,
        workspace_id: Option<&str>,
    ) -> SlackResult<BoxStream<'static, SlackResult<WorkspaceUser>>> {
        let wid = self.resolve(workspace_id)?;
        let endpoints = self.endpoints.clone();
        Ok(paginate(move |cursor: Option<String>| {
            let endpoints = endpoints.clone();
            let wid = wid.clone();
            async move { endpoints.admin_users_list(&wid, cursor).await }.boxed()
        }))
    }

    /// Admin user ids of the given or bound workspace
    pub fn list_admin_ids(
        &self,
        workspace_id: Option<&str>,
    ) -> SlackResult<BoxStream<'static, SlackResult<UserId>>> {
        let wid = self.resolve(workspace_id)?;
        let endpoints = self.endpoints.clone();
        Ok(paginate(move |cursor: Option<String>| {
            let endpoints = endpoints.clone();
            let wid = wid.clone();
            async move { endpoints.admin_teams_admins_list(&wid, cursor).await }.boxed()
        }))
    }
}
