//! Client factory.
//!
//! [`SlackObjectsClient`] owns the configuration and the transport and hands
//! out entity wrappers that share them. Wrappers are cheap to create; each
//! accessor call returns a fresh one.

use crate::api_caller::ApiCaller;
use crate::config::SlackObjectsConfig;
use crate::errors::SlackResult;
use crate::services::{Conversations, Files, IdpGroups, Messages, Usergroups, Users, Workspaces};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::MessageCoordinates;
use std::sync::Arc;
use tracing::debug;

/// Entry point for the Slack Web, Admin and SCIM APIs
#[derive(Debug, Clone)]
pub struct SlackObjectsClient {
    config: Arc<SlackObjectsConfig>,
    caller: ApiCaller,
}

impl SlackObjectsClient {
    /// Create a client over HTTPS
    pub fn new(config: SlackObjectsConfig) -> SlackResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(config.timeout())?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a client over a caller-supplied transport
    pub fn with_transport(config: SlackObjectsConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let config = Arc::new(config);
        debug!(config = ?config, "Creating Slack objects client");
        Self {
            caller: ApiCaller::new(config.clone(), transport),
            config,
        }
    }

    /// Create a client from `SLACK_*` environment variables
    pub fn from_env() -> SlackResult<Self> {
        Self::new(SlackObjectsConfig::from_env()?)
    }

    /// The configuration
    pub fn config(&self) -> &SlackObjectsConfig {
        &self.config
    }

    /// Raw caller, for endpoints no wrapper covers
    pub fn api(&self) -> &ApiCaller {
        &self.caller
    }

    /// Users wrapper, bound when `user_id` is given
    pub fn users(&self, user_id: Option<&str>) -> Users {
        Users::new(self.caller.clone(), bound(user_id))
    }

    /// Conversations wrapper, bound when `channel_id` is given
    pub fn conversations(&self, channel_id: Option<&str>) -> Conversations {
        Conversations::new(self.caller.clone(), bound(channel_id))
    }

    /// Messages wrapper, bound when `coordinates` are given
    pub fn messages(&self, coordinates: Option<MessageCoordinates>) -> Messages {
        Messages::new(self.caller.clone(), coordinates)
    }

    /// Files wrapper, bound when `file_id` is given
    pub fn files(&self, file_id: Option<&str>) -> Files {
        Files::new(self.caller.clone(), bound(file_id))
    }

    /// Workspaces wrapper, bound when `workspace_id` is given
    pub fn workspaces(&self, workspace_id: Option<&str>) -> Workspaces {
        Workspaces::new(self.caller.clone(), bound(workspace_id))
    }

    /// IdP groups wrapper, bound when `group_id` is given
    pub fn idp_groups(&self, group_id: Option<&str>) -> IdpGroups {
        IdpGroups::new(self.caller.clone(), bound(group_id))
    }

    /// Usergroups wrapper, bound when `usergroup_id` is given
    pub fn usergroups(&self, usergroup_id: Option<&str>) -> Usergroups {
        Usergroups::new(self.caller.clone(), bound(usergroup_id))
    }
}

fn bound<T: for<'a> From<&'a str>>(id: Option<&str>) -> Option<T> {
    id.filter(|id| !id.is_empty()).map(T::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, responses};
    use crate::mocks::{MockHttpTransport, MockResponse};
    use pretty_assertions::assert_eq;

    fn client(mock: &Arc<MockHttpTransport>) -> SlackObjectsClient {
        SlackObjectsClient::with_transport(fixtures::config(), mock.clone())
    }

    #[test]
    fn test_accessors_bind_ids() {
        let mock = Arc::new(MockHttpTransport::new());
        let client = client(&mock);

        assert_eq!(client.users(Some("U1")).user_id().map(|u| u.as_str()), Some("U1"));
        assert_eq!(client.users(Some("")).user_id(), None);
        assert_eq!(client.conversations(None).channel_id(), None);
        assert_eq!(
            client.messages(Some(MessageCoordinates::channel("C1"))).coordinates(),
            Some(&MessageCoordinates::channel("C1"))
        );
        assert_eq!(client.files(Some("F1")).file_id().map(|f| f.as_str()), Some("F1"));
        assert_eq!(client.workspaces(Some("T1")).workspace_id().map(|t| t.as_str()), Some("T1"));
        assert_eq!(client.idp_groups(Some("G1")).group_id().map(|g| g.as_str()), Some("G1"));
        assert_eq!(client.usergroups(Some("S1")).usergroup_id().map(|g| g.as_str()), Some("S1"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrappers_share_transport() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.add_response("users.info", MockResponse::ok_json(responses::user(&fixtures::user())));
        mock.add_response(
            "conversations.info",
            MockResponse::ok_json(responses::conversation(&fixtures::conversation())),
        );
        let client = client(&mock);

        client.users(Some("U1234567890")).user().await.unwrap();
        client.conversations(Some("C1234567890")).info().await.unwrap();

        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn test_debug_hides_tokens() {
        let mock = Arc::new(MockHttpTransport::new());
        let rendered = format!("{:?}", client(&mock));

        assert!(!rendered.contains("xoxb-test-bot"));
        assert!(!rendered.contains("xoxp-test-user"));
    }
}
