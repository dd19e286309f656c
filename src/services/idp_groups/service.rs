//! IdP groups wrapper.

use super::IdpGroupsEndpoints;
use crate::api_caller::ApiCaller;
use crate::config::SlackObjectsConfig;
use crate::errors::SlackResult;
use crate::pagination::{paginate, Page};
use crate::services::resolve_id;
use crate::types::{GroupId, GroupMember, GroupSummary};
use futures::stream::BoxStream;
use futures::FutureExt;
use std::sync::Arc;
use tracing::instrument;

/// Default SCIM page size for group listings
pub const DEFAULT_GROUP_PAGE_SIZE: u32 = 1000;

/// IdP groups, optionally bound to one group
#[derive(Debug, Clone)]
pub struct IdpGroups {
    endpoints: IdpGroupsEndpoints,
    group_id: Option<GroupId>,
    config: Arc<SlackObjectsConfig>,
}

impl IdpGroups {
    pub(crate) fn new(caller: ApiCaller, group_id: Option<GroupId>) -> Self {
        Self {
            config: caller.shared_config(),
            endpoints: IdpGroupsEndpoints::new(caller),
            group_id,
        }
    }

    /// Bound group id, if any
    pub fn group_id(&self) -> Option<&GroupId> {
        self.group_id.as_ref()
    }

    /// Configuration shared with the client
    pub fn config(&self) -> &SlackObjectsConfig {
        &self.config
    }

    /// A wrapper for the same configuration bound to `group_id`
    pub fn with_group(&self, group_id: impl Into<GroupId>) -> Self {
        Self {
            group_id: Some(group_id.into()),
            ..self.clone()
        }
    }

    /// Every group visible to the SCIM token, `page_size` per request
    pub fn list_groups(&self, page_size: u32) -> BoxStream<'static, SlackResult<GroupSummary>> {
        let endpoints = self.endpoints.clone();
        let count = page_size.max(1);
        paginate(move |start: Option<u32>| {
            let endpoints = endpoints.clone();
            async move {
                let start = start.unwrap_or(1);
                let page = endpoints.list(count, start).await?;
                let next = page.next_start_index(start);
                let items = page.resources.into_iter().map(GroupSummary::from).collect();
                Ok(Page::new(items, next))
            }
            .boxed()
        })
    }

    /// Members of the group
    #[instrument(skip(self))]
    pub async fn get_members(&self, group_id: Option<&str>) -> SlackResult<Vec<GroupMember>> {
        let gid: GroupId = resolve_id(group_id, self.group_id.as_ref(), "group_id")?;
        let group = self.endpoints.get(gid.as_str()).await?;
        Ok(group.members.into_iter().map(GroupMember::from).collect())
    }

    /// Whether `user_id` belongs to the group
    #[instrument(skip(self))]
    pub async fn is_member(&self, user_id: &str, group_id: Option<&str>) -> SlackResult<bool> {
        let members = self.get_members(group_id).await?;
        Ok(members.iter().any(|m| m.id == user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SlackError;
    use crate::fixtures::{self, responses};
    use crate::mocks::{MockHttpTransport, MockResponse};
    use futures::TryStreamExt;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn groups(mock: &Arc<MockHttpTransport>) -> IdpGroups {
        IdpGroups::new(fixtures::caller(mock), None)
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_groups_follows_start_index() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::json(
            200,
            responses::scim_list(
                vec![
                    responses::scim_group("S1", "Admins", &[]),
                    responses::scim_group("S2", "Finance", &[]),
                ],
                3,
                1,
            ),
        ));
        mock.push_response(MockResponse::json(
            200,
            responses::scim_list(vec![responses::scim_group("S3", "Legal", &[])], 3, 3),
        ));

        let listed: Vec<GroupSummary> = groups(&mock).list_groups(2).try_collect().await.unwrap();

        let names: Vec<&str> = listed.iter().map(|g| g.display_name.as_str()).collect();
        assert_eq!(names, vec!["Admins", "Finance", "Legal"]);
        let requests = mock.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].query_param("startIndex"), Some("1"));
        assert_eq!(requests[0].query_param("count"), Some("2"));
        assert_eq!(requests[1].query_param("startIndex"), Some("3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_groups_stops_on_empty_page() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.push_response(MockResponse::json(200, responses::scim_list(vec![], 10, 1)));

        let listed: Vec<GroupSummary> = groups(&mock).list_groups(5).try_collect().await.unwrap();

        assert!(listed.is_empty());
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_groups_ends_when_upstream_repeats_page() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.with_default_response(MockResponse::json(
            200,
            json!({
                "totalResults": 3,
                "itemsPerPage": 0,
                "startIndex": 1,
                "Resources": [responses::scim_group("S1", "Admins", &[])]
            }),
        ));

        let listed: Vec<GroupSummary> = groups(&mock).list_groups(100).try_collect().await.unwrap();

        assert_eq!(listed.len(), 3);
        let starts: Vec<_> = mock
            .requests()
            .iter()
            .map(|r| r.query_param("startIndex").map(str::to_string))
            .collect();
        assert_eq!(
            starts,
            vec![Some("1".to_string()), Some("2".to_string()), Some("3".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_bound_and_unbound_agree() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.add_response(
            "Groups/S1",
            MockResponse::json(200, responses::scim_group("S1", "Admins", &["U1", "U2"])),
        );

        let unbound = groups(&mock).get_members(Some("S1")).await.unwrap();
        let bound = groups(&mock).with_group("S1").get_members(None).await.unwrap();

        assert_eq!(unbound, bound);
        assert_eq!(unbound[1].id, "U2");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_member() {
        let mock = Arc::new(MockHttpTransport::new());
        mock.add_response(
            "Groups/S1",
            MockResponse::json(200, responses::scim_group("S1", "Admins", &["U1"])),
        );
        let groups = groups(&mock).with_group("S1");

        assert!(groups.is_member("U1", None).await.unwrap());
        assert!(!groups.is_member("U9", None).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejects_path_injection() {
        let mock = Arc::new(MockHttpTransport::new());

        let err = groups(&mock).get_members(Some("S1/../Users")).await.unwrap_err();

        assert!(matches!(err, SlackError::InvalidArgument { .. }));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_scim_token_names_field() {
        let mock = Arc::new(MockHttpTransport::new());
        let config = crate::config::SlackObjectsConfig::builder()
            .bot_token("xoxb-only")
            .unwrap()
            .build()
            .unwrap();
        let groups = IdpGroups::new(fixtures::caller_with(&mock, config), None);

        let err = groups.get_members(Some("S1")).await.unwrap_err();

        assert!(err.to_string().contains("scim_token"));
        assert_eq!(mock.call_count(), 0);
    }
}
