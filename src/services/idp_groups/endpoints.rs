//! SCIM `Groups` endpoints.

use crate::api_caller::{ApiCaller, ApiRequest};
use crate::errors::SlackResult;
use crate::types::{validate_scim_id, ScimGroup, ScimListResponse};
use http::Method;
use tracing::instrument;

/// One method per SCIM groups endpoint
#[derive(Debug, Clone)]
pub struct IdpGroupsEndpoints {
    caller: ApiCaller,
}

impl IdpGroupsEndpoints {
    pub(crate) fn new(caller: ApiCaller) -> Self {
        Self { caller }
    }

    /// `GET Groups?count=&startIndex=` (1-based)
    #[instrument(skip(self))]
    pub async fn list(&self, count: u32, start_index: u32) -> SlackResult<ScimListResponse<ScimGroup>> {
        let request = ApiRequest::scim(Method::GET, "Groups")
            .query("count", count)
            .query("startIndex", start_index);
        self.caller.call(request).await?.decode()
    }

    /// `GET Groups/{id}`
    #[instrument(skip(self))]
    pub async fn get(&self, group_id: &str) -> SlackResult<ScimGroup> {
        let group_id = validate_scim_id(group_id)?;
        let request = ApiRequest::scim(Method::GET, format!("Groups/{group_id}"));
        self.caller.call(request).await?.decode()
    }
}
