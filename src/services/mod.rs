//! Entity wrappers over the Slack APIs.
//!
//! Every entity has two layers. `XxxEndpoints` owns the [`ApiCaller`] and
//! exposes one method per upstream endpoint, each making exactly one call.
//! The public wrapper `Xxx` holds the endpoints, an optional bound id and
//! the read-only configuration, and composes endpoint calls with local
//! logic. Wrappers never see the caller.
//!
//! [`ApiCaller`]: crate::api_caller::ApiCaller

pub mod conversations;
pub mod files;
pub mod idp_groups;
pub mod messages;
pub mod usergroups;
pub mod users;
pub mod workspaces;

pub use conversations::{Conversations, ConversationsEndpoints};
pub use files::{Files, FilesEndpoints};
pub use idp_groups::{IdpGroups, IdpGroupsEndpoints};
pub use messages::{Messages, MessagesEndpoints};
pub use usergroups::{Usergroups, UsergroupsEndpoints};
pub use users::{Users, UsersEndpoints};
pub use workspaces::{Workspaces, WorkspacesEndpoints};

use crate::errors::{ResponseError, SlackError, SlackResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// Pick the explicit id, else the bound one
pub(crate) fn resolve_id<T>(explicit: Option<&str>, bound: Option<&T>, what: &str) -> SlackResult<T>
where
    T: Clone + for<'a> From<&'a str>,
{
    match (explicit.filter(|id| !id.is_empty()), bound) {
        (Some(id), _) => Ok(T::from(id)),
        (None, Some(id)) => Ok(id.clone()),
        (None, None) => Err(SlackError::invalid_argument(format!(
            "{what} is required (passed or bound)"
        ))),
    }
}

/// Comma-joined id list, as the admin methods expect
pub(crate) fn join_ids<T: AsRef<str>>(ids: &[T]) -> String {
    ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
}

/// Serialize a request struct into body parameters
pub(crate) fn to_params<T: Serialize>(request: &T) -> SlackResult<Map<String, Value>> {
    match serde_json::to_value(request)? {
        Value::Object(map) => Ok(map),
        other => Err(SlackError::Response(ResponseError::UnexpectedResponse {
            message: format!("request did not serialize to an object: {other}"),
        })),
    }
}
