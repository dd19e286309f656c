//! SCIM provisioning records.
//!
//! Field names follow the SCIM core schema, which is camelCase on the wire.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Core user schema URN
pub const SCIM_USER_SCHEMA: &str = "urn:scim:schemas:core:1.0";
/// Core user schema URN for SCIM 2.0
pub const SCIM_USER_SCHEMA_V2: &str = "urn:ietf:params:scim:schemas:core:2.0:User";
/// Patch operation URN for SCIM 2.0
pub const SCIM_PATCH_SCHEMA_V2: &str = "urn:ietf:params:scim:api:messages:2.0:PatchOp";
/// Slack guest extension URN
pub const SLACK_GUEST_SCHEMA: &str = "urn:scim:schemas:extension:slack:guest:1.0";
/// Slack guest extension URN for SCIM 2.0
pub const SLACK_GUEST_SCHEMA_V2: &str = "urn:ietf:params:scim:schemas:extension:slack:guest:2.0:User";

/// SCIM user resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimUser {
    /// SCIM ID (same as the Slack user ID)
    #[serde(default)]
    pub id: String,
    /// Username
    #[serde(default)]
    pub user_name: Option<String>,
    /// Whether the account is active
    #[serde(default)]
    pub active: bool,
    /// Display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Email addresses
    #[serde(default)]
    pub emails: Vec<ScimEmail>,
    /// Remaining attributes
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScimUser {
    /// Primary email, falling back to the first one listed
    pub fn primary_email(&self) -> Option<&str> {
        self.emails
            .iter()
            .find(|e| e.primary)
            .or_else(|| self.emails.first())
            .map(|e| e.value.as_str())
    }
}

/// SCIM email entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScimEmail {
    /// Address
    #[serde(default)]
    pub value: String,
    /// Whether primary
    #[serde(default)]
    pub primary: bool,
}

/// SCIM group resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimGroup {
    /// Group ID
    #[serde(default)]
    pub id: String,
    /// Group name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Members
    #[serde(default)]
    pub members: Vec<ScimMember>,
    /// Remaining attributes
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Member reference inside a SCIM group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScimMember {
    /// Member user ID
    #[serde(default)]
    pub value: String,
    /// Member display name
    #[serde(default)]
    pub display: Option<String>,
}

/// One page of a SCIM listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimListResponse<T> {
    /// Size of the whole result set
    #[serde(default)]
    pub total_results: u32,
    /// Items in this page
    #[serde(default)]
    pub items_per_page: Option<u32>,
    /// 1-based index of the first item in this page
    #[serde(default)]
    pub start_index: Option<u32>,
    /// The page items
    #[serde(rename = "Resources", default = "Vec::new")]
    pub resources: Vec<T>,
}

impl<T> ScimListResponse<T> {
    /// startIndex of the following page, if any remain
    ///
    /// Advances from the index that was requested, by at least one, so a
    /// stale or zero upstream `startIndex`/`itemsPerPage` cannot repeat a page.
    pub fn next_start_index(&self, requested_start: u32) -> Option<u32> {
        if self.resources.is_empty() {
            return None;
        }
        let per_page = self
            .items_per_page
            .unwrap_or(0)
            .max(self.resources.len() as u32)
            .max(1);
        let next = requested_start.saturating_add(per_page);
        (next <= self.total_results).then_some(next)
    }
}

/// IdP group as listed: id and name only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group ID
    pub id: String,
    /// Group name
    pub display_name: String,
}

impl From<ScimGroup> for GroupSummary {
    fn from(group: ScimGroup) -> Self {
        Self {
            id: group.id,
            display_name: group.display_name.unwrap_or_default(),
        }
    }
}

/// IdP group member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Member user ID
    pub id: String,
    /// Member display name
    pub display: String,
}

impl From<ScimMember> for GroupMember {
    fn from(member: ScimMember) -> Self {
        Self {
            id: member.value,
            display: member.display.unwrap_or_default(),
        }
    }
}
