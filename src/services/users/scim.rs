//! SCIM request bodies for user provisioning, per protocol version.

use crate::config::ScimVersion;
use crate::types::{
    SCIM_PATCH_SCHEMA_V2, SCIM_USER_SCHEMA, SCIM_USER_SCHEMA_V2, SLACK_GUEST_SCHEMA,
    SLACK_GUEST_SCHEMA_V2,
};
use serde_json::{json, Value};

pub(super) fn create_user(version: ScimVersion, user_name: &str, email: &str) -> Value {
    let schema = match version {
        ScimVersion::V1 => SCIM_USER_SCHEMA,
        ScimVersion::V2 => SCIM_USER_SCHEMA_V2,
    };
    json!({
        "schemas": [schema],
        "userName": user_name,
        "emails": [{"value": email, "primary": true}]
    })
}

/// Set one attribute; v1 uses a partial resource, v2 a PatchOp
pub(super) fn set_attribute(version: ScimVersion, attribute: &str, value: Value) -> Value {
    match version {
        ScimVersion::V1 => {
            let mut body = json!({"schemas": [SCIM_USER_SCHEMA]});
            body[attribute] = value;
            body
        }
        ScimVersion::V2 => json!({
            "schemas": [SCIM_PATCH_SCHEMA_V2],
            "Operations": [{"op": "replace", "path": attribute, "value": value}]
        }),
    }
}

pub(super) fn multi_channel_guest(version: ScimVersion) -> Value {
    match version {
        ScimVersion::V1 => {
            let mut body = json!({
                "schemas": [
                    SCIM_USER_SCHEMA,
                    "urn:scim:schemas:extension:enterprise:1.0",
                    SLACK_GUEST_SCHEMA
                ]
            });
            body[SLACK_GUEST_SCHEMA] = json!({"type": "multi"});
            body
        }
        ScimVersion::V2 => json!({
            "schemas": [SCIM_PATCH_SCHEMA_V2],
            "Operations": [{
                "op": "add",
                "path": SLACK_GUEST_SCHEMA_V2,
                "value": {"type": "multi"}
            }]
        }),
    }
}

pub(super) fn filter_eq(attribute: &str, value: &str) -> String {
    format!("{attribute} eq \"{}\"", value.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_attribute_shapes() {
        assert_eq!(
            set_attribute(ScimVersion::V1, "active", json!(false)),
            json!({"schemas": ["urn:scim:schemas:core:1.0"], "active": false})
        );
        assert_eq!(
            set_attribute(ScimVersion::V2, "title", json!("CTO"))["Operations"][0],
            json!({"op": "replace", "path": "title", "value": "CTO"})
        );
    }

    #[test]
    fn test_multi_channel_guest_v1() {
        let body = multi_channel_guest(ScimVersion::V1);
        assert_eq!(body[SLACK_GUEST_SCHEMA]["type"], "multi");
        assert_eq!(body["schemas"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_filter_escapes_quotes() {
        assert_eq!(filter_eq("userName", "a\"b"), "userName eq \"a\\\"b\"");
    }
}
