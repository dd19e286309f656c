//! Decoded API responses.

use super::ApiFamily;
use crate::errors::{ResponseError, SlackError, SlackResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Raw decoded payload of one successful call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    family: ApiFamily,
    endpoint: String,
    status: u16,
    data: Value,
}

impl ApiResponse {
    /// Wrap a decoded payload
    pub fn new(family: ApiFamily, endpoint: impl Into<String>, status: u16, data: Value) -> Self {
        Self {
            family,
            endpoint: endpoint.into(),
            status,
            data,
        }
    }

    /// API family of the call
    pub fn family(&self) -> ApiFamily {
        self.family
    }

    /// Endpoint that produced this payload
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The decoded payload
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Take ownership of the payload
    pub fn into_data(self) -> Value {
        self.data
    }

    /// Top-level field, if present
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Top-level string field, if present
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Decode the whole payload into a record
    pub fn decode<T: DeserializeOwned>(self) -> SlackResult<T> {
        Ok(serde_json::from_value(self.data)?)
    }

    /// Decode one required top-level field
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> SlackResult<T> {
        let value = self.get(key).ok_or_else(|| {
            SlackError::Response(ResponseError::MissingField {
                endpoint: self.endpoint.clone(),
                field: key.to_string(),
            })
        })?;
        Ok(T::deserialize(value)?)
    }

    /// Decode an optional top-level field, treating `null` as absent
    pub fn field_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> SlackResult<T> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => Ok(T::deserialize(value)?),
        }
    }

    /// Pagination cursor, if more results remain
    ///
    /// Reads `response_metadata.next_cursor`, falling back to a top-level
    /// `next_cursor` as used by the admin search methods. Empty means done.
    pub fn next_cursor(&self) -> Option<String> {
        self.data
            .get("response_metadata")
            .and_then(|m| m.get("next_cursor"))
            .or_else(|| self.data.get("next_cursor"))
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .map(String::from)
    }

    /// Discovery-style `offset` cursor, if more results remain
    pub fn next_offset(&self) -> Option<String> {
        self.str_field("offset")
            .filter(|o| !o.is_empty())
            .map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(data: Value) -> ApiResponse {
        ApiResponse::new(ApiFamily::Web, "conversations.list", 200, data)
    }

    #[test]
    fn test_next_cursor_variants() {
        assert_eq!(
            response(json!({"response_metadata": {"next_cursor": "abc"}})).next_cursor(),
            Some("abc".to_string())
        );
        assert_eq!(
            response(json!({"response_metadata": {"next_cursor": ""}})).next_cursor(),
            None
        );
        assert_eq!(
            response(json!({"next_cursor": "top"})).next_cursor(),
            Some("top".to_string())
        );
        assert_eq!(response(json!({})).next_cursor(), None);
    }

    #[test]
    fn test_field_missing() {
        let err = response(json!({"ok": true})).field::<Vec<String>>("channels").unwrap_err();
        assert!(matches!(
            err,
            SlackError::Response(ResponseError::MissingField { .. })
        ));
    }

    #[test]
    fn test_field_or_default() {
        let r = response(json!({"members": null}));
        assert_eq!(r.field_or_default::<Vec<String>>("members").unwrap(), Vec::<String>::new());
        let r = response(json!({"members": ["U1"]}));
        assert_eq!(r.field_or_default::<Vec<String>>("members").unwrap(), vec!["U1"]);
    }
}
