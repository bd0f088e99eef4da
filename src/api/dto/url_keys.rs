//! DTOs for the mapping enumeration endpoint.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::entities::{Mapping, MappingPage};

/// Query parameters for `GET /api/url-keys`.
#[derive(Debug, Default, Deserialize)]
pub struct UrlKeysQuery {
    /// Opaque cursor returned as `nextToken` by a previous page.
    #[serde(default)]
    pub token: Option<String>,
}

/// A single mapping rendered as a one-entry object: `{ "<shortId>": "<url>" }`.
#[derive(Debug)]
pub struct UrlKeyEntry(pub Mapping);

impl Serialize for UrlKeyEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.0.short_id, &self.0.original_url)?;
        map.end()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlKeysResponse {
    pub url_keys: Vec<UrlKeyEntry>,
    pub next_token: Option<String>,
}

impl From<MappingPage> for UrlKeysResponse {
    fn from(page: MappingPage) -> Self {
        Self {
            url_keys: page.mappings.into_iter().map(UrlKeyEntry).collect(),
            next_token: page.next_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entries_are_single_key_objects() {
        let response = UrlKeysResponse::from(MappingPage {
            mappings: vec![
                Mapping::new("abc123", "https://a.example"),
                Mapping::new("def456", "https://d.example"),
            ],
            next_cursor: Some("tok".to_string()),
        });

        let json = serde_json::to_value(response).unwrap();

        assert_eq!(
            json,
            json!({
                "urlKeys": [
                    { "abc123": "https://a.example" },
                    { "def456": "https://d.example" }
                ],
                "nextToken": "tok"
            })
        );
    }

    #[test]
    fn test_last_page_has_null_token() {
        let json = serde_json::to_value(UrlKeysResponse::from(MappingPage::default())).unwrap();

        assert_eq!(json, json!({ "urlKeys": [], "nextToken": null }));
    }
}
