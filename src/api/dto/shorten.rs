//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Allocation;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The URL to shorten (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_id: String,
    pub short_url: String,
}

impl From<Allocation> for ShortenResponse {
    fn from(allocation: Allocation) -> Self {
        Self {
            short_id: allocation.short_id,
            short_url: allocation.short_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_uses_camel_case() {
        let response = ShortenResponse::from(Allocation {
            short_id: "a1b2c3".to_string(),
            short_url: "https://s.example.com/a1b2c3".to_string(),
            created: true,
        });

        let json = serde_json::to_value(response).unwrap();

        assert_eq!(json["shortId"], "a1b2c3");
        assert_eq!(json["shortUrl"], "https://s.example.com/a1b2c3");
    }

    #[test]
    fn test_request_rejects_non_url() {
        let request: ShortenRequest = serde_json::from_str(r#"{"url": "not a url"}"#).unwrap();

        assert!(request.validate().is_err());
    }
}
