//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::LinkRecord;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The original URL (absolute HTTP/HTTPS).
    #[validate(required(message = "originalUrl is required"))]
    pub original_url: Option<String>,

    /// Lifetime in hours. Absent or non-positive means the link never expires.
    pub ttl: Option<f64>,
}

/// A stored link as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub id: String,
    pub original_url: String,
    pub short_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<LinkRecord> for LinkResponse {
    fn from(record: LinkRecord) -> Self {
        Self {
            id: record.id,
            original_url: record.original_url,
            short_url: record.short_url,
            clicks: record.clicks,
            created_at: record.created_at,
            expires_at: record.expires_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_uses_camel_case() {
        let req: ShortenRequest =
            serde_json::from_value(json!({ "originalUrl": "https://example.com", "ttl": 1.5 }))
                .unwrap();

        assert_eq!(req.original_url.as_deref(), Some("https://example.com"));
        assert_eq!(req.ttl, Some(1.5));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_missing_original_url_fails_validation() {
        let req: ShortenRequest = serde_json::from_value(json!({ "ttl": 1 })).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_permanent_link_serializes_null_expiry() {
        let now = Utc::now();
        let body = serde_json::to_value(LinkResponse {
            id: "abc1234".to_string(),
            original_url: "https://example.com".to_string(),
            short_url: "https://s.example.com/abc1234".to_string(),
            clicks: 0,
            created_at: now,
            expires_at: None,
        })
        .unwrap();

        assert_eq!(body["originalUrl"], "https://example.com");
        assert_eq!(body["shortUrl"], "https://s.example.com/abc1234");
        assert!(body["expiresAt"].is_null());
        assert!(body.get("createdAt").is_some());
    }
}
