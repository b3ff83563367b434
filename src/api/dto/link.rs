//! DTOs for the link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Longest target URL accepted by the API; mirrors the `length` check below.
pub const MAX_URL_LENGTH: u64 = 2048;

/// Request body for `POST /api/links`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The URL to shorten. A missing field is treated as empty and rejected
    /// by the service with "URL is required".
    #[serde(default)]
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub url: String,

    /// Optional custom code; `null` behaves like an absent field.
    #[serde(default)]
    pub code: Option<String>,
}

/// Query string for `GET /api/links`.
#[derive(Debug, Default, Deserialize)]
pub struct ListLinksQuery {
    pub q: Option<String>,
}

/// Public JSON representation of a link.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub code: String,
    pub url: String,
    pub short_url: String,
    pub clicks: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            code: link.code,
            url: link.target_url,
            short_url,
            clicks: link.clicks,
            last_clicked_at: link.last_clicked_at,
            created_at: link.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_missing_url_defaults_to_empty() {
        let req: CreateLinkRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.url.is_empty());
        assert!(req.code.is_none());
    }

    #[test]
    fn test_create_request_null_code_is_none() {
        let req: CreateLinkRequest =
            serde_json::from_value(json!({ "url": "https://a.com", "code": null })).unwrap();
        assert!(req.code.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_too_long_url() {
        let long = format!("https://a.com/{}", "x".repeat(MAX_URL_LENGTH as usize));
        let req: CreateLinkRequest = serde_json::from_value(json!({ "url": long })).unwrap();
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("URL is too long"));
    }

    #[test]
    fn test_link_response_is_camel_case() {
        let created_at = Utc::now();
        let link = Link::new(
            1,
            "abc123".to_string(),
            "https://example.com".to_string(),
            created_at,
        );
        let body = serde_json::to_value(LinkResponse::from_link(
            link,
            "http://localhost:3000/abc123".to_string(),
        ))
        .unwrap();

        assert_eq!(body["code"], "abc123");
        assert_eq!(body["url"], "https://example.com");
        assert_eq!(body["shortUrl"], "http://localhost:3000/abc123");
        assert_eq!(body["clicks"], 0);
        assert!(body["lastClickedAt"].is_null());
        assert!(body["createdAt"].is_string());
    }
}
