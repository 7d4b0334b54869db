use std::collections::BTreeMap;

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Inbound invocation envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    #[serde(default = "default_method")]
    pub http_method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default)]
    pub request_context: RequestContext,
}

fn default_method() -> String {
    "GET".to_string()
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            http_method: method.into(),
            headers: BTreeMap::new(),
            body,
            is_base64_encoded: false,
            request_context: RequestContext::default(),
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_context.request_id = Some(request_id.into());
        self
    }
}

/// Outbound response envelope. The body is always plain JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ApiResponse {
    pub fn json(status: StatusCode, body: &serde_json::Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert(ALLOW_ORIGIN.to_string(), "*".to_string());

        Self {
            status_code: status.as_u16(),
            headers,
            body: body.to_string(),
            is_base64_encoded: false,
        }
    }

    /// Pre-flight reply: 200, no body.
    pub fn preflight() -> Self {
        let headers = [
            (ALLOW_ORIGIN, "*"),
            ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
            ("Access-Control-Allow-Headers", "Content-Type"),
            ("Access-Control-Max-Age", "86400"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            status_code: StatusCode::OK.as_u16(),
            headers,
            body: String::new(),
            is_base64_encoded: false,
        }
    }

    pub fn body_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("dropping invalid response header {}", name),
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req: ApiRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.http_method, "GET");
        assert!(req.body.is_none());
        assert!(req.request_context.request_id.is_none());
    }

    #[test]
    fn test_request_reads_camel_case_keys() {
        let req: ApiRequest = serde_json::from_str(
            r#"{"httpMethod":"POST","body":"{}","requestContext":{"requestId":"abc"}}"#,
        )
        .unwrap();
        assert_eq!(req.http_method, "POST");
        assert_eq!(req.body.as_deref(), Some("{}"));
        assert_eq!(req.request_context.request_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let resp = ApiResponse::json(StatusCode::OK, &serde_json::json!({"success": true}));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["isBase64Encoded"], false);
        assert_eq!(json["headers"][ALLOW_ORIGIN], "*");
        assert_eq!(json["body"], r#"{"success":true}"#);
    }

    #[test]
    fn test_preflight_has_cors_headers_and_empty_body() {
        let resp = ApiResponse::preflight();
        assert_eq!(resp.status_code, 200);
        assert!(resp.body.is_empty());
        assert_eq!(resp.headers["Access-Control-Allow-Methods"], "GET, POST, OPTIONS");
        assert_eq!(resp.headers["Access-Control-Max-Age"], "86400");
    }
}
