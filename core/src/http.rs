//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. Service clients build an
//! `HttpRequest`, hand it to a `Transport` for exactly one round trip and
//! parse the returned `HttpResponse`. Callers that want to drive the I/O
//! themselves can stop after `build_request` and feed their own response into
//! `parse_response`.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::TransportError;

/// Header map sent with a request. Keys keep the casing they were inserted
/// with; lookups through [`header_value`] ignore ASCII case.
pub type Headers = BTreeMap<String, String>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Structured JSON, serialized by the transport.
    Json(Value),
    /// Opaque bytes passed through untouched.
    Bytes { content_type: String, data: Vec<u8> },
}

const MULTIPART_BOUNDARY: &str = "osdu-core-form-boundary-7e1c9a";

impl Body {
    /// Single-file `multipart/form-data` payload, the shape the policy and
    /// wellbore upload endpoints expect.
    pub fn multipart_file(field: &str, filename: &str, data: &[u8]) -> Body {
        let mut out = Vec::with_capacity(data.len() + 256);
        out.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        out.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        out.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        out.extend_from_slice(data);
        out.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
        Body::Bytes {
            content_type: format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            data: out,
        }
    }

    pub fn content_type(&self) -> &str {
        match self {
            Body::Json(_) => "application/json",
            Body::Bytes { content_type, .. } => content_type,
        }
    }

    /// Wire bytes of the payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Body::Json(value) => serde_json::to_vec(value),
            Body::Bytes { data, .. } => Ok(data.clone()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Json(value) => Some(value),
            Body::Bytes { .. } => None,
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    /// Query pairs in wire order. List-valued parameters repeat the key.
    pub query: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    /// All values sent for query parameter `name`.
    pub fn query_values(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes one HTTP round trip.
///
/// Implementations must return non-2xx responses as `Ok` so the service
/// client can translate them. No retry or timeout policy is expected here
/// beyond what the implementation's own configuration applies.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Case-insensitive header lookup.
pub fn header_value<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_any_2xx() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }

    #[test]
    fn multipart_wraps_file_bytes() {
        let body = Body::multipart_file("file", "policy.rego", b"package osdu");
        assert!(body.content_type().starts_with("multipart/form-data; boundary="));
        let bytes = body.to_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("name=\"file\"; filename=\"policy.rego\""));
        assert!(text.contains("package osdu"));
        assert!(text.trim_end().ends_with("--"));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), "Bearer t".to_string());
        assert_eq!(header_value(&headers, "authorization"), Some("Bearer t"));
        assert_eq!(header_value(&headers, "tenant"), None);
    }

    #[test]
    fn query_values_collects_repeated_keys() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "http://h/x".to_string(),
            headers: Headers::new(),
            query: vec![
                ("curves".to_string(), "GR".to_string()),
                ("limit".to_string(), "5".to_string()),
                ("curves".to_string(), "DT".to_string()),
            ],
            body: None,
        };
        assert_eq!(req.query_values("curves"), vec!["GR", "DT"]);
        assert_eq!(req.query_values("offset"), Vec::<&str>::new());
    }
}
