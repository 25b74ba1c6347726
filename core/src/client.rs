//! Shared request core used by every service client.
//!
//! # Design
//! `ServiceClient` holds only immutable configuration (base URL, service
//! path, validation flag) plus the auth provider and transport. Each endpoint
//! describes itself as a `Call` (verb, path, query, header overlay, body,
//! optional schema). `build_request` turns a `Call` into an `HttpRequest`,
//! `parse_response` turns an `HttpResponse` into JSON or a service error, and
//! `execute` runs both around exactly one transport round trip. Validation
//! runs inside `build_request`, after the body exists and before anything is
//! sent.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::AuthProvider;
use crate::error::{Error, Service, ServiceError};
use crate::headers::HeaderOverlay;
use crate::http::{header_value, Body, HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::url;
use crate::validation::{self, FieldType};

/// When a call's body is checked against its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    /// Regardless of the client's validation flag.
    Always,
    /// Only when the client was built with validation enabled.
    WhenEnabled,
}

/// One endpoint invocation before headers and URL are resolved.
#[derive(Debug, Clone)]
pub struct Call {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderOverlay,
    body: Option<Body>,
    schema: Option<(&'static FieldType, Validation)>,
}

impl Call {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderOverlay::new(),
            body: None,
            schema: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Append the non-null members of `params` as query pairs, using the
    /// serialized (wire) field names.
    pub fn query<T: Serialize>(mut self, params: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(params).map_err(Error::Encode)?;
        if let Value::Object(members) = value {
            for (name, member) in members {
                push_query(&mut self.query, &name, member);
            }
        }
        Ok(self)
    }

    pub fn query_pair(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    pub fn headers(mut self, overlay: HeaderOverlay) -> Self {
        self.headers = overlay;
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, Error> {
        let value = serde_json::to_value(body).map_err(Error::Encode)?;
        self.body = Some(Body::Json(value));
        Ok(self)
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn validate(mut self, schema: &'static FieldType, mode: Validation) -> Self {
        self.schema = Some((schema, mode));
        self
    }
}

fn push_query(query: &mut Vec<(String, String)>, name: &str, value: Value) {
    match value {
        Value::Null => {}
        Value::String(s) => query.push((name.to_string(), s)),
        Value::Array(items) => {
            for item in items {
                push_query(query, name, item);
            }
        }
        other => query.push((name.to_string(), other.to_string())),
    }
}

/// Configuration and collaborators shared by every endpoint of one service.
#[derive(Clone)]
pub struct ServiceClient {
    service: Service,
    base_url: String,
    service_path: String,
    validation: bool,
    auth: Arc<dyn AuthProvider>,
    transport: Arc<dyn Transport>,
}

impl ServiceClient {
    pub fn new(
        service: Service,
        base_url: &str,
        service_path: &str,
        auth: Arc<dyn AuthProvider>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            service,
            base_url: base_url.to_string(),
            service_path: service_path.to_string(),
            validation: false,
            auth,
            transport,
        }
    }

    pub fn with_service_path(mut self, service_path: &str) -> Self {
        self.service_path = service_path.to_string();
        self
    }

    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validation = enabled;
        self
    }

    pub fn service(&self) -> Service {
        self.service
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn service_path(&self) -> &str {
        &self.service_path
    }

    pub fn validation_enabled(&self) -> bool {
        self.validation
    }

    /// Resolve headers, validate the body and assemble the full request.
    pub fn build_request(&self, call: Call) -> Result<HttpRequest, Error> {
        let mut headers = call.headers.apply(self.auth.headers());

        if let (Some(body), Some((schema, mode))) = (&call.body, call.schema) {
            let enabled = match mode {
                Validation::Always => true,
                Validation::WhenEnabled => self.validation,
            };
            if let (true, Some(payload)) = (enabled, body.as_json()) {
                let messages = validation::messages(payload, schema);
                if !messages.is_empty() {
                    debug!(service = %self.service, violations = messages.len(), "request body failed validation");
                    return Err(Error::service_failure(self.service, ServiceError::validation(messages)));
                }
            }
        }

        if let Some(body) = &call.body {
            if header_value(&headers, "content-type").is_none() {
                headers.insert("content-type".to_string(), body.content_type().to_string());
            }
        }

        Ok(HttpRequest {
            method: call.method,
            url: url::join(&[self.base_url.as_str(), self.service_path.as_str(), call.path.as_str()]),
            headers,
            query: call.query,
            body: call.body,
        })
    }

    /// Map a non-2xx response to this service's error, otherwise decode the
    /// body as JSON. An empty 2xx body decodes to `Value::Null`.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, Error> {
        if !response.is_success() {
            warn!(service = %self.service, status = response.status, "request failed");
            return Err(Error::service_failure(
                self.service,
                ServiceError::remote(response.text(), response.status),
            ));
        }
        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&response.body).map_err(Error::Decode)
    }

    pub fn execute(&self, call: Call) -> Result<Value, Error> {
        let request = self.build_request(call)?;
        debug!(service = %self.service, method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        debug!(service = %self.service, status = response.status, "received response");
        self.parse_response(response)
    }
}

impl fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("base_url", &self.base_url)
            .field("service_path", &self.service_path)
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}
