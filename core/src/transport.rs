//! Blocking transport backed by `ureq`.

use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, RequestBuilder};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// Executes requests with a `ureq` agent.
///
/// The agent must not treat 4xx/5xx as errors; [`UreqTransport::new`]
/// configures that, and agents passed to [`UreqTransport::with_agent`] are
/// expected to do the same.
///
/// Response bodies are read in full with no size limit unless one is set
/// with [`UreqTransport::with_body_limit`].
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
    body_limit: u64,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = Agent::config_builder().http_status_as_error(false).build().new_agent();
        Self::with_agent(agent)
    }

    pub fn with_agent(agent: Agent) -> Self {
        Self {
            agent,
            body_limit: u64::MAX,
        }
    }

    /// Fail with a transport error when a response body exceeds `bytes`.
    pub fn with_body_limit(mut self, bytes: u64) -> Self {
        self.body_limit = bytes;
        self
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn decorate<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (name, value) in &request.query {
        builder = builder.query(name.as_str(), value.as_str());
    }
    builder
}

fn send_with_body(
    builder: RequestBuilder<WithBody>,
    request: &HttpRequest,
) -> Result<ureq::http::Response<ureq::Body>, TransportError> {
    let builder = decorate(builder, request);
    match &request.body {
        Some(body) => {
            let data = body.to_bytes().map_err(TransportError::with_source)?;
            builder.send(&data[..]).map_err(TransportError::with_source)
        }
        None => builder.send_empty().map_err(TransportError::with_source),
    }
}

fn send_without_body(
    builder: RequestBuilder<WithoutBody>,
    request: &HttpRequest,
) -> Result<ureq::http::Response<ureq::Body>, TransportError> {
    match &request.body {
        Some(_) => send_with_body(builder.force_send_body(), request),
        None => decorate(builder, request).call().map_err(TransportError::with_source),
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let mut response = match request.method {
            HttpMethod::Get => send_without_body(self.agent.get(url), &request),
            HttpMethod::Delete => send_without_body(self.agent.delete(url), &request),
            HttpMethod::Post => send_with_body(self.agent.post(url), &request),
            HttpMethod::Put => send_with_body(self.agent.put(url), &request),
            HttpMethod::Patch => send_with_body(self.agent.patch(url), &request),
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_vec()
            .map_err(TransportError::with_source)?;

        Ok(HttpResponse { status, headers, body })
    }
}
