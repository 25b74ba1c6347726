//! Error types for the OSDU service clients.
//!
//! # Design
//! Every service gets its own `Error` variant so callers can tell a Schema
//! failure from a Search failure by matching, even though the payload
//! (`ServiceError`) has the same shape everywhere. A `ServiceError` either
//! carries the raw response text plus status code of a non-2xx response, or
//! the list of field messages produced by local validation (no status code).
//! Transport failures are carried unchanged in `Error::Transport`.

use std::fmt;

/// The OSDU service a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    File,
    Policy,
    Schema,
    Search,
    Wellbore,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::File => "file",
            Service::Policy => "policy",
            Service::Schema => "schema",
            Service::Search => "search",
            Service::Wellbore => "wellbore",
        };
        f.write_str(name)
    }
}

/// Message part of a [`ServiceError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    /// Raw body text of a failed response.
    Text(String),
    /// One message per local validation violation.
    Fields(Vec<String>),
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMessage::Text(text) => f.write_str(text),
            ErrorMessage::Fields(fields) => f.write_str(&fields.join("; ")),
        }
    }
}

/// A failed call: remote (status code present) or local validation (absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    pub message: ErrorMessage,
    pub status_code: Option<u16>,
}

impl ServiceError {
    pub fn remote(body: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: ErrorMessage::Text(body.into()),
            status_code: Some(status_code),
        }
    }

    pub fn validation(messages: Vec<String>) -> Self {
        Self {
            message: ErrorMessage::Fields(messages),
            status_code: None,
        }
    }

    /// Field messages of a validation failure; empty for remote errors.
    pub fn field_messages(&self) -> &[String] {
        match &self.message {
            ErrorMessage::Fields(fields) => fields,
            ErrorMessage::Text(_) => &[],
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "HTTP {status}: {}", self.message),
            None => write!(f, "invalid request: {}", self.message),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Failure below the HTTP layer (DNS, connect, TLS, I/O). The underlying
/// transport error is kept as the source.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

/// Errors returned by every endpoint method.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file service: {0}")]
    File(ServiceError),

    #[error("policy service: {0}")]
    Policy(ServiceError),

    #[error("schema service: {0}")]
    Schema(ServiceError),

    #[error("search service: {0}")]
    Search(ServiceError),

    #[error("wellbore service: {0}")]
    Wellbore(ServiceError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A 2xx response whose body is not JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be serialized.
    #[error("request body could not be serialized: {0}")]
    Encode(#[source] serde_json::Error),
}

impl Error {
    pub fn service_failure(service: Service, error: ServiceError) -> Self {
        match service {
            Service::File => Error::File(error),
            Service::Policy => Error::Policy(error),
            Service::Schema => Error::Schema(error),
            Service::Search => Error::Search(error),
            Service::Wellbore => Error::Wellbore(error),
        }
    }

    pub fn service(&self) -> Option<Service> {
        match self {
            Error::File(_) => Some(Service::File),
            Error::Policy(_) => Some(Service::Policy),
            Error::Schema(_) => Some(Service::Schema),
            Error::Search(_) => Some(Service::Search),
            Error::Wellbore(_) => Some(Service::Wellbore),
            Error::Transport(_) | Error::Decode(_) | Error::Encode(_) => None,
        }
    }

    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Error::File(e) | Error::Policy(e) | Error::Schema(e) | Error::Search(e) | Error::Wellbore(e) => {
                Some(e)
            }
            Error::Transport(_) | Error::Decode(_) | Error::Encode(_) => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        self.service_error().and_then(|e| e.status_code)
    }
}

/// Errors from [`crate::config::ClientConfig::from_env`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}
