//! Authentication header providers.
//!
//! A provider is asked for its headers on every call, so a token refreshed
//! between two calls is picked up by the second one.

use std::fmt;
use std::sync::RwLock;

use crate::http::Headers;

/// Supplies the headers every request starts from (typically
/// `Authorization`).
pub trait AuthProvider: Send + Sync {
    fn headers(&self) -> Headers;
}

impl<F> AuthProvider for F
where
    F: Fn() -> Headers + Send + Sync,
{
    fn headers(&self) -> Headers {
        self()
    }
}

/// `Authorization: Bearer <token>` with an externally refreshable token.
pub struct BearerToken {
    token: RwLock<String>,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(token.into()),
        }
    }

    /// Replace the token used by subsequent calls.
    pub fn set_token(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = token.into();
    }
}

impl AuthProvider for BearerToken {
    fn headers(&self) -> Headers {
        let token = self.token.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        headers
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken").field("token", &"[REDACTED]").finish()
    }
}

/// A fixed header set.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders(Headers);

impl StaticHeaders {
    pub fn new(headers: Headers) -> Self {
        Self(headers)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }
}

impl AuthProvider for StaticHeaders {
    fn headers(&self) -> Headers {
        self.0.clone()
    }
}
