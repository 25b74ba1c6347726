//! Per-call header overlays on top of the auth provider's headers.
//!
//! Two presence rules are in use and both are observable on the wire:
//! `data-partition-id` and `tenant` are only sent when the value is a
//! non-empty string, while the policy service's `correlation-id`,
//! `user-agent` and `x-user-id` are sent whenever a value was given, empty
//! or not.

use crate::http::Headers;

pub const DATA_PARTITION_ID: &str = "data-partition-id";
pub const TENANT: &str = "tenant";
pub const CORRELATION_ID: &str = "correlation-id";
pub const USER_AGENT: &str = "user-agent";
pub const X_USER_ID: &str = "x-user-id";

/// Headers a single call sets on top of the auth headers, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderOverlay {
    entries: Vec<(String, String)>,
}

impl HeaderOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` when `value` is present and non-empty.
    pub fn set_non_empty(&mut self, name: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.set(name, value);
        }
    }

    /// Set `name` when `value` is present, including the empty string.
    pub fn set_present(&mut self, name: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.set(name, value);
        }
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.entries.push((name.to_string(), value.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply the overlay to `base`, replacing entries whose names match
    /// regardless of ASCII case.
    pub fn apply(&self, mut base: Headers) -> Headers {
        for (name, value) in &self.entries {
            base.retain(|k, _| !k.eq_ignore_ascii_case(name));
            base.insert(name.clone(), value.clone());
        }
        base
    }
}

/// Header options accepted by the file, schema, search and wellbore clients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub data_partition_id: Option<String>,
    pub tenant: Option<String>,
}

impl RequestOptions {
    pub fn partition(data_partition_id: impl Into<String>) -> Self {
        Self {
            data_partition_id: Some(data_partition_id.into()),
            tenant: None,
        }
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn overlay(&self) -> HeaderOverlay {
        let mut overlay = HeaderOverlay::new();
        overlay.set_non_empty(DATA_PARTITION_ID, self.data_partition_id.as_deref());
        overlay.set_non_empty(TENANT, self.tenant.as_deref());
        overlay
    }
}

/// Header options accepted by the policy client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyOptions {
    pub data_partition_id: Option<String>,
    pub correlation_id: Option<String>,
    pub user_agent: Option<String>,
    pub x_user_id: Option<String>,
}

impl PolicyOptions {
    pub fn partition(data_partition_id: impl Into<String>) -> Self {
        Self {
            data_partition_id: Some(data_partition_id.into()),
            ..Self::default()
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_x_user_id(mut self, x_user_id: impl Into<String>) -> Self {
        self.x_user_id = Some(x_user_id.into());
        self
    }

    pub fn overlay(&self) -> HeaderOverlay {
        let mut overlay = HeaderOverlay::new();
        overlay.set_non_empty(DATA_PARTITION_ID, self.data_partition_id.as_deref());
        overlay.set_present(CORRELATION_ID, self.correlation_id.as_deref());
        overlay.set_present(USER_AGENT, self.user_agent.as_deref());
        overlay.set_present(X_USER_ID, self.x_user_id.as_deref());
        overlay
    }
}
