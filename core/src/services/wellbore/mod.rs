//! Wellbore DDMS client (`/api/os-wellbore-ddms`).
//!
//! The service exposes two endpoint families, `v2` and `v3`, that share four
//! endpoints. Those live on [`WellboreCommon`], implemented by both version
//! clients and by [`WellboreClient`], which picks a version at construction.

mod common;
pub mod v2;
pub mod v3;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::AuthProvider;
use crate::client::ServiceClient;
use crate::config::DEFAULT_WELLBORE_PATH;
use crate::error::Service;
use crate::http::Transport;

pub use common::{
    DeleteQuery, FamilyRequest, Records, SessionMode, SessionRequest, SessionState, SessionUpdate, WellboreCommon,
};
pub use v2::WellboreV2Client;
pub use v3::WellboreV3Client;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WellboreVersion {
    V2,
    #[default]
    V3,
}

impl WellboreVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            WellboreVersion::V2 => "v2",
            WellboreVersion::V3 => "v3",
        }
    }
}

impl fmt::Display for WellboreVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVersion(pub String);

impl fmt::Display for UnknownVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown wellbore version '{}', expected v2 or v3", self.0)
    }
}

impl std::error::Error for UnknownVersion {}

impl FromStr for WellboreVersion {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v2" => Ok(WellboreVersion::V2),
            "v3" => Ok(WellboreVersion::V3),
            _ => Err(UnknownVersion(s.to_string())),
        }
    }
}

/// A wellbore client of either version.
#[derive(Debug, Clone)]
pub enum WellboreClient {
    V2(WellboreV2Client),
    V3(WellboreV3Client),
}

impl WellboreClient {
    pub fn new(
        version: WellboreVersion,
        base_url: &str,
        auth: Arc<dyn AuthProvider>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let core = ServiceClient::new(Service::Wellbore, base_url, DEFAULT_WELLBORE_PATH, auth, transport);
        Self::from_core(version, core)
    }

    pub fn from_core(version: WellboreVersion, core: ServiceClient) -> Self {
        match version {
            WellboreVersion::V2 => WellboreClient::V2(WellboreV2Client::from_core(core)),
            WellboreVersion::V3 => WellboreClient::V3(WellboreV3Client::from_core(core)),
        }
    }

    pub fn with_service_path(self, service_path: &str) -> Self {
        let version = self.api_version();
        Self::from_core(version, self.core().clone().with_service_path(service_path))
    }

    pub fn with_validation(self, enabled: bool) -> Self {
        let version = self.api_version();
        Self::from_core(version, self.core().clone().with_validation(enabled))
    }

    /// Which endpoint family this client speaks. Not to be confused with
    /// [`WellboreCommon::version`], which asks the service.
    pub fn api_version(&self) -> WellboreVersion {
        match self {
            WellboreClient::V2(_) => WellboreVersion::V2,
            WellboreClient::V3(_) => WellboreVersion::V3,
        }
    }

    pub fn as_v2(&self) -> Option<&WellboreV2Client> {
        match self {
            WellboreClient::V2(client) => Some(client),
            WellboreClient::V3(_) => None,
        }
    }

    pub fn as_v3(&self) -> Option<&WellboreV3Client> {
        match self {
            WellboreClient::V3(client) => Some(client),
            WellboreClient::V2(_) => None,
        }
    }
}

impl WellboreCommon for WellboreClient {
    fn core(&self) -> &ServiceClient {
        match self {
            WellboreClient::V2(client) => client.core(),
            WellboreClient::V3(client) => client.core(),
        }
    }
}
