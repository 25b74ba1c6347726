//! Client configuration.
//!
//! The only required setting is the deployment's base URL. Service path
//! prefixes default to the standard OSDU routes and can be overridden for
//! deployments that mount services elsewhere.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::services::wellbore::WellboreVersion;

pub const DEFAULT_FILE_PATH: &str = "/api/file";
pub const DEFAULT_POLICY_PATH: &str = "/api/policy/v1";
pub const DEFAULT_SCHEMA_PATH: &str = "/api/schema-service/v1";
pub const DEFAULT_SEARCH_PATH: &str = "/api/search/v2";
pub const DEFAULT_WELLBORE_PATH: &str = "/api/os-wellbore-ddms";

/// Per-service path prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicePaths {
    pub file: String,
    pub policy: String,
    pub schema: String,
    pub search: String,
    pub wellbore: String,
}

impl Default for ServicePaths {
    fn default() -> Self {
        Self {
            file: DEFAULT_FILE_PATH.to_string(),
            policy: DEFAULT_POLICY_PATH.to_string(),
            schema: DEFAULT_SCHEMA_PATH.to_string(),
            search: DEFAULT_SEARCH_PATH.to_string(),
            wellbore: DEFAULT_WELLBORE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    /// Check request bodies locally before sending. The policy client always
    /// checks, whatever this says.
    #[serde(default)]
    pub validation: bool,
    #[serde(default)]
    pub wellbore_version: WellboreVersion,
    #[serde(default)]
    pub service_paths: ServicePaths,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            validation: false,
            wellbore_version: WellboreVersion::default(),
            service_paths: ServicePaths::default(),
        }
    }

    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validation = enabled;
        self
    }

    pub fn with_wellbore_version(mut self, version: WellboreVersion) -> Self {
        self.wellbore_version = version;
        self
    }

    /// Read `OSDU_BASE_URL` (required), `OSDU_VALIDATION` and
    /// `OSDU_WELLBORE_VERSION`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("OSDU_BASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("OSDU_BASE_URL"))?;
        let mut config = Self::new(base_url);

        if let Some(raw) = lookup("OSDU_VALIDATION") {
            config.validation = match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "OSDU_VALIDATION",
                        value: raw,
                    })
                }
            };
        }

        if let Some(raw) = lookup("OSDU_WELLBORE_VERSION") {
            config.wellbore_version = raw.parse().map_err(|_| ConfigError::Invalid {
                name: "OSDU_WELLBORE_VERSION",
                value: raw.clone(),
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn base_url_is_required() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OSDU_BASE_URL")));
    }

    #[test]
    fn defaults_apply() {
        let config = ClientConfig::from_lookup(lookup(&[("OSDU_BASE_URL", "https://osdu.example.com")])).unwrap();
        assert!(!config.validation);
        assert_eq!(config.wellbore_version, WellboreVersion::V3);
        assert_eq!(config.service_paths.search, "/api/search/v2");
    }

    #[test]
    fn reads_flags() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("OSDU_BASE_URL", "https://osdu.example.com"),
            ("OSDU_VALIDATION", "TRUE"),
            ("OSDU_WELLBORE_VERSION", "v2"),
        ]))
        .unwrap();
        assert!(config.validation);
        assert_eq!(config.wellbore_version, WellboreVersion::V2);
    }

    #[test]
    fn rejects_unknown_values() {
        let err = ClientConfig::from_lookup(lookup(&[
            ("OSDU_BASE_URL", "https://osdu.example.com"),
            ("OSDU_WELLBORE_VERSION", "v9"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "OSDU_WELLBORE_VERSION", .. }));
    }

    #[test]
    fn deserializes_with_partial_paths() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"base_url": "https://h", "wellbore_version": "v2", "service_paths": {"file": "/file"}}"#,
        )
        .unwrap();
        assert_eq!(config.service_paths.file, "/file");
        assert_eq!(config.service_paths.policy, DEFAULT_POLICY_PATH);
        assert_eq!(config.wellbore_version, WellboreVersion::V2);
    }
}
