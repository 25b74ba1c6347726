//! Entry point that builds every service client from one configuration.

use std::fmt;
use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::client::ServiceClient;
use crate::config::ClientConfig;
use crate::error::Service;
use crate::http::Transport;
use crate::services::{FileClient, PolicyClient, SchemaClient, SearchClient, WellboreClient};

/// Hands out service clients sharing one auth provider and one transport.
#[derive(Clone)]
pub struct OsduClient {
    config: ClientConfig,
    auth: Arc<dyn AuthProvider>,
    transport: Arc<dyn Transport>,
}

impl OsduClient {
    pub fn new(config: ClientConfig, auth: Arc<dyn AuthProvider>, transport: Arc<dyn Transport>) -> Self {
        Self { config, auth, transport }
    }

    /// Configure from the environment and talk HTTP through `ureq`.
    #[cfg(feature = "ureq")]
    pub fn from_env(auth: Arc<dyn AuthProvider>) -> Result<Self, crate::error::ConfigError> {
        let config = ClientConfig::from_env()?;
        Ok(Self::new(config, auth, Arc::new(crate::transport::UreqTransport::new())))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn file(&self) -> FileClient {
        FileClient::from_core(self.core(Service::File, &self.config.service_paths.file))
    }

    pub fn policy(&self) -> PolicyClient {
        PolicyClient::from_core(self.core(Service::Policy, &self.config.service_paths.policy))
    }

    pub fn schema(&self) -> SchemaClient {
        SchemaClient::from_core(self.core(Service::Schema, &self.config.service_paths.schema))
    }

    pub fn search(&self) -> SearchClient {
        SearchClient::from_core(self.core(Service::Search, &self.config.service_paths.search))
    }

    /// A client for the configured wellbore version.
    pub fn wellbore(&self) -> WellboreClient {
        let core = self.core(Service::Wellbore, &self.config.service_paths.wellbore);
        WellboreClient::from_core(self.config.wellbore_version, core)
    }

    fn core(&self, service: Service, service_path: &str) -> ServiceClient {
        ServiceClient::new(
            service,
            &self.config.base_url,
            service_path,
            self.auth.clone(),
            self.transport.clone(),
        )
        .with_validation(self.config.validation)
    }
}

impl fmt::Debug for OsduClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsduClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::RequestOptions;
    use crate::services::{WellboreCommon, WellboreVersion};
    use crate::testing::{parts, BASE_URL};

    #[test]
    fn clients_share_the_transport() {
        let (transport, auth) = parts();
        let osdu = OsduClient::new(ClientConfig::new(BASE_URL), auth, transport.clone());
        let options = RequestOptions::partition("opendes");

        osdu.file().info(&options).unwrap();
        osdu.search().info(&options).unwrap();
        osdu.schema().info(&options).unwrap();
        osdu.wellbore().about(&options).unwrap();
        assert_eq!(transport.calls(), 4);
        assert_eq!(transport.last().url, "http://osdu.test/api/os-wellbore-ddms/ddms/v2/about");
    }

    #[test]
    fn config_flows_into_clients() {
        let (transport, auth) = parts();
        let mut config = ClientConfig::new(BASE_URL)
            .with_validation(true)
            .with_wellbore_version(WellboreVersion::V2);
        config.service_paths.search = "/search".to_string();
        let osdu = OsduClient::new(config, auth, transport.clone());

        assert!(osdu.file().core().validation_enabled());
        assert_eq!(osdu.wellbore().api_version(), WellboreVersion::V2);
        osdu.search().liveness_check(&RequestOptions::default()).unwrap();
        assert_eq!(transport.last().url, "http://osdu.test/search/health/liveness_check");
    }
}
