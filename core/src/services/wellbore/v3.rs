//! Wellbore DDMS `v3` endpoints: records and the bulk-data families of well
//! logs and wellbore trajectories.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::common::{Records, SessionRequest, SessionUpdate, Sessions, WellboreCommon};
use crate::auth::AuthProvider;
use crate::client::{Call, ServiceClient};
use crate::config::DEFAULT_WELLBORE_PATH;
use crate::error::{Error, Service};
use crate::headers::RequestOptions;
use crate::http::{Body, Transport};
use crate::url::expand;

mod paths {
    pub const DATA: &str = "{prefix}/{record_id}/data";
    pub const STATISTICS: &str = "{prefix}/{record_id}/data/statistics";
    pub const VERSION_DATA: &str = "{prefix}/{record_id}/versions/{version}/data";
    pub const UPLOAD: &str = "{prefix}/{record_id}/upload_data";
    pub const SESSIONS: &str = "{prefix}/{record_id}/sessions";
}

const UPLOAD_FIELD: &str = "file";

/// Record collections of the v3 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum V3Kind {
    Wells,
    Wellbores,
    WellLogs,
    WellboreTrajectories,
    WellboreMarkerSets,
}

impl V3Kind {
    pub fn collection(self) -> &'static str {
        match self {
            V3Kind::Wells => "/ddms/v3/wells",
            V3Kind::Wellbores => "/ddms/v3/wellbores",
            V3Kind::WellLogs => "/ddms/v3/welllogs",
            V3Kind::WellboreTrajectories => "/ddms/v3/wellboretrajectories",
            V3Kind::WellboreMarkerSets => "/ddms/v3/wellboremarkersets",
        }
    }
}

/// Record families that carry bulk data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkKind {
    WellLog,
    WellboreTrajectory,
}

impl BulkKind {
    pub fn collection(self) -> &'static str {
        match self {
            BulkKind::WellLog => V3Kind::WellLogs.collection(),
            BulkKind::WellboreTrajectory => V3Kind::WellboreTrajectories.collection(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkDataQuery {
    /// Comma-separated curve names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curves: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub describe: Option<bool>,
    /// Row filter such as `MD:gte:1000`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl BulkDataQuery {
    pub fn with_curves(mut self, curves: &[&str]) -> Self {
        self.curves = Some(curves.join(","));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatisticsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curves: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WellboreV3Client {
    core: ServiceClient,
}

impl WellboreV3Client {
    pub fn new(base_url: &str, auth: Arc<dyn AuthProvider>, transport: Arc<dyn Transport>) -> Self {
        Self::from_core(ServiceClient::new(Service::Wellbore, base_url, DEFAULT_WELLBORE_PATH, auth, transport))
    }

    pub fn from_core(core: ServiceClient) -> Self {
        Self { core }
    }

    pub fn with_service_path(self, service_path: &str) -> Self {
        Self::from_core(self.core.with_service_path(service_path))
    }

    pub fn with_validation(self, enabled: bool) -> Self {
        Self::from_core(self.core.with_validation(enabled))
    }

    pub fn records(&self, kind: V3Kind) -> Records<'_> {
        Records::new(&self.core, kind.collection())
    }

    pub fn bulk(&self, kind: BulkKind) -> Bulk<'_> {
        Bulk {
            core: &self.core,
            prefix: kind.collection(),
        }
    }
}

impl WellboreCommon for WellboreV3Client {
    fn core(&self) -> &ServiceClient {
        &self.core
    }
}

/// Bulk data of one record family.
#[derive(Debug, Clone, Copy)]
pub struct Bulk<'a> {
    core: &'a ServiceClient,
    prefix: &'static str,
}

impl Bulk<'_> {
    fn path(&self, template: &str, record_id: &str) -> String {
        expand(template, &[("prefix", self.prefix), ("record_id", record_id)])
    }

    pub fn get_data(&self, record_id: &str, query: &BulkDataQuery, options: &RequestOptions) -> Result<Value, Error> {
        let path = self.path(paths::DATA, record_id);
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    /// Replace the record's bulk data with `data` (JSON or parquet).
    pub fn write_data(&self, record_id: &str, data: Body, options: &RequestOptions) -> Result<Value, Error> {
        let path = self.path(paths::DATA, record_id);
        self.core.execute(Call::post(path).headers(options.overlay()).body(data))
    }

    pub fn get_data_statistics(
        &self,
        record_id: &str,
        query: &StatisticsQuery,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let path = self.path(paths::STATISTICS, record_id);
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    pub fn get_version_data(
        &self,
        record_id: &str,
        version: u64,
        query: &BulkDataQuery,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let version = version.to_string();
        let path = expand(
            paths::VERSION_DATA,
            &[("prefix", self.prefix), ("record_id", record_id), ("version", version.as_str())],
        );
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    pub fn upload_data(
        &self,
        record_id: &str,
        filename: &str,
        data: &[u8],
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let path = self.path(paths::UPLOAD, record_id);
        let call = Call::post(path)
            .headers(options.overlay())
            .body(Body::multipart_file(UPLOAD_FIELD, filename, data));
        self.core.execute(call)
    }

    pub fn create_session(
        &self,
        record_id: &str,
        request: &SessionRequest,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        self.sessions(record_id).create(request, options)
    }

    pub fn list_sessions(&self, record_id: &str, options: &RequestOptions) -> Result<Value, Error> {
        self.sessions(record_id).list(options)
    }

    pub fn get_session(&self, record_id: &str, session_id: &str, options: &RequestOptions) -> Result<Value, Error> {
        self.sessions(record_id).get(session_id, options)
    }

    pub fn update_session(
        &self,
        record_id: &str,
        session_id: &str,
        update: &SessionUpdate,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        self.sessions(record_id).update(session_id, update, options)
    }

    pub fn send_session_data(
        &self,
        record_id: &str,
        session_id: &str,
        data: Body,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        self.sessions(record_id).send(session_id, data, options)
    }

    fn sessions(&self, record_id: &str) -> Sessions<'_> {
        Sessions {
            core: self.core,
            sessions: self.path(paths::SESSIONS, record_id),
        }
    }
}
