//! Wellbore DDMS `v2` endpoints: records, log bulk data and sessions,
//! trajectories, dipsets and the query families.

use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{Records, SessionRequest, SessionUpdate, Sessions, WellboreCommon};
use crate::auth::AuthProvider;
use crate::client::{Call, ServiceClient, Validation};
use crate::config::DEFAULT_WELLBORE_PATH;
use crate::error::{Error, Service};
use crate::headers::RequestOptions;
use crate::http::{Body, Transport};
use crate::url::expand;
use crate::validation::{FieldType, Shape};

mod paths {
    pub const LOG_DATA: &str = "/ddms/v2/logs/{log_id}/data";
    pub const LOG_UPLOAD: &str = "/ddms/v2/logs/{log_id}/upload_data";
    pub const LOG_STATISTICS: &str = "/ddms/v2/logs/{log_id}/statistics";
    pub const LOG_VERSION_DATA: &str = "/ddms/v2/logs/{log_id}/versions/{version}/data";
    pub const LOG_DECIMATED: &str = "/ddms/v2/logs/{log_id}/decimated";
    pub const LOG_SESSIONS: &str = "/ddms/v2/logs/{log_id}/sessions";
    pub const HARMONIZE: &str = "/ddms/v2/logsets/{logset_id}/harmonize";
    pub const TRAJECTORY_DATA: &str = "/ddms/v2/trajectories/{trajectory_id}/data";
    pub const DIPS: &str = "/ddms/v2/dipsets/{dipset_id}/dips";
    pub const DIPS_INSERT: &str = "/ddms/v2/dipsets/{dipset_id}/dips/insert";
    pub const DIPS_QUERY: &str = "/ddms/v2/dipsets/{dipset_id}/dips/query";
    pub const DIP: &str = "/ddms/v2/dipsets/{dipset_id}/dips/{index}";

    pub const QUERY: &str = "/ddms/query";
    pub const FAST_QUERY: &str = "/ddms/fastquery";
    pub const WELLBORES: &str = "{family}/wellbores";
    pub const BY_DISTANCE: &str = "{family}/wellbores/bydistance";
    pub const BY_BOUNDING_BOX: &str = "{family}/wellbores/byboundingbox";
    pub const BY_GEO_POLYGON: &str = "{family}/wellbores/bygeopolygon";
    pub const WELLBORE_LOGSETS: &str = "{family}/wellbores/{wellbore_id}/logsets";
    pub const WELLBORE_LOGS: &str = "{family}/wellbores/{wellbore_id}/logs";
    pub const LOGSET_LOGS: &str = "{family}/logsets/{logset_id}/logs";
    pub const WELLBORE_MARKERS: &str = "{family}/wellbore/{wellbore_id}/markers";
}

const UPLOAD_FIELD: &str = "file";

/// Record collections of the v2 API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum V2Kind {
    Wells,
    Wellbores,
    Logsets,
    Logs,
    Trajectories,
    Markers,
    Dipsets,
}

impl V2Kind {
    pub fn collection(self) -> &'static str {
        match self {
            V2Kind::Wells => "/ddms/v2/wells",
            V2Kind::Wellbores => "/ddms/v2/wellbores",
            V2Kind::Logsets => "/ddms/v2/logsets",
            V2Kind::Logs => "/ddms/v2/logs",
            V2Kind::Trajectories => "/ddms/v2/trajectories",
            V2Kind::Markers => "/ddms/v2/markers",
            V2Kind::Dipsets => "/ddms/v2/dipsets",
        }
    }
}

/// Column layout of bulk data in JSON responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orient {
    Split,
    Index,
    Columns,
    Records,
    Values,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogDataQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orient: Option<Orient>,
    #[serde(rename = "bulk-path", skip_serializing_if = "Option::is_none")]
    pub bulk_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecimatedQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantiles: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orient: Option<Orient>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TrajectoryQuery {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orient: Option<Orient>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DipsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DipSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_reference: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_reference: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    pub value: f64,
    pub unit_key: String,
}

impl Measure {
    pub fn new(value: f64, unit_key: impl Into<String>) -> Self {
        Self {
            value,
            unit_key: unit_key.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dip {
    pub reference: Measure,
    pub azimuth: Measure,
    pub inclination: Measure,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_coordinate: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_coordinate: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_coordinate: Option<Measure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius in metres.
    pub distance: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wktype: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundingBoxQuery {
    pub latitude_top_left: f64,
    pub longitude_top_left: f64,
    pub latitude_bottom_right: f64,
    pub longitude_bottom_right: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wktype: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
}

fn measure_type() -> FieldType {
    Shape::open()
        .required("value", FieldType::Number)
        .required("unitKey", FieldType::string())
        .into_type()
}

fn dip_type() -> FieldType {
    Shape::open()
        .required("reference", measure_type())
        .required("azimuth", measure_type())
        .required("inclination", measure_type())
        .optional("quality", measure_type())
        .optional("xCoordinate", measure_type())
        .optional("yCoordinate", measure_type())
        .optional("zCoordinate", measure_type())
        .optional("classification", FieldType::string())
        .into_type()
}

static DIP: LazyLock<FieldType> = LazyLock::new(dip_type);

static DIP_LIST: LazyLock<FieldType> = LazyLock::new(|| FieldType::array(dip_type()));

static GEO_POLYGON: LazyLock<FieldType> = LazyLock::new(|| {
    let point = Shape::open()
        .required("latitude", FieldType::Number)
        .required("longitude", FieldType::Number)
        .into_type();
    FieldType::array(point)
});

#[derive(Debug, Clone)]
pub struct WellboreV2Client {
    core: ServiceClient,
}

impl WellboreV2Client {
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

    pub fn records(&self, kind: V2Kind) -> Records<'_> {
        Records::new(&self.core, kind.collection())
    }

    pub fn query(&self) -> Query<'_> {
        Query {
            core: &self.core,
            family: paths::QUERY,
        }
    }

    /// Same lookups as [`query`](Self::query), answered from the search
    /// index without loading full records.
    pub fn fast_query(&self) -> Query<'_> {
        Query {
            core: &self.core,
            family: paths::FAST_QUERY,
        }
    }

    pub fn get_log_data(&self, log_id: &str, query: &LogDataQuery, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::LOG_DATA, &[("log_id", log_id)]);
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    pub fn write_log_data(&self, log_id: &str, data: Body, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::LOG_DATA, &[("log_id", log_id)]);
        self.core.execute(Call::post(path).headers(options.overlay()).body(data))
    }

    /// Upload a CSV or JSON file as the log's bulk data.
    pub fn upload_log_data(
        &self,
        log_id: &str,
        filename: &str,
        data: &[u8],
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let path = expand(paths::LOG_UPLOAD, &[("log_id", log_id)]);
        let call = Call::post(path)
            .headers(options.overlay())
            .body(Body::multipart_file(UPLOAD_FIELD, filename, data));
        self.core.execute(call)
    }

    pub fn get_log_statistics(&self, log_id: &str, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::LOG_STATISTICS, &[("log_id", log_id)]);
        self.core.execute(Call::get(path).headers(options.overlay()))
    }

    pub fn get_log_version_data(
        &self,
        log_id: &str,
        version: u64,
        query: &LogDataQuery,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let version = version.to_string();
        let path = expand(paths::LOG_VERSION_DATA, &[("log_id", log_id), ("version", version.as_str())]);
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    pub fn get_log_decimated(
        &self,
        log_id: &str,
        query: &DecimatedQuery,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let path = expand(paths::LOG_DECIMATED, &[("log_id", log_id)]);
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    pub fn create_log_session(
        &self,
        log_id: &str,
        request: &SessionRequest,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        self.log_sessions(log_id).create(request, options)
    }

    pub fn list_log_sessions(&self, log_id: &str, options: &RequestOptions) -> Result<Value, Error> {
        self.log_sessions(log_id).list(options)
    }

    pub fn get_log_session(&self, log_id: &str, session_id: &str, options: &RequestOptions) -> Result<Value, Error> {
        self.log_sessions(log_id).get(session_id, options)
    }

    /// Commit or abandon a session.
    pub fn update_log_session(
        &self,
        log_id: &str,
        session_id: &str,
        update: &SessionUpdate,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        self.log_sessions(log_id).update(session_id, update, options)
    }

    pub fn send_log_session_data(
        &self,
        log_id: &str,
        session_id: &str,
        data: Body,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        self.log_sessions(log_id).send(session_id, data, options)
    }

    fn log_sessions(&self, log_id: &str) -> Sessions<'_> {
        Sessions {
            core: &self.core,
            sessions: expand(paths::LOG_SESSIONS, &[("log_id", log_id)]),
        }
    }

    /// Align the reference curves of every log in the logset.
    pub fn harmonize_logset(&self, logset_id: &str, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::HARMONIZE, &[("logset_id", logset_id)]);
        self.core.execute(Call::post(path).headers(options.overlay()))
    }

    pub fn get_trajectory_data(
        &self,
        trajectory_id: &str,
        query: &TrajectoryQuery,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let path = expand(paths::TRAJECTORY_DATA, &[("trajectory_id", trajectory_id)]);
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    pub fn post_trajectory_data(
        &self,
        trajectory_id: &str,
        data: Body,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let path = expand(paths::TRAJECTORY_DATA, &[("trajectory_id", trajectory_id)]);
        self.core.execute(Call::post(path).headers(options.overlay()).body(data))
    }

    pub fn get_dips(&self, dipset_id: &str, query: &DipsQuery, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::DIPS, &[("dipset_id", dipset_id)]);
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    /// Replace all dips of the dipset.
    pub fn post_dips(&self, dipset_id: &str, dips: &[Dip], options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::DIPS, &[("dipset_id", dipset_id)]);
        self.dips_call(Call::post(path), dips, options)
    }

    /// Insert dips, keeping the dipset ordered by reference.
    pub fn insert_dips(&self, dipset_id: &str, dips: &[Dip], options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::DIPS_INSERT, &[("dipset_id", dipset_id)]);
        self.dips_call(Call::post(path), dips, options)
    }

    fn dips_call(&self, call: Call, dips: &[Dip], options: &RequestOptions) -> Result<Value, Error> {
        let call = call
            .headers(options.overlay())
            .json(&dips)?
            .validate(&DIP_LIST, Validation::WhenEnabled);
        self.core.execute(call)
    }

    pub fn query_dips(&self, dipset_id: &str, search: &DipSearch, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::DIPS_QUERY, &[("dipset_id", dipset_id)]);
        self.core.execute(Call::get(path).headers(options.overlay()).query(search)?)
    }

    pub fn get_dip(&self, dipset_id: &str, index: u32, options: &RequestOptions) -> Result<Value, Error> {
        self.core.execute(Call::get(dip_path(dipset_id, index)).headers(options.overlay()))
    }

    pub fn patch_dip(&self, dipset_id: &str, index: u32, dip: &Dip, options: &RequestOptions) -> Result<Value, Error> {
        let call = Call::patch(dip_path(dipset_id, index))
            .headers(options.overlay())
            .json(dip)?
            .validate(&DIP, Validation::WhenEnabled);
        self.core.execute(call)
    }

    pub fn delete_dip(&self, dipset_id: &str, index: u32, options: &RequestOptions) -> Result<Value, Error> {
        self.core.execute(Call::delete(dip_path(dipset_id, index)).headers(options.overlay()))
    }
}

impl WellboreCommon for WellboreV2Client {
    fn core(&self) -> &ServiceClient {
        &self.core
    }
}

fn dip_path(dipset_id: &str, index: u32) -> String {
    let index = index.to_string();
    expand(paths::DIP, &[("dipset_id", dipset_id), ("index", index.as_str())])
}

/// Lookups under `/ddms/query` or `/ddms/fastquery`.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    core: &'a ServiceClient,
    family: &'static str,
}

impl Query<'_> {
    pub fn wellbores(&self, query: &NameQuery, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::WELLBORES, &[("family", self.family)]);
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    pub fn wellbores_by_distance(&self, query: &DistanceQuery, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::BY_DISTANCE, &[("family", self.family)]);
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    pub fn wellbores_by_bounding_box(
        &self,
        query: &BoundingBoxQuery,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let path = expand(paths::BY_BOUNDING_BOX, &[("family", self.family)]);
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    /// Wellbores inside the polygon described by `points`.
    pub fn wellbores_by_geo_polygon(
        &self,
        points: &[GeoPoint],
        wktype: Option<&str>,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let path = expand(paths::BY_GEO_POLYGON, &[("family", self.family)]);
        let mut call = Call::post(path).headers(options.overlay());
        if let Some(wktype) = wktype {
            call = call.query_pair("wktype", wktype);
        }
        let call = call.json(&points)?.validate(&GEO_POLYGON, Validation::WhenEnabled);
        self.core.execute(call)
    }

    pub fn wellbore_logsets(&self, wellbore_id: &str, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::WELLBORE_LOGSETS, &[("family", self.family), ("wellbore_id", wellbore_id)]);
        self.core.execute(Call::get(path).headers(options.overlay()))
    }

    pub fn wellbore_logs(
        &self,
        wellbore_id: &str,
        query: &LogsQuery,
        options: &RequestOptions,
    ) -> Result<Value, Error> {
        let path = expand(paths::WELLBORE_LOGS, &[("family", self.family), ("wellbore_id", wellbore_id)]);
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    pub fn logset_logs(&self, logset_id: &str, query: &LogsQuery, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::LOGSET_LOGS, &[("family", self.family), ("logset_id", logset_id)]);
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    pub fn wellbore_markers(&self, wellbore_id: &str, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::WELLBORE_MARKERS, &[("family", self.family), ("wellbore_id", wellbore_id)]);
        self.core.execute(Call::get(path).headers(options.overlay()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;
    use crate::services::wellbore::{DeleteQuery, SessionMode, SessionState};
    use crate::testing::{parts, sample_record, MockTransport, BASE_URL};

    const ROOT: &str = "http://osdu.test/api/os-wellbore-ddms";

    fn v2_client() -> (Arc<MockTransport>, WellboreV2Client) {
        let (transport, auth) = parts();
        (transport.clone(), WellboreV2Client::new(BASE_URL, auth, transport))
    }

    fn dip(reference: f64) -> Dip {
        Dip {
            reference: Measure::new(reference, "m"),
            azimuth: Measure::new(12.0, "dega"),
            inclination: Measure::new(3.5, "dega"),
            quality: None,
            x_coordinate: None,
            y_coordinate: None,
            z_coordinate: None,
            classification: Some("fracture".into()),
        }
    }

    #[test]
    fn record_families_map_to_collections() {
        let (transport, client) = v2_client();
        let options = RequestOptions::partition("opendes");
        client.records(V2Kind::Dipsets).get("ds-1", &options).unwrap();
        assert_eq!(transport.last().url, format!("{ROOT}/ddms/v2/dipsets/ds-1"));

        client.records(V2Kind::Logsets).versions("ls-1", &options).unwrap();
        assert_eq!(transport.last().url, format!("{ROOT}/ddms/v2/logsets/ls-1/versions"));

        client
            .records(V2Kind::Wells)
            .delete("w-1", &DeleteQuery { purge: None, recursive: Some(true) }, &options)
            .unwrap();
        let req = transport.last();
        assert_eq!(req.url, format!("{ROOT}/ddms/v2/wells/w-1"));
        assert_eq!(req.query_values("recursive"), vec!["true"]);

        client
            .records(V2Kind::Markers)
            .create_or_update(&[sample_record()], &options)
            .unwrap();
        assert_eq!(transport.last().url, format!("{ROOT}/ddms/v2/markers"));
    }

    #[test]
    fn log_data_query_uses_dashed_bulk_path() {
        let (transport, client) = v2_client();
        let query = LogDataQuery {
            orient: Some(Orient::Split),
            bulk_path: Some("$.data.log".into()),
        };
        client.get_log_data("log-1", &query, &RequestOptions::default()).unwrap();
        let req = transport.last();
        assert_eq!(req.url, format!("{ROOT}/ddms/v2/logs/log-1/data"));
        assert_eq!(req.query_values("bulk-path"), vec!["$.data.log"]);
        assert_eq!(req.query_values("orient"), vec!["split"]);
    }

    #[test]
    fn decimated_and_version_data() {
        let (transport, client) = v2_client();
        let query = DecimatedQuery {
            quantiles: Some(100),
            start: Some(1000.0),
            stop: Some(1500.5),
            orient: None,
        };
        client.get_log_decimated("log-1", &query, &RequestOptions::default()).unwrap();
        let req = transport.last();
        assert_eq!(req.query_values("quantiles"), vec!["100"]);
        assert_eq!(req.query_values("start"), vec!["1000.0"]);
        assert_eq!(req.query_values("stop"), vec!["1500.5"]);

        client
            .get_log_version_data("log-1", 2, &LogDataQuery::default(), &RequestOptions::default())
            .unwrap();
        let req = transport.last();
        assert_eq!(req.url, format!("{ROOT}/ddms/v2/logs/log-1/versions/2/data"));
        assert!(req.query.is_empty());
    }

    #[test]
    fn upload_log_data_is_multipart() {
        let (transport, client) = v2_client();
        client
            .upload_log_data("log-1", "gr.csv", b"MD,GR\n1,2\n", &RequestOptions::default())
            .unwrap();
        let req = transport.last();
        assert_eq!(req.url, format!("{ROOT}/ddms/v2/logs/log-1/upload_data"));
        assert!(req.header("content-type").unwrap().starts_with("multipart/form-data"));
    }

    #[test]
    fn log_session_calls() {
        let (transport, client) = v2_client();
        let options = RequestOptions::default();
        client
            .create_log_session("log-1", &SessionRequest::new(SessionMode::Overwrite), &options)
            .unwrap();
        let req = transport.last();
        assert_eq!(req.url, format!("{ROOT}/ddms/v2/logs/log-1/sessions"));
        assert_eq!(req.body.unwrap().as_json().unwrap(), &json!({"mode": "overwrite"}));

        client.list_log_sessions("log-1", &options).unwrap();
        assert_eq!(transport.last().method, HttpMethod::Get);

        client
            .update_log_session("log-1", "s-9", &SessionUpdate { state: SessionState::Abandon }, &options)
            .unwrap();
        assert_eq!(transport.last().url, format!("{ROOT}/ddms/v2/logs/log-1/sessions/s-9"));
    }

    #[test]
    fn dips_are_camel_cased_and_validated() {
        let (transport, client) = v2_client();
        let client = client.with_validation(true);
        client.insert_dips("ds-1", &[dip(1000.0), dip(1010.0)], &RequestOptions::default()).unwrap();
        let req = transport.last();
        assert_eq!(req.url, format!("{ROOT}/ddms/v2/dipsets/ds-1/dips/insert"));
        let body = req.body.unwrap();
        assert_eq!(body.as_json().unwrap()[0]["reference"], json!({"value": 1000.0, "unitKey": "m"}));

        client.patch_dip("ds-1", 3, &dip(1020.0), &RequestOptions::default()).unwrap();
        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, format!("{ROOT}/ddms/v2/dipsets/ds-1/dips/3"));
    }

    #[test]
    fn dip_search_parameters() {
        let (transport, client) = v2_client();
        let search = DipSearch {
            min_reference: Some(100.0),
            max_reference: None,
            classification: Some("breakout".into()),
        };
        client.query_dips("ds-1", &search, &RequestOptions::default()).unwrap();
        let req = transport.last();
        assert_eq!(req.url, format!("{ROOT}/ddms/v2/dipsets/ds-1/dips/query"));
        assert_eq!(req.query_values("min_reference"), vec!["100.0"]);
        assert!(req.query_values("max_reference").is_empty());
        assert_eq!(req.query_values("classification"), vec!["breakout"]);

        client
            .get_dips("ds-1", &DipsQuery { index: Some(0), limit: Some(50) }, &RequestOptions::default())
            .unwrap();
        assert_eq!(transport.last().query_values("limit"), vec!["50"]);
    }

    #[test]
    fn trajectory_channels_repeat() {
        let (transport, client) = v2_client();
        let query = TrajectoryQuery {
            channels: vec!["MD".into(), "AZIMUTH".into()],
            orient: None,
        };
        client.get_trajectory_data("t-1", &query, &RequestOptions::default()).unwrap();
        assert_eq!(transport.last().query_values("channels"), vec!["MD", "AZIMUTH"]);
    }

    #[test]
    fn query_families_share_paths() {
        let (transport, client) = v2_client();
        let options = RequestOptions::default();
        client.query().wellbore_markers("wb-1", &options).unwrap();
        assert_eq!(transport.last().url, format!("{ROOT}/ddms/query/wellbore/wb-1/markers"));

        client
            .fast_query()
            .logset_logs("ls-1", &LogsQuery::default(), &options)
            .unwrap();
        assert_eq!(transport.last().url, format!("{ROOT}/ddms/fastquery/logsets/ls-1/logs"));

        let distance = DistanceQuery {
            latitude: 29.7,
            longitude: -95.3,
            distance: 5000,
            wktype: None,
        };
        client.query().wellbores_by_distance(&distance, &options).unwrap();
        let req = transport.last();
        assert_eq!(req.url, format!("{ROOT}/ddms/query/wellbores/bydistance"));
        assert_eq!(req.query_values("distance"), vec!["5000"]);
    }

    #[test]
    fn geo_polygon_posts_points() {
        let (transport, client) = v2_client();
        let client = client.with_validation(true);
        let points = [
            GeoPoint { latitude: 1.0, longitude: 2.0 },
            GeoPoint { latitude: 3.0, longitude: 4.0 },
        ];
        client
            .query()
            .wellbores_by_geo_polygon(&points, Some("wgs84"), &RequestOptions::default())
            .unwrap();
        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.query_values("wktype"), vec!["wgs84"]);
        assert_eq!(
            req.body.unwrap().as_json().unwrap(),
            &json!([{"latitude": 1.0, "longitude": 2.0}, {"latitude": 3.0, "longitude": 4.0}])
        );
    }

    #[test]
    fn every_body_schema_accepts_its_request_type() {
        let points = [GeoPoint { latitude: 29.7, longitude: -95.3 }];
        let mut full = dip(1000.0);
        full.quality = Some(Measure::new(0.9, "unitless"));
        full.x_coordinate = Some(Measure::new(1.0, "m"));
        let cases: Vec<(Value, &FieldType)> = vec![
            (serde_json::to_value(points).unwrap(), &*GEO_POLYGON),
            (serde_json::to_value(dip(1000.0)).unwrap(), &*DIP),
            (serde_json::to_value(&full).unwrap(), &*DIP),
            (serde_json::to_value([dip(1.0), full]).unwrap(), &*DIP_LIST),
        ];
        for (payload, schema) in cases {
            assert!(crate::validation::validate(&payload, schema).is_ok(), "{payload}");
        }
    }

    #[test]
    fn geo_polygon_rejects_points_without_longitude() {
        let messages = crate::validation::messages(&json!([{"latitude": 1.0}]), &GEO_POLYGON);
        assert_eq!(messages, [r#"Field required missing in 0.longitude. Input: {"latitude":1.0}"#]);
    }

    #[test]
    fn shared_endpoints_are_available() {
        let (transport, client) = v2_client();
        client.about(&RequestOptions::default()).unwrap();
        assert_eq!(transport.last().url, format!("{ROOT}/ddms/v2/about"));
    }
}
