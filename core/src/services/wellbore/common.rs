use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{Call, ServiceClient, Validation};
use crate::error::Error;
use crate::headers::RequestOptions;
use crate::http::Body;
use crate::models::{acl_type, legal_type, Record, RECORD_LIST};
use crate::url::expand;
use crate::validation::{FieldType, Shape};

mod paths {
    pub const ABOUT: &str = "/ddms/v2/about";
    pub const VERSION: &str = "/ddms/v2/version";
    pub const RECOGNIZE_FAMILY: &str = "/log-recognition/family";
    pub const UPLOAD_CATALOG: &str = "/log-recognition/upload-catalog";
    pub const RECORD: &str = "{collection}/{id}";
    pub const RECORD_VERSIONS: &str = "{collection}/{id}/versions";
    pub const RECORD_VERSION: &str = "{collection}/{id}/versions/{version}";
    pub const SESSION: &str = "{sessions}/{session_id}";
    pub const SESSION_DATA: &str = "{sessions}/{session_id}/data";
}

/// Input to log family recognition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRequest {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purge: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    Update,
    Overwrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Commit,
    Abandon,
}

/// Opens a bulk-data session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub mode: SessionMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_version: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    /// Minutes before an idle session is abandoned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_live: Option<u32>,
}

impl SessionRequest {
    pub fn new(mode: SessionMode) -> Self {
        Self {
            mode,
            from_version: None,
            meta: None,
            time_to_live: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub state: SessionState,
}

static FAMILY: LazyLock<FieldType> = LazyLock::new(|| {
    Shape::open()
        .required("label", FieldType::string())
        .optional("log_unit", FieldType::string())
        .optional("description", FieldType::string())
        .into_type()
});

static CATALOG: LazyLock<FieldType> = LazyLock::new(|| {
    let data = Shape::open()
        .required("family_catalog", FieldType::array(FieldType::object()))
        .optional("main_family_catalog", FieldType::array(FieldType::object()))
        .into_type();
    Shape::open()
        .required("acl", acl_type())
        .required("legal", legal_type())
        .required("data", data)
        .into_type()
});

static SESSION_REQUEST: LazyLock<FieldType> = LazyLock::new(|| {
    Shape::open()
        .required("mode", FieldType::one_of(&["update", "overwrite"]))
        .optional("fromVersion", FieldType::Integer)
        .optional("meta", FieldType::Any)
        .optional("timeToLive", FieldType::Integer)
        .into_type()
});

static SESSION_UPDATE: LazyLock<FieldType> =
    LazyLock::new(|| Shape::open().required("state", FieldType::one_of(&["commit", "abandon"])).into_type());

/// Endpoints served identically by both wellbore versions.
pub trait WellboreCommon {
    fn core(&self) -> &ServiceClient;

    fn about(&self, options: &RequestOptions) -> Result<Value, Error> {
        self.core().execute(Call::get(paths::ABOUT).headers(options.overlay()))
    }

    fn version(&self, options: &RequestOptions) -> Result<Value, Error> {
        self.core().execute(Call::get(paths::VERSION).headers(options.overlay()))
    }

    /// Guess the log family from a curve label and unit.
    fn recognize_family(&self, request: &FamilyRequest, options: &RequestOptions) -> Result<Value, Error> {
        let call = Call::post(paths::RECOGNIZE_FAMILY)
            .headers(options.overlay())
            .json(request)?
            .validate(&FAMILY, Validation::WhenEnabled);
        self.core().execute(call)
    }

    /// Replace the partition's family catalog with `catalog`.
    fn upload_catalog(&self, catalog: &Value, options: &RequestOptions) -> Result<Value, Error> {
        let call = Call::put(paths::UPLOAD_CATALOG)
            .headers(options.overlay())
            .json(catalog)?
            .validate(&CATALOG, Validation::WhenEnabled);
        self.core().execute(call)
    }
}

/// Record operations on one collection, e.g. `/ddms/v3/wells`.
#[derive(Debug, Clone, Copy)]
pub struct Records<'a> {
    core: &'a ServiceClient,
    collection: &'static str,
}

impl<'a> Records<'a> {
    pub(crate) fn new(core: &'a ServiceClient, collection: &'static str) -> Self {
        Self { core, collection }
    }

    pub fn collection(&self) -> &str {
        self.collection
    }

    pub fn get(&self, id: &str, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::RECORD, &[("collection", self.collection), ("id", id)]);
        self.core.execute(Call::get(path).headers(options.overlay()))
    }

    pub fn delete(&self, id: &str, query: &DeleteQuery, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::RECORD, &[("collection", self.collection), ("id", id)]);
        self.core.execute(Call::delete(path).headers(options.overlay()).query(query)?)
    }

    pub fn create_or_update(&self, records: &[Record], options: &RequestOptions) -> Result<Value, Error> {
        let call = Call::post(self.collection)
            .headers(options.overlay())
            .json(&records)?
            .validate(&RECORD_LIST, Validation::WhenEnabled);
        self.core.execute(call)
    }

    pub fn versions(&self, id: &str, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::RECORD_VERSIONS, &[("collection", self.collection), ("id", id)]);
        self.core.execute(Call::get(path).headers(options.overlay()))
    }

    pub fn version(&self, id: &str, version: u64, options: &RequestOptions) -> Result<Value, Error> {
        let version = version.to_string();
        let path = expand(
            paths::RECORD_VERSION,
            &[("collection", self.collection), ("id", id), ("version", version.as_str())],
        );
        self.core.execute(Call::get(path).headers(options.overlay()))
    }
}

/// Bulk-data session endpoints below `sessions`, e.g.
/// `/ddms/v3/welllogs/{id}/sessions`.
pub(crate) struct Sessions<'a> {
    pub core: &'a ServiceClient,
    pub sessions: String,
}

impl Sessions<'_> {
    pub fn create(&self, request: &SessionRequest, options: &RequestOptions) -> Result<Value, Error> {
        let call = Call::post(self.sessions.as_str())
            .headers(options.overlay())
            .json(request)?
            .validate(&SESSION_REQUEST, Validation::WhenEnabled);
        self.core.execute(call)
    }

    pub fn list(&self, options: &RequestOptions) -> Result<Value, Error> {
        self.core.execute(Call::get(self.sessions.as_str()).headers(options.overlay()))
    }

    pub fn get(&self, session_id: &str, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::SESSION, &[("sessions", self.sessions.as_str()), ("session_id", session_id)]);
        self.core.execute(Call::get(path).headers(options.overlay()))
    }

    pub fn update(&self, session_id: &str, update: &SessionUpdate, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::SESSION, &[("sessions", self.sessions.as_str()), ("session_id", session_id)]);
        let call = Call::patch(path)
            .headers(options.overlay())
            .json(update)?
            .validate(&SESSION_UPDATE, Validation::WhenEnabled);
        self.core.execute(call)
    }

    pub fn send(&self, session_id: &str, data: Body, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::SESSION_DATA, &[("sessions", self.sessions.as_str()), ("session_id", session_id)]);
        self.core.execute(Call::post(path).headers(options.overlay()).body(data))
    }
}
