//! File service client (`/api/file`).

use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::AuthProvider;
use crate::client::{Call, ServiceClient, Validation};
use crate::config::DEFAULT_FILE_PATH;
use crate::error::{Error, Service};
use crate::headers::RequestOptions;
use crate::http::Transport;
use crate::models::{record_shape, Record};
use crate::url::expand;
use crate::validation::{FieldType, Shape};

mod paths {
    pub const INFO: &str = "/v2/info";
    pub const LIVENESS: &str = "/v2/liveness_check";
    pub const READINESS: &str = "/v2/readiness_check";
    pub const UPLOAD_URL: &str = "/v2/files/uploadURL";
    pub const METADATA: &str = "/v2/files/metadata";
    pub const METADATA_BY_ID: &str = "/v2/files/{id}/metadata";
    pub const DOWNLOAD_URL: &str = "/v2/files/{id}/downloadURL";
    pub const GET_LOCATION: &str = "/v2/getLocation";
    pub const GET_FILE_LOCATION: &str = "/v2/getFileLocation";
    pub const GET_FILE_LIST: &str = "/v2/getFileList";
    pub const SIGNED_URL: &str = "/v2/delivery/getFileSignedUrl";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpiryQuery {
    /// Lifetime of the signed URL, e.g. `"7D"` or `"1H"`.
    #[serde(rename = "expiryTime", skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRequest {
    #[serde(rename = "FileID", skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLocationRequest {
    #[serde(rename = "FileID")]
    pub file_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListRequest {
    #[serde(rename = "TimeFrom")]
    pub time_from: String,
    #[serde(rename = "TimeTo")]
    pub time_to: String,
    #[serde(rename = "PageNum", skip_serializing_if = "Option::is_none")]
    pub page_num: Option<i64>,
    #[serde(rename = "Items", skip_serializing_if = "Option::is_none")]
    pub items: Option<i64>,
    #[serde(rename = "UserID", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrlRequest {
    pub srns: Vec<String>,
}

static FILE_METADATA: LazyLock<FieldType> = LazyLock::new(|| {
    let file_source = Shape::open().required("FileSource", FieldType::string()).into_type();
    let properties = Shape::open().required("FileSourceInfo", file_source).into_type();
    let data = Shape::open()
        .required("DatasetProperties", properties)
        .optional("Name", FieldType::string())
        .optional("Description", FieldType::string())
        .optional("Endian", FieldType::one_of(&["BIG", "LITTLE"]))
        .into_type();
    record_shape(data, true).into_type()
});

static LOCATION: LazyLock<FieldType> =
    LazyLock::new(|| Shape::open().optional("FileID", FieldType::string()).into_type());

static FILE_LOCATION: LazyLock<FieldType> =
    LazyLock::new(|| Shape::open().required("FileID", FieldType::string()).into_type());

static FILE_LIST: LazyLock<FieldType> = LazyLock::new(|| {
    Shape::open()
        .required("TimeFrom", FieldType::string())
        .required("TimeTo", FieldType::string())
        .optional("PageNum", FieldType::Integer)
        .optional("Items", FieldType::Integer)
        .optional("UserID", FieldType::string())
        .into_type()
});

static SIGNED_URL: LazyLock<FieldType> =
    LazyLock::new(|| Shape::open().required("srns", FieldType::array(FieldType::string())).into_type());

/// Client for the File service. Bodies are checked only when validation is
/// enabled.
#[derive(Debug, Clone)]
pub struct FileClient {
    core: ServiceClient,
}

impl FileClient {
    pub fn new(base_url: &str, auth: Arc<dyn AuthProvider>, transport: Arc<dyn Transport>) -> Self {
        Self::from_core(ServiceClient::new(Service::File, base_url, DEFAULT_FILE_PATH, auth, transport))
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

    pub fn core(&self) -> &ServiceClient {
        &self.core
    }

    pub fn info(&self, options: &RequestOptions) -> Result<Value, Error> {
        self.core.execute(Call::get(paths::INFO).headers(options.overlay()))
    }

    pub fn liveness_check(&self, options: &RequestOptions) -> Result<Value, Error> {
        self.core.execute(Call::get(paths::LIVENESS).headers(options.overlay()))
    }

    pub fn readiness_check(&self, options: &RequestOptions) -> Result<Value, Error> {
        self.core.execute(Call::get(paths::READINESS).headers(options.overlay()))
    }

    /// Signed URL and file source for a new upload.
    pub fn get_upload_url(&self, query: &ExpiryQuery, options: &RequestOptions) -> Result<Value, Error> {
        self.core.execute(Call::get(paths::UPLOAD_URL).headers(options.overlay()).query(query)?)
    }

    /// Register metadata for an uploaded file.
    pub fn post_files_metadata(&self, record: &Record, options: &RequestOptions) -> Result<Value, Error> {
        let call = Call::post(paths::METADATA)
            .headers(options.overlay())
            .json(record)?
            .validate(&FILE_METADATA, Validation::WhenEnabled);
        self.core.execute(call)
    }

    pub fn get_files_metadata(&self, id: &str, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::METADATA_BY_ID, &[("id", id)]);
        self.core.execute(Call::get(path).headers(options.overlay()))
    }

    pub fn delete_files_metadata(&self, id: &str, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::METADATA_BY_ID, &[("id", id)]);
        self.core.execute(Call::delete(path).headers(options.overlay()))
    }

    pub fn get_download_url(&self, id: &str, query: &ExpiryQuery, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::DOWNLOAD_URL, &[("id", id)]);
        self.core.execute(Call::get(path).headers(options.overlay()).query(query)?)
    }

    /// Legacy location request; the service allocates an id when none is given.
    pub fn get_location(&self, request: &LocationRequest, options: &RequestOptions) -> Result<Value, Error> {
        let call = Call::post(paths::GET_LOCATION)
            .headers(options.overlay())
            .json(request)?
            .validate(&LOCATION, Validation::WhenEnabled);
        self.core.execute(call)
    }

    pub fn get_file_location(&self, request: &FileLocationRequest, options: &RequestOptions) -> Result<Value, Error> {
        let call = Call::post(paths::GET_FILE_LOCATION)
            .headers(options.overlay())
            .json(request)?
            .validate(&FILE_LOCATION, Validation::WhenEnabled);
        self.core.execute(call)
    }

    pub fn get_file_list(&self, request: &FileListRequest, options: &RequestOptions) -> Result<Value, Error> {
        let call = Call::post(paths::GET_FILE_LIST)
            .headers(options.overlay())
            .json(request)?
            .validate(&FILE_LIST, Validation::WhenEnabled);
        self.core.execute(call)
    }

    pub fn get_file_signed_url(&self, request: &SignedUrlRequest, options: &RequestOptions) -> Result<Value, Error> {
        let call = Call::post(paths::SIGNED_URL)
            .headers(options.overlay())
            .json(request)?
            .validate(&SIGNED_URL, Validation::WhenEnabled);
        self.core.execute(call)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{parts, sample_record, MockTransport, BASE_URL};

    fn file_client() -> (Arc<MockTransport>, FileClient) {
        let (transport, auth) = parts();
        (transport.clone(), FileClient::new(BASE_URL, auth, transport))
    }

    fn file_record() -> Record {
        sample_record().with_data(json!({
            "DatasetProperties": {"FileSourceInfo": {"FileSource": "/osdu-user/1/file.las"}},
            "Name": "file.las"
        }))
    }

    #[test]
    fn metadata_by_id_uses_verbatim_id() {
        let (transport, client) = file_client();
        client
            .get_files_metadata("opendes:dataset--File.Generic:abc", &RequestOptions::partition("opendes"))
            .unwrap();
        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.url,
            "http://osdu.test/api/file/v2/files/opendes:dataset--File.Generic:abc/metadata"
        );
        assert_eq!(req.header("data-partition-id"), Some("opendes"));
    }

    #[test]
    fn expiry_time_is_camel_cased() {
        let (transport, client) = file_client();
        let query = ExpiryQuery {
            expiry_time: Some("1H".into()),
        };
        client.get_download_url("f1", &query, &RequestOptions::default()).unwrap();
        let req = transport.last();
        assert_eq!(req.url, "http://osdu.test/api/file/v2/files/f1/downloadURL");
        assert_eq!(req.query, vec![("expiryTime".to_string(), "1H".to_string())]);
    }

    #[test]
    fn upload_url_without_expiry_has_no_query() {
        let (transport, client) = file_client();
        client.get_upload_url(&ExpiryQuery::default(), &RequestOptions::default()).unwrap();
        assert!(transport.last().query.is_empty());
    }

    #[test]
    fn legacy_bodies_use_pascal_case() {
        let (transport, client) = file_client();
        client
            .get_file_list(
                &FileListRequest {
                    time_from: "2024-01-01T00:00:00Z".into(),
                    time_to: "2024-02-01T00:00:00Z".into(),
                    page_num: Some(0),
                    items: Some(10),
                    user_id: None,
                },
                &RequestOptions::default(),
            )
            .unwrap();
        let body = transport.last().body.unwrap();
        assert_eq!(
            body.as_json().unwrap(),
            &json!({"TimeFrom": "2024-01-01T00:00:00Z", "TimeTo": "2024-02-01T00:00:00Z", "PageNum": 0, "Items": 10})
        );

        client
            .get_file_location(&FileLocationRequest { file_id: "f-1".into() }, &RequestOptions::default())
            .unwrap();
        assert_eq!(transport.last().body.unwrap().as_json().unwrap(), &json!({"FileID": "f-1"}));
    }

    #[test]
    fn valid_metadata_passes_validation() {
        let (transport, client) = file_client();
        let client = client.with_validation(true);
        client.post_files_metadata(&file_record(), &RequestOptions::partition("opendes")).unwrap();
        assert_eq!(transport.calls(), 1);
        assert_eq!(transport.last().url, "http://osdu.test/api/file/v2/files/metadata");
    }

    #[test]
    fn metadata_without_file_source_is_rejected() {
        let (transport, client) = file_client();
        let client = client.with_validation(true);
        let record = sample_record().with_data(json!({"DatasetProperties": {"FileSourceInfo": {}}}));
        let err = client.post_files_metadata(&record, &RequestOptions::default()).unwrap_err();
        let Error::File(service_error) = err else {
            panic!("expected a file error");
        };
        assert_eq!(
            service_error.field_messages(),
            ["Field required missing in data.DatasetProperties.FileSourceInfo.FileSource. Input: {}"]
        );
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn every_body_schema_accepts_its_request_type() {
        let cases: Vec<(Value, &FieldType)> = vec![
            (serde_json::to_value(file_record()).unwrap(), &*FILE_METADATA),
            (serde_json::to_value(LocationRequest::default()).unwrap(), &*LOCATION),
            (
                serde_json::to_value(FileLocationRequest { file_id: "f".into() }).unwrap(),
                &*FILE_LOCATION,
            ),
            (
                serde_json::to_value(FileListRequest {
                    time_from: "a".into(),
                    time_to: "b".into(),
                    page_num: None,
                    items: None,
                    user_id: Some("u".into()),
                })
                .unwrap(),
                &*FILE_LIST,
            ),
            (
                serde_json::to_value(SignedUrlRequest { srns: vec!["srn:file/csv:1:".into()] }).unwrap(),
                &*SIGNED_URL,
            ),
        ];
        for (payload, schema) in cases {
            assert!(crate::validation::validate(&payload, schema).is_ok(), "{payload}");
        }
    }

    #[test]
    fn remote_failure_is_a_file_error() {
        let (transport, client) = file_client();
        transport.respond(404, "not found");
        let err = client.delete_files_metadata("missing", &RequestOptions::default()).unwrap_err();
        assert!(matches!(err, Error::File(_)));
        assert_eq!(err.status_code(), Some(404));
    }
}
