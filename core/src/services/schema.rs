//! Schema service client (`/api/schema-service/v1`).

use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::AuthProvider;
use crate::client::{Call, ServiceClient, Validation};
use crate::config::DEFAULT_SCHEMA_PATH;
use crate::error::{Error, Service};
use crate::headers::RequestOptions;
use crate::http::Transport;
use crate::url::expand;
use crate::validation::{FieldType, Shape};

mod paths {
    pub const INFO: &str = "/info";
    pub const LIVENESS: &str = "/liveness_check";
    pub const SCHEMA: &str = "/schema";
    pub const SCHEMA_BY_ID: &str = "/schema/{id}";
    pub const SYSTEM_SCHEMA: &str = "/schemas/system";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaStatus {
    Published,
    Obsolete,
    Development,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaScope {
    Internal,
    Shared,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaIdentity {
    pub authority: String,
    pub source: String,
    pub entity_type: String,
    pub schema_version_major: u32,
    pub schema_version_minor: u32,
    pub schema_version_patch: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SchemaIdentity {
    /// `authority:source:entityType:major.minor.patch`
    pub fn kind(&self) -> String {
        format!(
            "{}:{}:{}:{}.{}.{}",
            self.authority,
            self.source,
            self.entity_type,
            self.schema_version_major,
            self.schema_version_minor,
            self.schema_version_patch
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaInfo {
    pub schema_identity: SchemaIdentity,
    pub status: SchemaStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<SchemaScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<SchemaIdentity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRequest {
    pub schema_info: SchemaInfo,
    pub schema: Value,
}

/// Filters for [`SchemaClient::get_schema_info_list`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version_major: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version_minor: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version_patch: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SchemaStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<SchemaScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

fn identity_type() -> FieldType {
    Shape::open()
        .required("authority", FieldType::string())
        .required("source", FieldType::string())
        .required("entityType", FieldType::string())
        .required("schemaVersionMajor", FieldType::Integer)
        .required("schemaVersionMinor", FieldType::Integer)
        .required("schemaVersionPatch", FieldType::Integer)
        .optional("id", FieldType::string())
        .into_type()
}

static SCHEMA_REQUEST: LazyLock<FieldType> = LazyLock::new(|| {
    let info = Shape::open()
        .required("schemaIdentity", identity_type())
        .required("status", FieldType::one_of(&["PUBLISHED", "OBSOLETE", "DEVELOPMENT"]))
        .optional("scope", FieldType::one_of(&["INTERNAL", "SHARED"]))
        .optional("createdBy", FieldType::string())
        .optional("dateCreated", FieldType::string())
        .optional("supersededBy", identity_type())
        .into_type();
    Shape::open()
        .required("schemaInfo", info)
        .required("schema", FieldType::Any)
        .into_type()
});

/// Client for the Schema service. Bodies are checked only when validation is
/// enabled.
#[derive(Debug, Clone)]
pub struct SchemaClient {
    core: ServiceClient,
}

impl SchemaClient {
    pub fn new(base_url: &str, auth: Arc<dyn AuthProvider>, transport: Arc<dyn Transport>) -> Self {
        Self::from_core(ServiceClient::new(Service::Schema, base_url, DEFAULT_SCHEMA_PATH, auth, transport))
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

    pub fn get_schema_info_list(&self, query: &SchemaListQuery, options: &RequestOptions) -> Result<Value, Error> {
        self.core.execute(Call::get(paths::SCHEMA).headers(options.overlay()).query(query)?)
    }

    pub fn create_schema(&self, request: &SchemaRequest, options: &RequestOptions) -> Result<Value, Error> {
        self.core.execute(schema_call(Call::post(paths::SCHEMA), request, options)?)
    }

    /// Create or update a schema that is still in `DEVELOPMENT`.
    pub fn upsert_schema(&self, request: &SchemaRequest, options: &RequestOptions) -> Result<Value, Error> {
        self.core.execute(schema_call(Call::put(paths::SCHEMA), request, options)?)
    }

    pub fn get_schema(&self, id: &str, options: &RequestOptions) -> Result<Value, Error> {
        let path = expand(paths::SCHEMA_BY_ID, &[("id", id)]);
        self.core.execute(Call::get(path).headers(options.overlay()))
    }

    pub fn upsert_system_schema(&self, request: &SchemaRequest, options: &RequestOptions) -> Result<Value, Error> {
        self.core.execute(schema_call(Call::put(paths::SYSTEM_SCHEMA), request, options)?)
    }
}

fn schema_call(call: Call, request: &SchemaRequest, options: &RequestOptions) -> Result<Call, Error> {
    Ok(call
        .headers(options.overlay())
        .json(request)?
        .validate(&SCHEMA_REQUEST, Validation::WhenEnabled))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;
    use crate::testing::{parts, MockTransport, BASE_URL};

    fn schema_client() -> (Arc<MockTransport>, SchemaClient) {
        let (transport, auth) = parts();
        (transport.clone(), SchemaClient::new(BASE_URL, auth, transport).with_validation(true))
    }

    fn request() -> SchemaRequest {
        SchemaRequest {
            schema_info: SchemaInfo {
                schema_identity: SchemaIdentity {
                    authority: "osdu".into(),
                    source: "wks".into(),
                    entity_type: "master-data--Well".into(),
                    schema_version_major: 1,
                    schema_version_minor: 0,
                    schema_version_patch: 0,
                    id: None,
                },
                status: SchemaStatus::Development,
                scope: Some(SchemaScope::Internal),
                created_by: None,
                date_created: None,
                superseded_by: None,
            },
            schema: json!({}),
        }
    }

    #[test]
    fn create_schema_validates_and_sends() {
        let (transport, client) = schema_client();
        transport.respond(201, r#"{"schemaIdentity": {"id": "osdu:wks:master-data--Well:1.0.0"}}"#);
        let result = client.create_schema(&request(), &RequestOptions::partition("opendes")).unwrap();
        assert_eq!(result["schemaIdentity"]["id"], "osdu:wks:master-data--Well:1.0.0");
        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://osdu.test/api/schema-service/v1/schema");
        let body = req.body.unwrap();
        let body = body.as_json().unwrap();
        assert_eq!(body["schemaInfo"]["schemaIdentity"]["entityType"], "master-data--Well");
        assert_eq!(body["schemaInfo"]["status"], "DEVELOPMENT");
        assert_eq!(body["schema"], json!({}));
    }

    #[test]
    fn system_schema_uses_put() {
        let (transport, client) = schema_client();
        client.upsert_system_schema(&request(), &RequestOptions::default()).unwrap();
        let req = transport.last();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://osdu.test/api/schema-service/v1/schemas/system");
    }

    #[test]
    fn list_query_uses_camel_case() {
        let (transport, client) = schema_client();
        let query = SchemaListQuery {
            authority: Some("osdu".into()),
            entity_type: Some("wellbore".into()),
            schema_version_major: Some(1),
            latest_version: Some(true),
            status: Some(SchemaStatus::Published),
            limit: Some(10),
            ..SchemaListQuery::default()
        };
        client.get_schema_info_list(&query, &RequestOptions::default()).unwrap();
        let req = transport.last();
        assert_eq!(
            req.query,
            vec![
                ("authority".to_string(), "osdu".to_string()),
                ("entityType".to_string(), "wellbore".to_string()),
                ("latestVersion".to_string(), "true".to_string()),
                ("limit".to_string(), "10".to_string()),
                ("schemaVersionMajor".to_string(), "1".to_string()),
                ("status".to_string(), "PUBLISHED".to_string()),
            ]
        );
    }

    #[test]
    fn get_schema_by_kind() {
        let (transport, client) = schema_client();
        let kind = request().schema_info.schema_identity.kind();
        client.get_schema(&kind, &RequestOptions::default()).unwrap();
        assert_eq!(
            transport.last().url,
            "http://osdu.test/api/schema-service/v1/schema/osdu:wks:master-data--Well:1.0.0"
        );
    }

    #[test]
    fn validator_and_serializer_agree() {
        let value = serde_json::to_value(request()).unwrap();
        assert!(crate::validation::validate(&value, &SCHEMA_REQUEST).is_ok());
    }

    #[test]
    fn missing_schema_info_fields_are_reported() {
        let mut value = serde_json::to_value(request()).unwrap();
        value["schemaInfo"].as_object_mut().unwrap().remove("status");
        let messages = crate::validation::messages(&value, &SCHEMA_REQUEST);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Field required missing in schemaInfo.status."));
    }
}
