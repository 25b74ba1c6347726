//! Search service client (`/api/search/v2`).

use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::AuthProvider;
use crate::client::{Call, ServiceClient, Validation};
use crate::config::DEFAULT_SEARCH_PATH;
use crate::error::{Error, Service};
use crate::headers::RequestOptions;
use crate::http::Transport;
use crate::validation::{FieldType, Shape};

mod paths {
    pub const INFO: &str = "/info";
    pub const LIVENESS: &str = "/health/liveness_check";
    pub const READINESS: &str = "/health/readiness_check";
    pub const QUERY: &str = "/query";
    pub const QUERY_WITH_CURSOR: &str = "/query_with_cursor";
}

/// One kind or several; wildcards such as `osdu:wks:*:*` are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Kinds {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Kinds {
    fn from(kind: &str) -> Self {
        Kinds::One(kind.to_string())
    }
}

impl From<Vec<String>> for Kinds {
    fn from(kinds: Vec<String>) -> Self {
        Kinds::Many(kinds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: Vec<String>,
    pub order: Vec<SortOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub kind: Kinds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_as_owner: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_total_count: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted_fields: Option<Vec<String>>,
}

impl QueryRequest {
    pub fn new(kind: impl Into<Kinds>) -> Self {
        Self {
            kind: kind.into(),
            query: None,
            offset: None,
            limit: None,
            sort: None,
            query_as_owner: None,
            spatial_filter: None,
            returned_fields: None,
            aggregate_by: None,
            track_total_count: None,
            highlighted_fields: None,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorQueryRequest {
    pub kind: Kinds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Sort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_as_owner: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spatial_filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returned_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_total_count: Option<bool>,
}

impl CursorQueryRequest {
    pub fn new(kind: impl Into<Kinds>) -> Self {
        Self {
            kind: kind.into(),
            cursor: None,
            query: None,
            limit: None,
            sort: None,
            query_as_owner: None,
            spatial_filter: None,
            returned_fields: None,
            track_total_count: None,
        }
    }

    /// Continue from the `cursor` returned by the previous page.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

fn common_query_shape() -> Shape {
    let sort = Shape::open()
        .required("field", FieldType::array(FieldType::string()))
        .required("order", FieldType::array(FieldType::one_of(&["ASC", "DESC"])))
        .into_type();
    Shape::open()
        .required(
            "kind",
            FieldType::AnyOf(vec![FieldType::string(), FieldType::array(FieldType::string())]),
        )
        .optional("query", FieldType::string())
        .optional("limit", FieldType::Integer)
        .optional("sort", sort)
        .optional("queryAsOwner", FieldType::Boolean)
        .optional("spatialFilter", FieldType::object())
        .optional("returnedFields", FieldType::array(FieldType::string()))
        .optional("trackTotalCount", FieldType::Boolean)
}

static QUERY: LazyLock<FieldType> = LazyLock::new(|| {
    common_query_shape()
        .optional("offset", FieldType::Integer)
        .optional("aggregateBy", FieldType::string())
        .optional("highlightedFields", FieldType::array(FieldType::string()))
        .into_type()
});

static CURSOR_QUERY: LazyLock<FieldType> =
    LazyLock::new(|| common_query_shape().optional("cursor", FieldType::string()).into_type());

/// Client for the Search service. Bodies are checked only when validation is
/// enabled.
#[derive(Debug, Clone)]
pub struct SearchClient {
    core: ServiceClient,
}

impl SearchClient {
    pub fn new(base_url: &str, auth: Arc<dyn AuthProvider>, transport: Arc<dyn Transport>) -> Self {
        Self::from_core(ServiceClient::new(Service::Search, base_url, DEFAULT_SEARCH_PATH, auth, transport))
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

    pub fn query_records(&self, request: &QueryRequest, options: &RequestOptions) -> Result<Value, Error> {
        let call = Call::post(paths::QUERY)
            .headers(options.overlay())
            .json(request)?
            .validate(&QUERY, Validation::WhenEnabled);
        self.core.execute(call)
    }

    pub fn query_with_cursor(&self, request: &CursorQueryRequest, options: &RequestOptions) -> Result<Value, Error> {
        let call = Call::post(paths::QUERY_WITH_CURSOR)
            .headers(options.overlay())
            .json(request)?
            .validate(&CURSOR_QUERY, Validation::WhenEnabled);
        self.core.execute(call)
    }
}
