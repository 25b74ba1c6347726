//! Payload pieces shared by several services: storage-record envelopes and
//! the schemas that check them.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{FieldType, Shape};

/// `<authority>:<source>:<entityType>:<major>.<minor>.<patch>`
pub const KIND_PATTERN: &str = r"^[\w\-\.]+:[\w\-\.]+:[\w\-\.]+:[0-9]+\.[0-9]+\.[0-9]+$";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    pub owners: Vec<String>,
    pub viewers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Legal {
    pub legaltags: Vec<String>,
    #[serde(rename = "otherRelevantDataCountries")]
    pub other_relevant_data_countries: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// A storage record as accepted by the file and wellbore services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub kind: String,
    pub acl: Acl,
    pub legal: Legal,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestry: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Vec<Value>>,
}

impl Record {
    pub fn new(kind: impl Into<String>, acl: Acl, legal: Legal) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            acl,
            legal,
            data: Value::Null,
            ancestry: None,
            meta: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

pub fn acl_type() -> FieldType {
    Shape::open()
        .required("owners", FieldType::array(FieldType::string()))
        .required("viewers", FieldType::array(FieldType::string()))
        .into_type()
}

pub fn legal_type() -> FieldType {
    Shape::open()
        .required("legaltags", FieldType::array(FieldType::string()))
        .required("otherRelevantDataCountries", FieldType::array(FieldType::string()))
        .optional("status", FieldType::string())
        .into_type()
}

/// Envelope fields every record carries, with `data` supplied by the caller.
pub fn record_shape(data: FieldType, data_required: bool) -> Shape {
    let shape = Shape::open()
        .optional("id", FieldType::string())
        .required("kind", FieldType::pattern(KIND_PATTERN))
        .required("acl", acl_type())
        .required("legal", legal_type());
    let shape = if data_required {
        shape.required("data", data)
    } else {
        shape.optional("data", data)
    };
    shape
        .optional("ancestry", FieldType::object())
        .optional("meta", FieldType::array(FieldType::object()))
}

/// A list of records, as posted to the wellbore record collections.
pub static RECORD_LIST: LazyLock<FieldType> =
    LazyLock::new(|| FieldType::array(record_shape(FieldType::object(), false).into_type()));
