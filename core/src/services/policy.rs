//! Policy service client (`/api/policy/v1`).
//!
//! Unlike the other services, request bodies are always validated and the
//! per-call headers include `correlation-id`, `user-agent` and `x-user-id`
//! (see [`PolicyOptions`]).

use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::AuthProvider;
use crate::client::{Call, ServiceClient, Validation};
use crate::config::DEFAULT_POLICY_PATH;
use crate::error::{Error, Service};
use crate::headers::PolicyOptions;
use crate::http::{Body, Transport};
use crate::url::expand;
use crate::validation::{FieldType, Shape};

mod paths {
    pub const HEALTH: &str = "/health";
    pub const INFO: &str = "/info";
    pub const CONFIG: &str = "/config";
    pub const POLICIES: &str = "/policies";
    pub const INSTANCE_POLICY: &str = "/policies/osdu/instance/{policy_id}";
    pub const PARTITION_POLICY: &str = "/policies/osdu/partition/{data_partition}/{policy_id}";
    pub const EVALUATE: &str = "/evaluations/query";
    pub const TRANSLATE: &str = "/translate";
    pub const COMPILE: &str = "/compile";
    pub const VALIDATE: &str = "/validate/{policy_id}";
}

/// Multipart field name the policy service reads uploads from.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub input: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub query: String,
    pub input: Value,
    pub unknowns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrument: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidateQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<bool>,
}

static EVALUATION: LazyLock<FieldType> =
    LazyLock::new(|| Shape::open().required("input", FieldType::object()).into_type());

static TRANSLATE: LazyLock<FieldType> = LazyLock::new(|| {
    Shape::open()
        .required("query", FieldType::string())
        .required("input", FieldType::object())
        .required("unknowns", FieldType::array(FieldType::string()))
        .into_type()
});

#[derive(Debug, Clone)]
pub struct PolicyClient {
    core: ServiceClient,
}

impl PolicyClient {
    pub fn new(base_url: &str, auth: Arc<dyn AuthProvider>, transport: Arc<dyn Transport>) -> Self {
        Self::from_core(ServiceClient::new(Service::Policy, base_url, DEFAULT_POLICY_PATH, auth, transport))
    }

    pub fn from_core(core: ServiceClient) -> Self {
        Self { core }
    }

    pub fn with_service_path(self, service_path: &str) -> Self {
        Self::from_core(self.core.with_service_path(service_path))
    }

    pub fn core(&self) -> &ServiceClient {
        &self.core
    }

    pub fn health(&self, options: &PolicyOptions) -> Result<Value, Error> {
        self.core.execute(Call::get(paths::HEALTH).headers(options.overlay()))
    }

    pub fn info(&self, options: &PolicyOptions) -> Result<Value, Error> {
        self.core.execute(Call::get(paths::INFO).headers(options.overlay()))
    }

    pub fn config(&self, options: &PolicyOptions) -> Result<Value, Error> {
        self.core.execute(Call::get(paths::CONFIG).headers(options.overlay()))
    }

    pub fn fetch_all_policies(&self, options: &PolicyOptions) -> Result<Value, Error> {
        self.core.execute(Call::get(paths::POLICIES).headers(options.overlay()))
    }

    pub fn fetch_instance_policy(&self, policy_id: &str, options: &PolicyOptions) -> Result<Value, Error> {
        let path = expand(paths::INSTANCE_POLICY, &[("policy_id", policy_id)]);
        self.core.execute(Call::get(path).headers(options.overlay()))
    }

    pub fn fetch_partition_policy(
        &self,
        data_partition: &str,
        policy_id: &str,
        options: &PolicyOptions,
    ) -> Result<Value, Error> {
        let path = partition_policy_path(data_partition, policy_id);
        self.core.execute(Call::get(path).headers(options.overlay()))
    }

    /// Upload a rego policy document under `policy_id`.
    pub fn create_or_update_partition_policy(
        &self,
        data_partition: &str,
        policy_id: &str,
        policy: &[u8],
        options: &PolicyOptions,
    ) -> Result<Value, Error> {
        let path = partition_policy_path(data_partition, policy_id);
        let call = Call::put(path)
            .headers(options.overlay())
            .body(Body::multipart_file(UPLOAD_FIELD, policy_id, policy));
        self.core.execute(call)
    }

    pub fn delete_partition_policy(
        &self,
        data_partition: &str,
        policy_id: &str,
        options: &PolicyOptions,
    ) -> Result<Value, Error> {
        let path = partition_policy_path(data_partition, policy_id);
        self.core.execute(Call::delete(path).headers(options.overlay()))
    }

    pub fn evaluate_policy(
        &self,
        policy_id: &str,
        request: &EvaluationRequest,
        options: &PolicyOptions,
    ) -> Result<Value, Error> {
        let call = Call::post(paths::EVALUATE)
            .headers(options.overlay())
            .query_pair("policy_id", policy_id)
            .json(request)?
            .validate(&EVALUATION, Validation::Always);
        self.core.execute(call)
    }

    /// Partially evaluate `query` and translate the residual into a search filter.
    pub fn translate_policy(&self, request: &TranslateRequest, options: &PolicyOptions) -> Result<Value, Error> {
        let call = Call::post(paths::TRANSLATE)
            .headers(options.overlay())
            .json(request)?
            .validate(&TRANSLATE, Validation::Always);
        self.core.execute(call)
    }

    pub fn compile_query(
        &self,
        query: &CompileQuery,
        document: &[u8],
        options: &PolicyOptions,
    ) -> Result<Value, Error> {
        let call = Call::post(paths::COMPILE)
            .headers(options.overlay())
            .query(query)?
            .body(Body::multipart_file(UPLOAD_FIELD, "query.json", document));
        self.core.execute(call)
    }

    pub fn validate_policy(
        &self,
        policy_id: &str,
        query: &ValidateQuery,
        policy: &[u8],
        options: &PolicyOptions,
    ) -> Result<Value, Error> {
        let path = expand(paths::VALIDATE, &[("policy_id", policy_id)]);
        let call = Call::put(path)
            .headers(options.overlay())
            .query(query)?
            .body(Body::multipart_file(UPLOAD_FIELD, policy_id, policy));
        self.core.execute(call)
    }
}

fn partition_policy_path(data_partition: &str, policy_id: &str) -> String {
    expand(
        paths::PARTITION_POLICY,
        &[("data_partition", data_partition), ("policy_id", policy_id)],
    )
}
