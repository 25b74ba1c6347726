//! In-memory stand-in for a slice of the OSDU File, Policy, Schema, Search
//! and Wellbore services.

use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DATA_PARTITION_ID: &str = "data-partition-id";

const WELLBORE_COLLECTIONS: [&str; 5] = [
    "wells",
    "wellbores",
    "welllogs",
    "wellboretrajectories",
    "wellboremarkersets",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Open,
    Committed,
    Abandoned,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub record_id: String,
    pub mode: String,
    pub state: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_version: Option<u64>,
    pub chunks: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSession {
    pub mode: String,
    pub from_version: Option<u64>,
}

#[derive(Deserialize)]
pub struct UpdateSession {
    pub state: String,
}

#[derive(Deserialize)]
pub struct EvaluationQuery {
    pub policy_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFilter {
    pub authority: Option<String>,
    pub entity_type: Option<String>,
}

#[derive(Default)]
pub struct Store {
    pub files: HashMap<String, Value>,
    /// Full schema requests keyed by kind.
    pub schemas: HashMap<String, Value>,
    /// Wellbore v3 records keyed by collection, then id.
    pub records: HashMap<String, HashMap<String, Value>>,
    pub sessions: HashMap<String, Session>,
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, String);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/file/v2/info", get(file_info))
        .route("/api/file/v2/files/metadata", post(create_file_metadata))
        .route(
            "/api/file/v2/files/{id}/metadata",
            get(get_file_metadata).delete(delete_file_metadata),
        )
        .route("/api/policy/v1/health", get(policy_health))
        .route("/api/policy/v1/evaluations/query", post(evaluate_policy))
        .route("/api/schema-service/v1/schema", get(list_schemas).post(create_schema))
        .route("/api/schema-service/v1/schema/{id}", get(get_schema))
        .route("/api/search/v2/query", post(search_query))
        .route("/api/os-wellbore-ddms/ddms/v2/about", get(wellbore_about))
        .route("/api/os-wellbore-ddms/ddms/v3/{collection}", post(create_records))
        .route(
            "/api/os-wellbore-ddms/ddms/v3/{collection}/{id}",
            get(get_record).delete(delete_record),
        )
        .route(
            "/api/os-wellbore-ddms/ddms/v3/welllogs/{id}/sessions",
            get(list_sessions).post(create_session),
        )
        .route(
            "/api/os-wellbore-ddms/ddms/v3/welllogs/{id}/sessions/{session_id}",
            get(get_session).patch(update_session),
        )
        .route(
            "/api/os-wellbore-ddms/ddms/v3/welllogs/{id}/sessions/{session_id}/data",
            post(send_session_data),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn partition(headers: &HeaderMap) -> Result<String, Failure> {
    headers
        .get(DATA_PARTITION_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or((StatusCode::BAD_REQUEST, "data-partition-id header is required".to_string()))
}

fn not_found() -> Failure {
    (StatusCode::NOT_FOUND, "not found".to_string())
}

/// `osdu:wks:*:*` style match, one segment at a time.
pub fn kind_matches(pattern: &str, kind: &str) -> bool {
    let pattern: Vec<&str> = pattern.split(':').collect();
    let kind: Vec<&str> = kind.split(':').collect();
    pattern.len() == kind.len() && pattern.iter().zip(&kind).all(|(p, k)| *p == "*" || p == k)
}

async fn file_info() -> Json<Value> {
    Json(json!({"groupId": "org.opengroup.osdu", "artifactId": "file", "version": "mock"}))
}

async fn create_file_metadata(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(mut record): Json<Value>,
) -> Result<(StatusCode, Json<Value>), Failure> {
    let partition = partition(&headers)?;
    let id = match record.get("id").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => format!("{partition}:dataset--File.Generic:{}", Uuid::new_v4()),
    };
    record["id"] = json!(id);
    db.write().await.files.insert(id.clone(), record);
    Ok((StatusCode::CREATED, Json(json!({"id": id}))))
}

async fn get_file_metadata(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Failure> {
    partition(&headers)?;
    let store = db.read().await;
    store.files.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn delete_file_metadata(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, Failure> {
    partition(&headers)?;
    let mut store = db.write().await;
    store.files.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or_else(not_found)
}

async fn policy_health() -> Json<Value> {
    Json(json!({"status": "healthy"}))
}

async fn evaluate_policy(
    headers: HeaderMap,
    Query(query): Query<EvaluationQuery>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Failure> {
    partition(&headers)?;
    let input = body
        .get("input")
        .filter(|input| input.is_object())
        .ok_or((StatusCode::UNPROCESSABLE_ENTITY, "input must be an object".to_string()))?;
    let allow = input.get("operation").and_then(Value::as_str) == Some("view");
    Ok(Json(json!({"policy_id": query.policy_id, "result": {"allow": allow}})))
}

fn schema_kind(identity: &Value) -> Option<String> {
    let text = |name: &str| identity.get(name).and_then(Value::as_str).map(str::to_string);
    let number = |name: &str| identity.get(name).and_then(Value::as_u64);
    Some(format!(
        "{}:{}:{}:{}.{}.{}",
        text("authority")?,
        text("source")?,
        text("entityType")?,
        number("schemaVersionMajor")?,
        number("schemaVersionMinor")?,
        number("schemaVersionPatch")?
    ))
}

async fn create_schema(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(mut request): Json<Value>,
) -> Result<(StatusCode, Json<Value>), Failure> {
    partition(&headers)?;
    let kind = request
        .pointer("/schemaInfo/schemaIdentity")
        .and_then(schema_kind)
        .ok_or((StatusCode::BAD_REQUEST, "invalid schemaIdentity".to_string()))?;
    let mut store = db.write().await;
    if store.schemas.contains_key(&kind) {
        return Err((StatusCode::CONFLICT, format!("schema {kind} already exists")));
    }
    request["schemaInfo"]["schemaIdentity"]["id"] = json!(kind);
    let info = request["schemaInfo"].clone();
    store.schemas.insert(kind, request);
    Ok((StatusCode::CREATED, Json(info)))
}

async fn get_schema(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, Failure> {
    partition(&headers)?;
    let store = db.read().await;
    store
        .schemas
        .get(&id)
        .map(|request| Json(request["schema"].clone()))
        .ok_or_else(not_found)
}

async fn list_schemas(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(filter): Query<SchemaFilter>,
) -> Result<Json<Value>, Failure> {
    partition(&headers)?;
    let store = db.read().await;
    let matches = |identity: &Value, name: &str, wanted: &Option<String>| {
        wanted.as_deref().map_or(true, |wanted| identity[name] == wanted)
    };
    let infos: Vec<Value> = store
        .schemas
        .values()
        .map(|request| request["schemaInfo"].clone())
        .filter(|info| {
            let identity = &info["schemaIdentity"];
            matches(identity, "authority", &filter.authority) && matches(identity, "entityType", &filter.entity_type)
        })
        .collect();
    let count = infos.len();
    Ok(Json(json!({"schemaInfos": infos, "offset": 0, "count": count, "totalCount": count})))
}

async fn search_query(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Failure> {
    partition(&headers)?;
    let patterns: Vec<String> = match &body["kind"] {
        Value::String(kind) => vec![kind.clone()],
        Value::Array(kinds) => kinds.iter().filter_map(Value::as_str).map(str::to_string).collect(),
        _ => return Err((StatusCode::BAD_REQUEST, "kind is required".to_string())),
    };
    let limit = body["limit"].as_u64().unwrap_or(10) as usize;
    let store = db.read().await;
    let results: Vec<Value> = store
        .files
        .values()
        .chain(store.records.values().flat_map(HashMap::values))
        .filter(|record| {
            let kind = record["kind"].as_str().unwrap_or_default();
            patterns.iter().any(|pattern| kind_matches(pattern, kind))
        })
        .cloned()
        .collect();
    let total = results.len();
    let page: Vec<Value> = results.into_iter().take(limit).collect();
    Ok(Json(json!({"results": page, "aggregations": null, "totalCount": total})))
}

async fn wellbore_about() -> Json<Value> {
    Json(json!({"service": "Wellbore DDMS", "version": "mock", "buildNumber": "0", "cloudEnvironment": "local"}))
}

fn known_collection(collection: &str) -> Result<(), Failure> {
    if WELLBORE_COLLECTIONS.contains(&collection) {
        Ok(())
    } else {
        Err(not_found())
    }
}

async fn create_records(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(collection): Path<String>,
    Json(records): Json<Vec<Value>>,
) -> Result<Json<Value>, Failure> {
    let partition = partition(&headers)?;
    known_collection(&collection)?;
    let mut store = db.write().await;
    let stored = store.records.entry(collection.clone()).or_default();
    let mut ids = Vec::with_capacity(records.len());
    for mut record in records {
        let id = match record.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => format!("{partition}:{collection}:{}", Uuid::new_v4()),
        };
        record["id"] = json!(id);
        stored.insert(id.clone(), record);
        ids.push(id);
    }
    Ok(Json(json!({"recordCount": ids.len(), "recordIds": ids, "skippedRecordIds": []})))
}

async fn get_record(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((collection, id)): Path<(String, String)>,
) -> Result<Json<Value>, Failure> {
    partition(&headers)?;
    known_collection(&collection)?;
    let store = db.read().await;
    store
        .records
        .get(&collection)
        .and_then(|records| records.get(&id))
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

async fn delete_record(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((collection, id)): Path<(String, String)>,
) -> Result<StatusCode, Failure> {
    partition(&headers)?;
    known_collection(&collection)?;
    let mut store = db.write().await;
    store
        .records
        .get_mut(&collection)
        .and_then(|records| records.remove(&id))
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(not_found)
}

fn has_welllog(store: &Store, id: &str) -> bool {
    store.records.get("welllogs").is_some_and(|records| records.contains_key(id))
}

async fn create_session(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<CreateSession>,
) -> Result<Json<Session>, Failure> {
    partition(&headers)?;
    if input.mode != "update" && input.mode != "overwrite" {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, format!("unknown mode {}", input.mode)));
    }
    let mut store = db.write().await;
    if !has_welllog(&store, &id) {
        return Err(not_found());
    }
    let session = Session {
        id: Uuid::new_v4().to_string(),
        record_id: id,
        mode: input.mode,
        state: SessionStatus::Open,
        from_version: input.from_version,
        chunks: 0,
    };
    store.sessions.insert(session.id.clone(), session.clone());
    Ok(Json(session))
}

async fn list_sessions(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<Session>>, Failure> {
    partition(&headers)?;
    let store = db.read().await;
    let sessions = store.sessions.values().filter(|s| s.record_id == id).cloned().collect();
    Ok(Json(sessions))
}

async fn get_session(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((id, session_id)): Path<(String, String)>,
) -> Result<Json<Session>, Failure> {
    partition(&headers)?;
    let store = db.read().await;
    store
        .sessions
        .get(&session_id)
        .filter(|s| s.record_id == id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

async fn update_session(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((id, session_id)): Path<(String, String)>,
    Json(input): Json<UpdateSession>,
) -> Result<Json<Session>, Failure> {
    partition(&headers)?;
    let next = match input.state.as_str() {
        "commit" => SessionStatus::Committed,
        "abandon" => SessionStatus::Abandoned,
        other => return Err((StatusCode::UNPROCESSABLE_ENTITY, format!("unknown state {other}"))),
    };
    let mut store = db.write().await;
    let session = store
        .sessions
        .get_mut(&session_id)
        .filter(|s| s.record_id == id)
        .ok_or_else(not_found)?;
    if session.state != SessionStatus::Open {
        return Err((StatusCode::CONFLICT, "session is closed".to_string()));
    }
    session.state = next;
    Ok(Json(session.clone()))
}

async fn send_session_data(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((id, session_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<StatusCode, Failure> {
    partition(&headers)?;
    if body.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "empty chunk".to_string()));
    }
    let mut store = db.write().await;
    let session = store
        .sessions
        .get_mut(&session_id)
        .filter(|s| s.record_id == id)
        .ok_or_else(not_found)?;
    if session.state != SessionStatus::Open {
        return Err((StatusCode::CONFLICT, "session is closed".to_string()));
    }
    session.chunks += 1;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_kinds_match_per_segment() {
        assert!(kind_matches("osdu:wks:*:*", "osdu:wks:master-data--Well:1.0.0"));
        assert!(kind_matches("*:*:*:*", "opendes:wks:welllog:1.0.0"));
        assert!(!kind_matches("osdu:wks:*:*", "opendes:wks:welllog:1.0.0"));
        assert!(!kind_matches("osdu:wks:*", "osdu:wks:a:1.0.0"));
    }

    #[test]
    fn schema_kind_needs_every_identity_field() {
        let identity = json!({
            "authority": "osdu",
            "source": "wks",
            "entityType": "wellbore",
            "schemaVersionMajor": 1,
            "schemaVersionMinor": 2,
            "schemaVersionPatch": 3
        });
        assert_eq!(schema_kind(&identity).as_deref(), Some("osdu:wks:wellbore:1.2.3"));
        assert_eq!(schema_kind(&json!({"authority": "osdu"})), None);
    }

    #[test]
    fn session_serializes_camel_case() {
        let session = Session {
            id: "s".into(),
            record_id: "r".into(),
            mode: "update".into(),
            state: SessionStatus::Open,
            from_version: None,
            chunks: 0,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["recordId"], "r");
        assert_eq!(json["state"], "open");
        assert!(json.get("fromVersion").is_none());
    }

    #[test]
    fn missing_partition_is_rejected() {
        let (status, _) = partition(&HeaderMap::new()).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
