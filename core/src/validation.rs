//! Structural validation of request payloads.
//!
//! A schema is a tree of [`FieldType`]s. Objects list their fields with a
//! required flag; strings may carry a regex pattern or an allowed-value list.
//! Every violation found is reported, not just the first one, as
//! `"<message> <kind> in <dotted.path>. Input: <json>"`.

use std::collections::HashMap;
use std::fmt;
use std::sync::{LazyLock, RwLock};

use regex::Regex;
use serde_json::{Map, Value};

/// Expected type of one JSON value.
#[derive(Debug, Clone)]
pub enum FieldType {
    String {
        pattern: Option<&'static str>,
        allowed: &'static [&'static str],
    },
    Integer,
    Number,
    Boolean,
    Object(Shape),
    Array(Box<FieldType>),
    /// Anything, including null.
    Any,
    /// Accepted when at least one alternative matches without violations.
    AnyOf(Vec<FieldType>),
}

impl FieldType {
    pub fn string() -> Self {
        FieldType::String {
            pattern: None,
            allowed: &[],
        }
    }

    pub fn pattern(pattern: &'static str) -> Self {
        FieldType::String {
            pattern: Some(pattern),
            allowed: &[],
        }
    }

    pub fn one_of(allowed: &'static [&'static str]) -> Self {
        FieldType::String { pattern: None, allowed }
    }

    pub fn array(item: FieldType) -> Self {
        FieldType::Array(Box::new(item))
    }

    /// Free-form JSON object.
    pub fn object() -> Self {
        FieldType::Object(Shape::open())
    }
}

/// One named member of an object shape.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub required: bool,
    pub ty: FieldType,
}

/// The declared fields of a JSON object. Undeclared members are allowed.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    fields: Vec<Field>,
}

impl Shape {
    /// An object with no declared fields.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: &'static str, ty: FieldType) -> Self {
        self.fields.push(Field { name, required: true, ty });
        self
    }

    pub fn optional(mut self, name: &'static str, ty: FieldType) -> Self {
        self.fields.push(Field { name, required: false, ty });
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn into_type(self) -> FieldType {
        FieldType::Object(self)
    }
}

/// Violation category, named after the classic pydantic error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Missing,
    StringType,
    IntType,
    FloatType,
    BoolType,
    DictType,
    ListType,
    StringPatternMismatch,
    Enum,
    UnionType,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::Missing => "missing",
            ViolationKind::StringType => "string_type",
            ViolationKind::IntType => "int_type",
            ViolationKind::FloatType => "float_type",
            ViolationKind::BoolType => "bool_type",
            ViolationKind::DictType => "dict_type",
            ViolationKind::ListType => "list_type",
            ViolationKind::StringPatternMismatch => "string_pattern_mismatch",
            ViolationKind::Enum => "enum",
            ViolationKind::UnionType => "union_type",
        }
    }
}

/// One validation violation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub kind: ViolationKind,
    pub message: String,
    /// Dotted location; array elements contribute their index.
    pub path: String,
    pub input: Value,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "body" } else { &self.path };
        write!(f, "{} {} in {}. Input: {}", self.message, self.kind.as_str(), path, self.input)
    }
}

/// Check `payload` against `schema`.
pub fn validate(payload: &Value, schema: &FieldType) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut path = Vec::new();
    check(payload, schema, &mut path, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check `payload` against `schema` and render every violation as a message.
pub fn messages(payload: &Value, schema: &FieldType) -> Vec<String> {
    match validate(payload, schema) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.iter().map(ToString::to_string).collect(),
    }
}

fn check(value: &Value, ty: &FieldType, path: &mut Vec<String>, errors: &mut Vec<FieldError>) {
    match ty {
        FieldType::Any => {}
        FieldType::String { pattern, allowed } => match value.as_str() {
            None => push(errors, path, ViolationKind::StringType, "Input should be a valid string", value),
            Some(s) => {
                if let Some(pattern) = *pattern {
                    if let Some(false) = pattern_matches(pattern, s) {
                        let message = format!("String should match pattern '{pattern}'");
                        push(errors, path, ViolationKind::StringPatternMismatch, &message, value);
                    }
                }
                if !allowed.is_empty() && !allowed.contains(&s) {
                    let message = format!("Input should be {}", describe_allowed(allowed));
                    push(errors, path, ViolationKind::Enum, &message, value);
                }
            }
        },
        FieldType::Integer => {
            if !(value.is_i64() || value.is_u64()) {
                push(errors, path, ViolationKind::IntType, "Input should be a valid integer", value);
            }
        }
        FieldType::Number => {
            if !value.is_number() {
                push(errors, path, ViolationKind::FloatType, "Input should be a valid number", value);
            }
        }
        FieldType::Boolean => {
            if !value.is_boolean() {
                push(errors, path, ViolationKind::BoolType, "Input should be a valid boolean", value);
            }
        }
        FieldType::Object(shape) => match value.as_object() {
            None => push(errors, path, ViolationKind::DictType, "Input should be a valid dictionary", value),
            Some(object) => check_object(object, value, shape, path, errors),
        },
        FieldType::Array(item) => match value.as_array() {
            None => push(errors, path, ViolationKind::ListType, "Input should be a valid list", value),
            Some(items) => {
                for (index, element) in items.iter().enumerate() {
                    path.push(index.to_string());
                    check(element, item, path, errors);
                    path.pop();
                }
            }
        },
        FieldType::AnyOf(alternatives) => {
            let matched = alternatives.iter().any(|alternative| {
                let mut scratch = Vec::new();
                check(value, alternative, path, &mut scratch);
                scratch.is_empty()
            });
            if !matched {
                push(
                    errors,
                    path,
                    ViolationKind::UnionType,
                    "Input should match one of the allowed types",
                    value,
                );
            }
        }
    }
}

fn check_object(
    object: &Map<String, Value>,
    whole: &Value,
    shape: &Shape,
    path: &mut Vec<String>,
    errors: &mut Vec<FieldError>,
) {
    for field in &shape.fields {
        path.push(field.name.to_string());
        match object.get(field.name) {
            None if field.required => push(errors, path, ViolationKind::Missing, "Field required", whole),
            None => {}
            Some(Value::Null) if !field.required => {}
            Some(member) => check(member, &field.ty, path, errors),
        }
        path.pop();
    }
}

fn push(errors: &mut Vec<FieldError>, path: &[String], kind: ViolationKind, message: &str, input: &Value) {
    errors.push(FieldError {
        kind,
        message: message.to_string(),
        path: path.join("."),
        input: input.clone(),
    });
}

fn describe_allowed(allowed: &[&str]) -> String {
    let quoted: Vec<String> = allowed.iter().map(|a| format!("'{a}'")).collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {last}", rest.join(", ")),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

static PATTERNS: LazyLock<RwLock<HashMap<&'static str, Option<Regex>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// `None` when the pattern itself does not compile; such patterns are skipped.
fn pattern_matches(pattern: &'static str, input: &str) -> Option<bool> {
    {
        let cache = PATTERNS.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(compiled) = cache.get(pattern) {
            return compiled.as_ref().map(|re| re.is_match(input));
        }
    }
    let compiled = match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::warn!(pattern, error = %err, "skipping uncompilable schema pattern");
            None
        }
    };
    let result = compiled.as_ref().map(|re| re.is_match(input));
    PATTERNS
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert(pattern, compiled);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kind_schema() -> FieldType {
        Shape::open()
            .required("kind", FieldType::pattern(r"^[\w\-\.]+:[\w\-\.]+:[\w\-\.]+:\d+\.\d+\.\d+$"))
            .optional("limit", FieldType::Integer)
            .optional(
                "sort",
                Shape::open()
                    .required("field", FieldType::array(FieldType::string()))
                    .required("order", FieldType::array(FieldType::one_of(&["ASC", "DESC"])))
                    .into_type(),
            )
            .into_type()
    }

    #[test]
    fn valid_payload_passes() {
        let payload = json!({"kind": "osdu:wks:master-data--Well:1.0.0", "limit": 10});
        assert!(validate(&payload, &kind_schema()).is_ok());
    }

    #[test]
    fn missing_required_field_yields_one_message() {
        let payload = json!({"limit": 10});
        let msgs = messages(&payload, &kind_schema());
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0], r#"Field required missing in kind. Input: {"limit":10}"#);
    }

    #[test]
    fn reports_every_violation_with_nested_paths() {
        let payload = json!({
            "kind": "not-a-kind",
            "limit": "ten",
            "sort": {"field": ["a"], "order": ["UP"]}
        });
        let errors = validate(&payload, &kind_schema()).unwrap_err();
        let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ViolationKind::StringPatternMismatch, ViolationKind::IntType, ViolationKind::Enum]
        );
        assert_eq!(errors[2].path, "sort.order.0");
        assert_eq!(
            errors[2].to_string(),
            r#"Input should be 'ASC' or 'DESC' enum in sort.order.0. Input: "UP""#
        );
    }

    #[test]
    fn optional_null_is_accepted_but_required_null_is_not() {
        let schema = Shape::open()
            .required("id", FieldType::string())
            .optional("name", FieldType::string())
            .into_type();
        assert!(validate(&json!({"id": "x", "name": null}), &schema).is_ok());
        let errors = validate(&json!({"id": null}), &schema).unwrap_err();
        assert_eq!(errors[0].kind, ViolationKind::StringType);
    }

    #[test]
    fn non_object_root_is_reported_at_body() {
        let errors = validate(&json!([1, 2]), &kind_schema()).unwrap_err();
        assert_eq!(errors[0].to_string(), "Input should be a valid dictionary dict_type in body. Input: [1,2]");
    }

    #[test]
    fn any_of_accepts_either_alternative() {
        let schema = Shape::open()
            .required(
                "kind",
                FieldType::AnyOf(vec![FieldType::string(), FieldType::array(FieldType::string())]),
            )
            .into_type();
        assert!(validate(&json!({"kind": "a:b:c:1.0.0"}), &schema).is_ok());
        assert!(validate(&json!({"kind": ["a", "b"]}), &schema).is_ok());
        let errors = validate(&json!({"kind": 3}), &schema).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ViolationKind::UnionType);
    }

    #[test]
    fn array_root_paths_start_with_index() {
        let schema = FieldType::array(Shape::open().required("kind", FieldType::string()).into_type());
        let errors = validate(&json!([{"kind": "k"}, {}]), &schema).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "1.kind");
    }

    #[test]
    fn describe_allowed_formats_lists() {
        assert_eq!(describe_allowed(&["A"]), "'A'");
        assert_eq!(describe_allowed(&["A", "B", "C"]), "'A', 'B' or 'C'");
    }
}
