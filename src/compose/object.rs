//! Objects with declared fields
//!
//! An object schema lists its fields in declaration order. Each field owns a
//! schema and is either required or optional:
//!
//! - a required field that is absent is validated as `null`;
//! - an optional field that is absent is skipped and left out of the output.
//!
//! Keys that are not declared are handled according to the [`ObjectMode`]:
//! dropped ([`ObjectMode::Plain`]), rejected ([`ObjectMode::Strict`]), or
//! copied through unchanged ([`ObjectMode::Loose`]).
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use valchecker::prelude::*;
//!
//! let user = strict_object([
//!     ("name", Field::required(string().to_trimmed())),
//!     ("age", Field::optional(integer())),
//! ]);
//!
//! let result = user.execute(json!({"name": " Ada "})).into_ready().unwrap();
//! assert_eq!(result, ExecutionResult::success(json!({"name": "Ada"})));
//!
//! let result = user.execute(json!({"name": 1, "admin": true})).into_ready().unwrap();
//! assert_eq!(
//!     result.issues().unwrap().codes(),
//!     vec!["object:unexpected_key", "string:expected_string"]
//! );
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};

use super::fan_out::{fan_out, Child, Outputs};
use crate::issue::{create_issue, IssueSpec, Issues, MessageHandler, PathSegment};
use crate::pending::MaybePending;
use crate::result::failure;
use crate::schema::{Schema, SchemaMeta};
use crate::semigroup::Semigroup;
use crate::step::{RuntimeStep, StepContributor, StepOutcome};
use crate::steps::with_message;

/// Treatment of keys that no field declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectMode {
    /// Drop undeclared keys from the output
    #[default]
    Plain,
    /// Fail with `object:unexpected_key` for each undeclared key
    Strict,
    /// Copy undeclared keys into the output unchanged
    Loose,
}

/// A declared object property.
#[derive(Debug, Clone)]
pub struct Field {
    schema: Schema,
    optional: bool,
}

impl Field {
    /// A field that must be validated even when absent.
    pub fn required(schema: Schema) -> Self {
        Field {
            schema,
            optional: false,
        }
    }

    /// A field that is skipped when absent.
    pub fn optional(schema: Schema) -> Self {
        Field {
            schema,
            optional: true,
        }
    }

    /// Check whether absence is allowed.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// The field's schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl From<Schema> for Field {
    fn from(schema: Schema) -> Self {
        Field::required(schema)
    }
}

/// Validates an object field by field.
#[derive(Clone)]
pub struct ObjectOf {
    fields: Arc<[(String, Field)]>,
    mode: ObjectMode,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for ObjectOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<&str> = self.fields.iter().map(|(key, _)| key.as_str()).collect();
        f.debug_struct("ObjectOf")
            .field("fields", &keys)
            .field("mode", &self.mode)
            .finish()
    }
}

impl ObjectOf {
    /// Declare fields in order; undeclared keys are dropped.
    ///
    /// Declaring a key twice keeps its first position and the last field.
    pub fn new<K, F>(fields: impl IntoIterator<Item = (K, F)>) -> Self
    where
        K: Into<String>,
        F: Into<Field>,
    {
        let mut unique: Vec<(String, Field)> = Vec::new();
        for (key, field) in fields {
            let (key, field) = (key.into(), field.into());
            match unique.iter_mut().find(|(name, _)| *name == key) {
                Some(slot) => slot.1 = field,
                None => unique.push((key, field)),
            }
        }

        ObjectOf {
            fields: unique.into(),
            mode: ObjectMode::Plain,
            message: None,
        }
    }

    /// Change how undeclared keys are treated.
    pub fn mode(mut self, mode: ObjectMode) -> Self {
        self.mode = mode;
        self
    }
}

with_message!(ObjectOf);

fn declared(fields: &[(String, Field)], key: &str) -> bool {
    fields.iter().any(|(name, _)| name == key)
}

fn unexpected_keys(
    input: &Map<String, Value>,
    fields: &[(String, Field)],
    message: Option<&MessageHandler>,
) -> Option<Issues> {
    input
        .iter()
        .filter(|(key, _)| !declared(fields, key))
        .map(|(key, value)| {
            create_issue(
                IssueSpec::new("object:unexpected_key", format!("Unexpected key \"{}\".", key))
                    .payload_entry("value", value.clone())
                    .payload_entry("key", Value::String(key.clone()))
                    .custom_message(message),
            )
            .with_path_prefix(&[PathSegment::Key(key.clone())])
        })
        .fold(None, |acc, issue| acc.combine(Some(Issues::singleton(issue))))
}

fn run_object(
    fields: &Arc<[(String, Field)]>,
    mode: ObjectMode,
    message: Option<&MessageHandler>,
    input: Map<String, Value>,
) -> StepOutcome {
    let seeded = match mode {
        ObjectMode::Strict => unexpected_keys(&input, fields, message),
        ObjectMode::Plain | ObjectMode::Loose => None,
    };

    let mut present = Map::new();
    let mut extras = Map::new();
    for (key, value) in input {
        if declared(fields, &key) {
            present.insert(key, value);
        } else if mode == ObjectMode::Loose {
            extras.insert(key, value);
        }
    }

    let mut children = Vec::with_capacity(fields.len());
    for (key, field) in fields.iter() {
        match present.remove(key) {
            Some(value) => children.push(Child::new(key.as_str(), field.schema.clone(), value)),
            None if field.optional => {}
            None => children.push(Child::new(key.as_str(), field.schema.clone(), Value::Null)),
        }
    }

    fan_out(children, seeded, move |outputs: Outputs| {
        let mut object = Map::with_capacity(outputs.len() + extras.len());
        for (segment, value) in outputs {
            if let PathSegment::Key(key) = segment {
                object.insert(key, value);
            }
        }
        object.extend(extras);
        Value::Object(object)
    })
}

impl StepContributor for ObjectOf {
    fn name(&self) -> &'static str {
        match self.mode {
            ObjectMode::Plain => "object",
            ObjectMode::Strict => "strictObject",
            ObjectMode::Loose => "looseObject",
        }
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let fields = Arc::clone(&self.fields);
        let mode = self.mode;
        let message = self.message.clone();
        vec![RuntimeStep::on_success(move |value: Value| match value {
            Value::Object(input) => run_object(&fields, mode, message.as_ref(), input),
            other => MaybePending::Ready(failure(create_issue(
                IssueSpec::new("object:expected_object", "Expected an object.")
                    .payload_entry("value", other)
                    .custom_message(message.as_ref()),
            ))),
        })]
    }
}

/// An object schema that drops undeclared keys.
pub fn object<K, F>(fields: impl IntoIterator<Item = (K, F)>) -> Schema
where
    K: Into<String>,
    F: Into<Field>,
{
    Schema::new().with(&ObjectOf::new(fields))
}

/// An object schema that rejects undeclared keys.
pub fn strict_object<K, F>(fields: impl IntoIterator<Item = (K, F)>) -> Schema
where
    K: Into<String>,
    F: Into<Field>,
{
    Schema::new().with(&ObjectOf::new(fields).mode(ObjectMode::Strict))
}

/// An object schema that passes undeclared keys through.
pub fn loose_object<K, F>(fields: impl IntoIterator<Item = (K, F)>) -> Schema
where
    K: Into<String>,
    F: Into<Field>,
{
    Schema::new().with(&ObjectOf::new(fields).mode(ObjectMode::Loose))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ext::SchemaExt;
    use crate::result::success;
    use crate::steps::{number, string};
    use serde_json::json;

    fn point() -> [(&'static str, Field); 2] {
        [("x", Field::required(number())), ("y", Field::required(number()))]
    }

    #[test]
    fn test_non_object_fails() {
        let result = object(point()).execute(json!([1, 2])).into_ready().unwrap();
        let issue = result.issues().unwrap().first();
        assert_eq!(issue.code, "object:expected_object");
        assert!(issue.path.is_empty());
    }

    #[test]
    fn test_plain_drops_unknown_keys() {
        let result = object(point())
            .execute(json!({"x": 1, "y": 2, "z": 3}))
            .into_ready();
        assert_eq!(result, Some(success(json!({"x": 1, "y": 2}))));
    }

    #[test]
    fn test_loose_keeps_unknown_keys() {
        let result = loose_object(point())
            .execute(json!({"z": 3, "x": 1, "y": 2}))
            .into_ready();
        assert_eq!(result, Some(success(json!({"x": 1, "y": 2, "z": 3}))));
    }

    #[test]
    fn test_strict_reports_unknown_keys_first() {
        let result = strict_object(point())
            .execute(json!({"x": "a", "y": 2, "z": 3}))
            .into_ready()
            .unwrap();
        let issues: Vec<_> = result.issues().unwrap().iter().cloned().collect();

        assert_eq!(issues[0].code, "object:unexpected_key");
        assert_eq!(issues[0].path, vec![PathSegment::Key("z".into())]);
        assert_eq!(issues[0].payload["key"], json!("z"));
        assert_eq!(issues[1].code, "number:expected_number");
        assert_eq!(issues[1].path, vec![PathSegment::Key("x".into())]);
    }

    #[test]
    fn test_missing_required_field_is_null() {
        let result = object(point()).execute(json!({"x": 1})).into_ready().unwrap();
        let issue = result.issues().unwrap().first();
        assert_eq!(issue.code, "number:expected_number");
        assert_eq!(issue.payload["value"], Value::Null);
        assert_eq!(issue.path_string(), ".y");
    }

    #[test]
    fn test_missing_optional_field_is_skipped() {
        let schema = object([
            ("id", Field::required(number())),
            ("tag", Field::optional(string())),
        ]);
        assert_eq!(
            schema.execute(json!({"id": 7})).into_ready(),
            Some(success(json!({"id": 7})))
        );
    }

    #[test]
    fn test_output_follows_declaration_order() {
        let schema = object([("b", string().to_uppercase()), ("a", string())]);
        let result = schema.execute(json!({"a": "x", "b": "y"})).into_ready().unwrap();
        let keys: Vec<&String> = result.value().unwrap().as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_repeated_key_keeps_last_declaration() {
        let schema = object([("a", string()), ("b", string()), ("a", number())]);
        assert_eq!(
            schema.execute(json!({"a": 1, "b": "x"})).into_ready(),
            Some(success(json!({"a": 1, "b": "x"})))
        );

        let result = schema.execute(json!({"a": "1", "b": "x"})).into_ready().unwrap();
        assert_eq!(result.issues().unwrap().codes(), vec!["number:expected_number"]);
    }

    #[tokio::test]
    async fn test_nested_async_fields() {
        let schema = object([(
            "inner",
            object([("n", number().to_async())]),
        )]);
        let result = schema.execute_async(json!({"inner": {"n": "x"}})).await;
        assert_eq!(result.issues().unwrap().first().path_string(), ".inner.n");
    }
}
