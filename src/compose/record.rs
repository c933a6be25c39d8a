//! Maps with arbitrary keys

use serde_json::{Map, Value};

use super::fan_out::{fan_out, Child, Outputs};
use crate::issue::{create_issue, IssueSpec, MessageHandler, PathSegment};
use crate::pending::MaybePending;
use crate::result::failure;
use crate::schema::{Schema, SchemaMeta};
use crate::step::{RuntimeStep, StepContributor};
use crate::steps::with_message;

/// Validates every property value of an object with one schema.
///
/// Keys are kept as they are; issues are prefixed with the offending key.
#[derive(Clone)]
pub struct RecordOf {
    values: Schema,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for RecordOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordOf")
            .field("values", &self.values.meta())
            .finish()
    }
}

impl RecordOf {
    /// Validate every property value with `values`.
    pub fn new(values: Schema) -> Self {
        RecordOf {
            values,
            message: None,
        }
    }
}

with_message!(RecordOf);

fn assemble(outputs: Outputs) -> Value {
    let mut object = Map::with_capacity(outputs.len());
    for (segment, value) in outputs {
        if let PathSegment::Key(key) = segment {
            object.insert(key, value);
        }
    }
    Value::Object(object)
}

impl StepContributor for RecordOf {
    fn name(&self) -> &'static str {
        "record"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let values = self.values.clone();
        let message = self.message.clone();
        vec![RuntimeStep::on_success(move |value: Value| match value {
            Value::Object(input) => {
                let children = input
                    .into_iter()
                    .map(|(key, value)| Child::new(key, values.clone(), value))
                    .collect();
                fan_out(children, None, assemble)
            }
            other => MaybePending::Ready(failure(create_issue(
                IssueSpec::new("record:expected_object", "Expected an object.")
                    .payload_entry("value", other)
                    .custom_message(message.as_ref()),
            ))),
        })]
    }
}

/// A schema accepting objects whose values all satisfy `values`.
pub fn record(values: Schema) -> Schema {
    Schema::new().with(&RecordOf::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ext::SchemaExt;
    use crate::result::success;
    use crate::steps::{integer, string};
    use serde_json::json;

    #[test]
    fn test_record_transforms_values() {
        let schema = record(string().to_lowercase());
        assert_eq!(
            schema.execute(json!({"A": "X", "b": "Y"})).into_ready(),
            Some(success(json!({"A": "x", "b": "y"})))
        );
    }

    #[test]
    fn test_record_issue_paths_follow_key_order() {
        let schema = record(integer());
        let result = schema
            .execute(json!({"one": 1, "half": 0.5, "text": "3"}))
            .into_ready()
            .unwrap();
        let paths: Vec<String> = result
            .issues()
            .unwrap()
            .iter()
            .map(|issue| issue.path_string())
            .collect();
        assert_eq!(paths, vec![".half", ".text"]);
    }

    #[test]
    fn test_record_rejects_arrays() {
        let result = record(integer()).execute(json!([1])).into_ready().unwrap();
        assert_eq!(result.issues().unwrap().codes(), vec!["record:expected_object"]);
    }
}
