//! JSON text conversion

use serde_json::Value;

use super::with_message;
use crate::issue::{create_issue, IssueSpec, MessageHandler};
use crate::result::{failure, success};
use crate::schema::SchemaMeta;
use crate::step::{RuntimeStep, StepContributor};

/// Parses a JSON string into the value it encodes.
///
/// Fails with `parseJSON:invalid_json` for non-strings and malformed text.
#[derive(Clone, Default)]
pub struct ParseJson {
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for ParseJson {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseJson").finish_non_exhaustive()
    }
}

impl ParseJson {
    /// Create the step with its default message.
    pub fn new() -> Self {
        Self::default()
    }
}

with_message!(ParseJson);

impl StepContributor for ParseJson {
    fn name(&self) -> &'static str {
        "parseJSON"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let message = self.message.clone();
        vec![RuntimeStep::on_success(move |value: Value| {
            let parsed = match &value {
                Value::String(text) => {
                    serde_json::from_str::<Value>(text).map_err(|err| err.to_string())
                }
                _ => Err("expected a string".to_string()),
            };
            match parsed {
                Ok(parsed) => success(parsed),
                Err(error) => failure(create_issue(
                    IssueSpec::new("parseJSON:invalid_json", "Invalid JSON string.")
                        .payload_entry("value", value)
                        .payload_entry("error", Value::String(error))
                        .custom_message(message.as_ref()),
                )),
            }
        })]
    }
}

/// Serializes any value into its compact JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringifyJson;

impl StepContributor for StringifyJson {
    fn name(&self) -> &'static str {
        "stringifyJSON"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        vec![RuntimeStep::on_success(|value: Value| {
            Value::String(value.to_string())
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ExecutionResult;
    use crate::schema::Schema;
    use serde_json::json;

    #[test]
    fn test_parse_json() {
        let schema = Schema::new().with(&ParseJson::new());
        assert_eq!(
            schema.execute(json!("{\"a\":[1,2]}")).into_ready(),
            Some(ExecutionResult::success(json!({"a": [1, 2]})))
        );

        let result = schema.execute(json!("{oops")).into_ready().unwrap();
        let issue = result.issues().unwrap().first();
        assert_eq!(issue.code, "parseJSON:invalid_json");
        assert_eq!(issue.payload["value"], json!("{oops"));
        assert!(issue.payload["error"].is_string());
    }

    #[test]
    fn test_stringify_then_parse_restores_value() {
        let schema = Schema::new().with(&StringifyJson).with(&ParseJson::new());
        let value = json!({"nested": {"list": [true, null, 1.5]}});
        assert_eq!(
            schema.execute(value.clone()).into_ready(),
            Some(ExecutionResult::success(value))
        );
    }
}
