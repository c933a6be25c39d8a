//! Homogeneous arrays

use serde_json::Value;

use super::fan_out::{fan_out, Child, Outputs};
use crate::issue::{create_issue, IssueSpec, MessageHandler};
use crate::pending::MaybePending;
use crate::result::failure;
use crate::schema::{Schema, SchemaMeta};
use crate::step::{RuntimeStep, StepContributor};
use crate::steps::with_message;

/// Validates every element of an array with one item schema.
///
/// Non-arrays fail with `array:expected_array`. Otherwise every index is
/// validated; issues from failing indices are reported in index order with
/// the index prepended to their path. On success the output array holds the
/// (possibly transformed) element values.
///
/// ```
/// use serde_json::json;
/// use valchecker::prelude::*;
///
/// let schema = array(number());
/// let result = tokio_test::block_on(schema.execute_async(json!([1, "two", 3, "four"])));
/// let paths: Vec<String> = result.issues().unwrap().iter().map(|i| i.path_string()).collect();
/// assert_eq!(paths, vec!["[1]", "[3]"]);
/// ```
#[derive(Clone)]
pub struct ArrayOf {
    item: Schema,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for ArrayOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayOf").field("item", &self.item.meta()).finish()
    }
}

impl ArrayOf {
    /// Validate elements with `item`.
    pub fn new(item: Schema) -> Self {
        ArrayOf {
            item,
            message: None,
        }
    }
}

with_message!(ArrayOf);

fn assemble(outputs: Outputs) -> Value {
    Value::Array(outputs.into_iter().map(|(_, value)| value).collect())
}

impl StepContributor for ArrayOf {
    fn name(&self) -> &'static str {
        "array"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let item = self.item.clone();
        let message = self.message.clone();
        vec![RuntimeStep::on_success(move |value: Value| match value {
            Value::Array(elements) => {
                let children = elements
                    .into_iter()
                    .enumerate()
                    .map(|(index, element)| Child::new(index, item.clone(), element))
                    .collect();
                fan_out(children, None, assemble)
            }
            other => MaybePending::Ready(failure(create_issue(
                IssueSpec::new("array:expected_array", "Expected an array.")
                    .payload_entry("value", other)
                    .custom_message(message.as_ref()),
            ))),
        })]
    }
}

/// A schema accepting arrays whose elements all satisfy `item`.
pub fn array(item: Schema) -> Schema {
    Schema::new().with(&ArrayOf::new(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ext::SchemaExt;
    use crate::issue::PathSegment;
    use crate::result::success;
    use crate::steps::{number, string};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_empty_array_succeeds() {
        let schema = array(never_called());
        assert_eq!(schema.execute(json!([])).into_ready(), Some(success(json!([]))));
    }

    fn never_called() -> Schema {
        Schema::new().check(|_| panic!("item schema should not run"))
    }

    #[test]
    fn test_non_array_fails_without_path() {
        let result = array(number()).execute(json!({"0": 1})).into_ready().unwrap();
        let issue = result.issues().unwrap().first();
        assert_eq!(issue.code, "array:expected_array");
        assert_eq!(issue.message, "Expected an array.");
        assert!(issue.path.is_empty());
    }

    #[test]
    fn test_transformed_items_are_collected() {
        let schema = array(string().to_trimmed().to_uppercase());
        assert_eq!(
            schema.execute(json!([" a ", "b "])).into_ready(),
            Some(success(json!(["A", "B"])))
        );
    }

    #[test]
    fn test_issues_in_index_order_with_prefixed_paths() {
        let schema = array(array(number()));
        let result = schema
            .execute(json!([[1], ["x", 2], "nope"]))
            .into_ready()
            .unwrap();
        let issues: Vec<_> = result.issues().unwrap().iter().cloned().collect();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].code, "number:expected_number");
        assert_eq!(issues[0].path, vec![PathSegment::Index(1), PathSegment::Index(0)]);
        assert_eq!(issues[1].code, "array:expected_array");
        assert_eq!(issues[1].path, vec![PathSegment::Index(2)]);
    }

    #[tokio::test]
    async fn test_async_items_resolve_in_order() {
        let schema = array(number().to_async().transform(|value: Value| {
            Ok::<_, String>(json!(value.as_i64().unwrap_or_default() + 1))
        }));

        let outcome = schema.execute(json!([1, 2, 3]));
        assert!(outcome.is_pending());
        assert_eq!(outcome.await, success(json!([2, 3, 4])));
    }

    fn recording_item(log: &Arc<Mutex<Vec<String>>>) -> Schema {
        let log = Arc::clone(log);
        Schema::new().transform_async(move |value: Value| {
            log.lock().unwrap().push(format!("start {}", value));
            let log = Arc::clone(&log);
            async move {
                tokio::task::yield_now().await;
                log.lock().unwrap().push(format!("end {}", value));
                Ok::<_, String>(value)
            }
        })
    }

    #[tokio::test]
    async fn test_next_item_starts_after_previous_resolves() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let schema = array(recording_item(&log));

        let outcome = schema.execute(json!([1, 2, 3]));
        assert!(outcome.is_pending());
        assert_eq!(*log.lock().unwrap(), vec!["start 1"]);

        assert_eq!(outcome.await, success(json!([1, 2, 3])));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["start 1", "end 1", "start 2", "end 2", "start 3", "end 3"]
        );
    }
}
