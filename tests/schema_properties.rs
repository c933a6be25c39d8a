//! Property-based tests for schema execution

use proptest::prelude::*;
use serde_json::{json, Value};
use valchecker::prelude::{array, number, string, union, ExecutionResult, Schema, SchemaExt};
use valchecker::PathSegment;

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z]{0,8}".prop_map(Value::String),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_empty_schema_is_identity(value in json_value()) {
        let result = Schema::new().execute(value.clone()).into_ready();
        prop_assert_eq!(result, Some(ExecutionResult::success(value)));
    }

    #[test]
    fn prop_array_issues_match_failing_indices(items in prop::collection::vec(json_leaf(), 0..20)) {
        let result = array(number()).execute(Value::Array(items.clone())).into_ready().unwrap();

        let failing: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.is_number())
            .map(|(index, _)| index)
            .collect();

        match result {
            ExecutionResult::Success(value) => {
                prop_assert!(failing.is_empty());
                prop_assert_eq!(value, Value::Array(items));
            }
            ExecutionResult::Failure(issues) => {
                let paths: Vec<Vec<PathSegment>> =
                    issues.iter().map(|issue| issue.path.clone()).collect();
                let expected: Vec<Vec<PathSegment>> = failing
                    .into_iter()
                    .map(|index| vec![PathSegment::Index(index)])
                    .collect();
                prop_assert_eq!(paths, expected);
            }
        }
    }

    #[test]
    fn prop_sync_and_async_agree(value in json_value()) {
        let sync = union([number().min(0), string().to_uppercase()]);
        let deferred = union([number().to_async().min(0), string().to_async().to_uppercase()]);

        let expected = sync.execute(value.clone()).into_ready().unwrap();
        let actual = tokio_test::block_on(deferred.execute_async(value));
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn prop_fallback_always_succeeds(value in json_value()) {
        let schema = string().min(3).fallback(|_| json!("default"));
        let result = schema.execute(value).into_ready().unwrap();
        prop_assert!(result.is_success());
    }
}
