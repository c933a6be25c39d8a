//! Lower and upper bounds
//!
//! Numbers are compared by value, strings by character count, arrays and
//! objects by length. Values with no measurable size fail the bound.

use serde_json::{Number, Value};

use super::{predicate_step, with_message};
use crate::issue::{MessageHandler, Payload};
use crate::schema::SchemaMeta;
use crate::step::{RuntimeStep, StepContributor};

fn measure(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => Some(text.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(entries) => Some(entries.len() as f64),
        Value::Null | Value::Bool(_) => None,
    }
}

fn bound_step(
    code: &'static str,
    key: &str,
    default_message: String,
    limit: &Number,
    message: Option<MessageHandler>,
    within: fn(f64, f64) -> bool,
) -> RuntimeStep {
    let mut extra = Payload::new();
    extra.insert(key.to_string(), Value::Number(limit.clone()));
    let limit = limit.as_f64();

    predicate_step(code, default_message, message, extra, move |value| {
        match (measure(value), limit) {
            (Some(size), Some(limit)) => within(size, limit),
            _ => false,
        }
    })
}

/// Requires a value (or size) of at least `limit`.
#[derive(Clone)]
pub struct Min {
    limit: Number,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for Min {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Min").field("limit", &self.limit).finish()
    }
}

impl Min {
    /// Lower bound, inclusive.
    pub fn new(limit: impl Into<Number>) -> Self {
        Min {
            limit: limit.into(),
            message: None,
        }
    }
}

impl StepContributor for Min {
    fn name(&self) -> &'static str {
        "min"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        vec![bound_step(
            "min:expected_min",
            "min",
            format!("Expected a minimum value of {}.", self.limit),
            &self.limit,
            self.message.clone(),
            |size, limit| size >= limit,
        )]
    }
}

/// Requires a value (or size) of at most `limit`.
#[derive(Clone)]
pub struct Max {
    limit: Number,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for Max {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Max").field("limit", &self.limit).finish()
    }
}

impl Max {
    /// Upper bound, inclusive.
    pub fn new(limit: impl Into<Number>) -> Self {
        Max {
            limit: limit.into(),
            message: None,
        }
    }
}

impl StepContributor for Max {
    fn name(&self) -> &'static str {
        "max"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        vec![bound_step(
            "max:expected_max",
            "max",
            format!("Expected a maximum value of {}.", self.limit),
            &self.limit,
            self.message.clone(),
            |size, limit| size <= limit,
        )]
    }
}

with_message!(Min, Max);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ExecutionResult;
    use crate::schema::Schema;
    use serde_json::json;

    fn run(contributor: &dyn StepContributor, value: Value) -> ExecutionResult {
        Schema::new().with(contributor).execute(value).into_ready().unwrap()
    }

    #[test]
    fn test_min_measures_by_kind() {
        let min = Min::new(3);
        assert!(run(&min, json!(3)).is_success());
        assert!(run(&min, json!(2.5)).is_failure());
        assert!(run(&min, json!("héé")).is_success());
        assert!(run(&min, json!("hé")).is_failure());
        assert!(run(&min, json!([1, 2, 3])).is_success());
        assert!(run(&min, json!({"a": 1})).is_failure());
        assert!(run(&min, json!(true)).is_failure());
    }

    #[test]
    fn test_max_issue_payload() {
        let result = run(&Max::new(2), json!([1, 2, 3]));
        let issue = result.issues().unwrap().first();
        assert_eq!(issue.code, "max:expected_max");
        assert_eq!(issue.message, "Expected a maximum value of 2.");
        assert_eq!(issue.payload["value"], json!([1, 2, 3]));
        assert_eq!(issue.payload["max"], json!(2));
    }
}
