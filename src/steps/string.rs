//! String predicates and string transforms

use serde_json::Value;

use super::{predicate_step, string_map_step, with_message};
use crate::issue::{MessageHandler, Payload};
use crate::schema::SchemaMeta;
use crate::step::{RuntimeStep, StepContributor};

/// Requires a string starting with a prefix.
#[derive(Clone)]
pub struct StartsWith {
    prefix: String,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for StartsWith {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StartsWith").field("prefix", &self.prefix).finish()
    }
}

impl StartsWith {
    /// Require `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        StartsWith {
            prefix: prefix.into(),
            message: None,
        }
    }
}

impl StepContributor for StartsWith {
    fn name(&self) -> &'static str {
        "startsWith"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let prefix = self.prefix.clone();
        let mut extra = Payload::new();
        extra.insert("prefix".to_string(), Value::String(prefix.clone()));
        vec![predicate_step(
            "startsWith:expected_starts_with",
            format!("Expected to start with \"{}\".", prefix),
            self.message.clone(),
            extra,
            move |value| value.as_str().is_some_and(|text| text.starts_with(&prefix)),
        )]
    }
}

/// Requires a string ending with a suffix.
#[derive(Clone)]
pub struct EndsWith {
    suffix: String,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for EndsWith {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndsWith").field("suffix", &self.suffix).finish()
    }
}

impl EndsWith {
    /// Require `suffix`.
    pub fn new(suffix: impl Into<String>) -> Self {
        EndsWith {
            suffix: suffix.into(),
            message: None,
        }
    }
}

impl StepContributor for EndsWith {
    fn name(&self) -> &'static str {
        "endsWith"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let suffix = self.suffix.clone();
        let mut extra = Payload::new();
        extra.insert("suffix".to_string(), Value::String(suffix.clone()));
        vec![predicate_step(
            "endsWith:expected_ends_with",
            format!("Expected to end with \"{}\".", suffix),
            self.message.clone(),
            extra,
            move |value| value.as_str().is_some_and(|text| text.ends_with(&suffix)),
        )]
    }
}

with_message!(StartsWith, EndsWith);

/// Trims surrounding whitespace from strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToTrimmed;

impl StepContributor for ToTrimmed {
    fn name(&self) -> &'static str {
        "toTrimmed"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        vec![string_map_step(|text| text.trim().to_string())]
    }
}

/// Uppercases strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToUppercase;

impl StepContributor for ToUppercase {
    fn name(&self) -> &'static str {
        "toUppercase"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        vec![string_map_step(str::to_uppercase)]
    }
}

/// Lowercases strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToLowercase;

impl StepContributor for ToLowercase {
    fn name(&self) -> &'static str {
        "toLowercase"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        vec![string_map_step(str::to_lowercase)]
    }
}

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
    fn test_starts_with() {
        let step = StartsWith::new("https://");
        assert!(run(&step, json!("https://example.com")).is_success());

        let result = run(&step, json!("ftp://example.com"));
        let issue = result.issues().unwrap().first();
        assert_eq!(issue.code, "startsWith:expected_starts_with");
        assert_eq!(issue.message, "Expected to start with \"https://\".");
        assert_eq!(issue.payload["prefix"], json!("https://"));
    }

    #[test]
    fn test_ends_with_rejects_non_strings() {
        assert!(run(&EndsWith::new(".rs"), json!("main.rs")).is_success());
        assert!(run(&EndsWith::new(".rs"), json!(42)).is_failure());
    }

    #[test]
    fn test_string_transforms() {
        assert_eq!(run(&ToTrimmed, json!("  a b  ")), ExecutionResult::success(json!("a b")));
        assert_eq!(run(&ToUppercase, json!("abc")), ExecutionResult::success(json!("ABC")));
        assert_eq!(run(&ToLowercase, json!("ÀBC")), ExecutionResult::success(json!("àbc")));
    }

    #[test]
    fn test_string_transforms_pass_other_values_through() {
        assert_eq!(run(&ToTrimmed, json!(7)), ExecutionResult::success(json!(7)));
    }
}
