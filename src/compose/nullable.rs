//! Optional `null`

use serde_json::Value;

use crate::pending::MaybePending;
use crate::result::success;
use crate::schema::{Schema, SchemaMeta};
use crate::step::{RuntimeStep, StepContributor};

/// Accepts `null` as is and hands every other value to an inner schema.
#[derive(Debug, Clone)]
pub struct Nullable {
    inner: Schema,
}

impl Nullable {
    /// Wrap `inner`.
    pub fn new(inner: Schema) -> Self {
        Nullable { inner }
    }
}

impl StepContributor for Nullable {
    fn name(&self) -> &'static str {
        "nullable"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let inner = self.inner.clone();
        vec![RuntimeStep::on_success(move |value: Value| {
            if value.is_null() {
                MaybePending::Ready(success(value))
            } else {
                inner.execute(value)
            }
        })]
    }
}

/// A schema accepting `null` or whatever `inner` accepts.
pub fn nullable(inner: Schema) -> Schema {
    Schema::new().with(&Nullable::new(inner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ext::SchemaExt;
    use crate::steps::string;
    use serde_json::json;

    #[test]
    fn test_null_skips_inner_schema() {
        let schema = nullable(string().check(|_| panic!("inner schema ran")));
        assert_eq!(schema.execute(Value::Null).into_ready(), Some(success(Value::Null)));
    }

    #[test]
    fn test_other_values_use_inner_schema() {
        let schema = string().to_uppercase().nullable();
        assert_eq!(schema.execute(json!("a")).into_ready(), Some(success(json!("A"))));
        let result = schema.execute(json!(1)).into_ready().unwrap();
        assert_eq!(result.issues().unwrap().codes(), vec!["string:expected_string"]);
    }
}
