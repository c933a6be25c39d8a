//! Fluent chaining for the built-in steps
//!
//! [`SchemaExt`] is implemented for [`Schema`] and appends one built-in step
//! per call, so schemas read left to right in execution order:
//!
//! ```rust
//! use serde_json::json;
//! use valchecker::prelude::*;
//!
//! let slug = string()
//!     .to_trimmed()
//!     .to_lowercase()
//!     .min(3)
//!     .check(|value| value.as_str().is_some_and(|s| !s.contains(' ')));
//!
//! let result = slug.execute(json!("  Hello ")).into_ready().unwrap();
//! assert_eq!(result, ExecutionResult::success(json!("hello")));
//! ```

use std::future::Future;

use serde_json::{Number, Value};

use crate::compose::Nullable;
use crate::error::BoxError;
use crate::issue::Issues;
use crate::schema::Schema;
use crate::steps::{
    Check, CheckAsync, EndsWith, Fallback, Max, Min, ParseJson, StartsWith, StringifyJson,
    ToAsync, ToLowercase, ToTrimmed, ToUppercase, Transform, TransformAsync,
};

/// Extension trait adding the built-in steps as chainable methods.
pub trait SchemaExt: Sized {
    /// The schema to extend.
    fn into_schema(self) -> Schema;

    /// Require a minimum size: numeric value, string length in characters,
    /// or number of array elements or object properties.
    fn min(self, limit: impl Into<Number>) -> Schema {
        self.into_schema().with(&Min::new(limit))
    }

    /// Require a maximum size, measured like [`SchemaExt::min`].
    fn max(self, limit: impl Into<Number>) -> Schema {
        self.into_schema().with(&Max::new(limit))
    }

    /// Require a string prefix.
    fn starts_with(self, prefix: impl Into<String>) -> Schema {
        self.into_schema().with(&StartsWith::new(prefix))
    }

    /// Require a string suffix.
    fn ends_with(self, suffix: impl Into<String>) -> Schema {
        self.into_schema().with(&EndsWith::new(suffix))
    }

    /// Trim surrounding whitespace.
    fn to_trimmed(self) -> Schema {
        self.into_schema().with(&ToTrimmed)
    }

    /// Uppercase strings.
    fn to_uppercase(self) -> Schema {
        self.into_schema().with(&ToUppercase)
    }

    /// Lowercase strings.
    fn to_lowercase(self) -> Schema {
        self.into_schema().with(&ToLowercase)
    }

    /// Replace the value with the result of `f`.
    fn transform<F, E>(self, f: F) -> Schema
    where
        F: Fn(Value) -> Result<Value, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.into_schema().with(&Transform::new(f))
    }

    /// Replace the value with the result of the future returned by `f`.
    fn transform_async<F, Fut, E>(self, f: F) -> Schema
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        self.into_schema().with(&TransformAsync::new(f))
    }

    /// Fail with `check:failed` unless `f` returns `true`.
    fn check<F>(self, f: F) -> Schema
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.into_schema().with(&Check::new(f))
    }

    /// Async variant of [`SchemaExt::check`].
    fn check_async<F, Fut>(self, f: F) -> Schema
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        self.into_schema().with(&CheckAsync::new(f))
    }

    /// Recover from any earlier failure.
    fn fallback<F>(self, f: F) -> Schema
    where
        F: Fn(&Issues) -> Value + Send + Sync + 'static,
    {
        self.into_schema().with(&Fallback::new(f))
    }

    /// Make every later step run after a suspension point.
    fn to_async(self) -> Schema {
        self.into_schema().with(&ToAsync)
    }

    /// Accept `null` in addition to what this schema accepts.
    fn nullable(self) -> Schema {
        Schema::new().with(&Nullable::new(self.into_schema()))
    }

    /// Serialize the value to JSON text.
    fn stringify_json(self) -> Schema {
        self.into_schema().with(&StringifyJson)
    }

    /// Parse JSON text into a value.
    fn parse_json(self) -> Schema {
        self.into_schema().with(&ParseJson::new())
    }
}

impl SchemaExt for Schema {
    #[inline]
    fn into_schema(self) -> Schema {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::success;
    use crate::steps::{number, string};
    use serde_json::json;

    #[test]
    fn test_chain_records_operations_in_order() {
        let schema = string().to_trimmed().min(1).max(5).ends_with("!");
        assert_eq!(
            schema.meta().operations(),
            &["string", "toTrimmed", "min", "max", "endsWith"]
        );
    }

    #[test]
    fn test_fallback_after_failed_chain() {
        let schema = number().min(10).fallback(|issues| json!(issues.len()));
        assert_eq!(schema.execute(json!(3)).into_ready(), Some(success(json!(1))));
        assert_eq!(schema.execute(json!(30)).into_ready(), Some(success(json!(30))));
    }

    #[test]
    fn test_json_round_trip_chain() {
        let schema = string().parse_json().stringify_json();
        assert_eq!(
            schema.execute(json!("{ \"a\" : 1 }")).into_ready(),
            Some(success(json!("{\"a\":1}")))
        );
    }

    #[tokio::test]
    async fn test_to_async_defers_remaining_steps() {
        let schema = string().to_async().to_uppercase();
        let outcome = schema.execute(json!("abc"));
        assert!(outcome.is_pending());
        assert_eq!(outcome.await, success(json!("ABC")));
    }

    #[tokio::test]
    async fn test_async_check_and_transform_chain() {
        let schema = string()
            .check_async(|value: Value| async move { value.as_str() != Some("") })
            .transform_async(|value: Value| async move {
                Ok::<_, String>(json!(value.as_str().map(str::len)))
            });

        assert_eq!(schema.execute_async(json!("four")).await, success(json!(4)));
        let result = schema.execute_async(json!("")).await;
        assert_eq!(result.issues().unwrap().codes(), vec!["check:failed"]);
    }
}
