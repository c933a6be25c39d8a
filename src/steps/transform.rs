//! User-supplied value transforms
//!
//! A transform replaces the current value with whatever the callback returns.
//! An error returned by the callback, or a panic inside it, becomes a single
//! `transform:failed` issue whose payload holds the input value and the error.
//!
//! # Example
//!
//! ```
//! use serde_json::{json, Value};
//! use valchecker::prelude::*;
//!
//! let schema = string().transform(|value: Value| {
//!     let text = value.as_str().unwrap_or_default();
//!     text.parse::<i64>().map(|n| json!(n)).map_err(|e| e.to_string())
//! });
//!
//! assert_eq!(
//!     schema.execute(json!("12")).into_ready(),
//!     Some(ExecutionResult::success(json!(12)))
//! );
//!
//! let failed = schema.execute(json!("twelve")).into_ready().unwrap();
//! assert_eq!(failed.issues().unwrap().first().code, "transform:failed");
//! ```

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use super::with_message;
use crate::error::BoxError;
use crate::guard::{catch_async, catch_sync, failed_issue};
use crate::issue::MessageHandler;
use crate::pending::MaybePending;
use crate::result::{failure, success, ExecutionResult};
use crate::schema::SchemaMeta;
use crate::step::{RuntimeStep, StepContributor};

const STEP: &str = "transform";
const DEFAULT_MESSAGE: &str = "Transform failed";

type TransformFn = Arc<dyn Fn(Value) -> Result<Value, BoxError> + Send + Sync>;
type AsyncTransformFn =
    Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, BoxError>> + Send + Sync>;

fn settle(
    input: Value,
    outcome: Result<Result<Value, BoxError>, String>,
    message: Option<&MessageHandler>,
) -> ExecutionResult {
    match outcome {
        Ok(Ok(output)) => success(output),
        Ok(Err(err)) => failure(failed_issue(
            STEP,
            DEFAULT_MESSAGE,
            Some(input),
            err.to_string(),
            message,
        )),
        Err(panic) => failure(failed_issue(STEP, DEFAULT_MESSAGE, Some(input), panic, message)),
    }
}

/// Synchronous transform.
#[derive(Clone)]
pub struct Transform {
    f: TransformFn,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform").field("f", &"<function>").finish()
    }
}

impl Transform {
    /// Wrap a fallible transform.
    pub fn new<F, E>(f: F) -> Self
    where
        F: Fn(Value) -> Result<Value, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Transform {
            f: Arc::new(move |value: Value| f(value).map_err(Into::<BoxError>::into)),
            message: None,
        }
    }
}

impl StepContributor for Transform {
    fn name(&self) -> &'static str {
        STEP
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let f = Arc::clone(&self.f);
        let message = self.message.clone();
        vec![RuntimeStep::on_success(move |value: Value| {
            let input = value.clone();
            let outcome = catch_sync(|| f(value));
            settle(input, outcome, message.as_ref())
        })]
    }
}

/// Asynchronous transform; always produces a pending result.
#[derive(Clone)]
pub struct TransformAsync {
    f: AsyncTransformFn,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for TransformAsync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformAsync").field("f", &"<function>").finish()
    }
}

impl TransformAsync {
    /// Wrap a fallible async transform.
    pub fn new<F, Fut, E>(f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, E>> + Send + 'static,
        E: Into<BoxError>,
    {
        TransformAsync {
            f: Arc::new(move |value: Value| {
                f(value)
                    .map(|result| result.map_err(Into::<BoxError>::into))
                    .boxed()
            }),
            message: None,
        }
    }
}

impl StepContributor for TransformAsync {
    fn name(&self) -> &'static str {
        "transformAsync"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let f = Arc::clone(&self.f);
        let message = self.message.clone();
        vec![RuntimeStep::on_success(move |value: Value| {
            let input = value.clone();
            let message = message.clone();
            // Building the future runs user code too
            match catch_sync(|| f(value)) {
                Ok(fut) => MaybePending::pending(async move {
                    let outcome = catch_async(fut).await;
                    settle(input, outcome, message.as_ref())
                }),
                Err(panic) => MaybePending::pending(async move {
                    settle(input, Err(panic), message.as_ref())
                }),
            }
        })]
    }
}

with_message!(Transform, TransformAsync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    fn double(value: Value) -> Result<Value, String> {
        value
            .as_i64()
            .map(|n| json!(n * 2))
            .ok_or_else(|| "not an integer".to_string())
    }

    #[test]
    fn test_transform_replaces_value() {
        let schema = Schema::new().with(&Transform::new(double));
        assert_eq!(schema.execute(json!(4)).into_ready(), Some(success(json!(8))));
    }

    #[test]
    fn test_transform_error_becomes_issue() {
        let schema = Schema::new().with(&Transform::new(double));
        let result = schema.execute(json!("x")).into_ready().unwrap();
        let issues = result.issues().unwrap();

        assert_eq!(issues.len(), 1);
        let issue = issues.first();
        assert_eq!(issue.code, "transform:failed");
        assert_eq!(issue.message, "Transform failed");
        assert_eq!(issue.payload["value"], json!("x"));
        assert_eq!(issue.payload["error"], json!("not an integer"));
        assert!(issue.path.is_empty());
    }

    #[test]
    fn test_transform_panic_becomes_issue() {
        let schema = Schema::new().with(&Transform::new(|_value: Value| -> Result<Value, String> {
            panic!("kaboom")
        }));
        let result = schema.execute(json!(1)).into_ready().unwrap();
        let issue = result.issues().unwrap().first();
        assert_eq!(issue.code, "transform:failed");
        assert_eq!(issue.payload["error"], json!("kaboom"));
    }

    #[test]
    fn test_panicking_message_handler_keeps_failure_contained() {
        let handler = crate::issue::message(|_| panic!("handler exploded"));
        let schema = Schema::new().with(&Transform::new(double).message(handler));
        let result = schema.execute(json!("x")).into_ready().unwrap();
        let issue = result.issues().unwrap().first();
        assert_eq!(issue.code, "transform:failed");
        assert_eq!(issue.message, "Transform failed");
        assert_eq!(issue.payload["error"], json!("not an integer"));
    }

    #[tokio::test]
    async fn test_async_transform_resolves() {
        let schema = Schema::new().with(&TransformAsync::new(|value: Value| async move {
            tokio::task::yield_now().await;
            double(value)
        }));

        let outcome = schema.execute(json!(21));
        assert!(outcome.is_pending());
        assert_eq!(outcome.await, success(json!(42)));
    }

    #[tokio::test]
    async fn test_async_transform_rejection_has_same_shape() {
        let schema = Schema::new().with(&TransformAsync::new(|_value: Value| async move {
            Err::<Value, _>("remote failure")
        }));

        let result = schema.execute_async(json!("in")).await;
        let issue = result.issues().unwrap().first();
        assert_eq!(issue.code, "transform:failed");
        assert_eq!(issue.message, "Transform failed");
        assert_eq!(issue.payload["value"], json!("in"));
        assert_eq!(issue.payload["error"], json!("remote failure"));
    }
}
