//! User-supplied checks
//!
//! A check keeps the value unchanged when the callback returns `true` and fails
//! with `check:failed` otherwise. A panic inside the callback fails the same
//! way, with the panic message under `payload.error`.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

use super::with_message;
use crate::guard::{catch_async, catch_sync, failed_issue};
use crate::issue::{create_issue, IssueSpec, MessageHandler};
use crate::pending::MaybePending;
use crate::result::{failure, success, ExecutionResult};
use crate::schema::SchemaMeta;
use crate::step::{RuntimeStep, StepContributor};

const STEP: &str = "check";
const DEFAULT_MESSAGE: &str = "Check failed";

fn settle(
    value: Value,
    outcome: Result<bool, String>,
    message: Option<&MessageHandler>,
) -> ExecutionResult {
    match outcome {
        Ok(true) => success(value),
        Ok(false) => failure(create_issue(
            IssueSpec::new("check:failed", DEFAULT_MESSAGE)
                .payload_entry("value", value)
                .custom_message(message),
        )),
        Err(panic) => failure(failed_issue(STEP, DEFAULT_MESSAGE, Some(value), panic, message)),
    }
}

/// Synchronous check.
#[derive(Clone)]
pub struct Check {
    f: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check").field("f", &"<function>").finish()
    }
}

impl Check {
    /// Wrap a predicate.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Check {
            f: Arc::new(f),
            message: None,
        }
    }
}

impl StepContributor for Check {
    fn name(&self) -> &'static str {
        STEP
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let f = Arc::clone(&self.f);
        let message = self.message.clone();
        vec![RuntimeStep::on_success(move |value: Value| {
            let outcome = catch_sync(|| f(&value));
            settle(value, outcome, message.as_ref())
        })]
    }
}

/// Asynchronous check; always produces a pending result.
///
/// The callback receives its own copy of the value.
#[derive(Clone)]
pub struct CheckAsync {
    f: Arc<dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync>,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for CheckAsync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckAsync").field("f", &"<function>").finish()
    }
}

impl CheckAsync {
    /// Wrap an async predicate.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        CheckAsync {
            f: Arc::new(move |value: Value| f(value).boxed()),
            message: None,
        }
    }
}

impl StepContributor for CheckAsync {
    fn name(&self) -> &'static str {
        "checkAsync"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let f = Arc::clone(&self.f);
        let message = self.message.clone();
        vec![RuntimeStep::on_success(move |value: Value| {
            let message = message.clone();
            match catch_sync(|| f(value.clone())) {
                Ok(fut) => MaybePending::pending(async move {
                    let outcome = catch_async(fut).await;
                    settle(value, outcome, message.as_ref())
                }),
                Err(panic) => MaybePending::pending(async move {
                    settle(value, Err(panic), message.as_ref())
                }),
            }
        })]
    }
}

with_message!(Check, CheckAsync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::message;
    use crate::schema::Schema;
    use serde_json::json;

    fn positive(value: &Value) -> bool {
        value.as_f64().is_some_and(|n| n > 0.0)
    }

    #[test]
    fn test_check_keeps_value() {
        let schema = Schema::new().with(&Check::new(positive));
        assert_eq!(schema.execute(json!(3)).into_ready(), Some(success(json!(3))));
    }

    #[test]
    fn test_check_failure_issue() {
        let schema = Schema::new()
            .with(&Check::new(positive).message(message(|_| "must be positive".to_string())));
        let result = schema.execute(json!(-1)).into_ready().unwrap();
        let issue = result.issues().unwrap().first();
        assert_eq!(issue.code, "check:failed");
        assert_eq!(issue.message, "must be positive");
        assert_eq!(issue.payload["value"], json!(-1));
    }

    #[test]
    fn test_check_panic_is_contained() {
        let schema = Schema::new().with(&Check::new(|_: &Value| panic!("bad check")));
        let result = schema.execute(json!(0)).into_ready().unwrap();
        let issue = result.issues().unwrap().first();
        assert_eq!(issue.code, "check:failed");
        assert_eq!(issue.payload["error"], json!("bad check"));
    }

    #[tokio::test]
    async fn test_async_check() {
        let schema = Schema::new().with(&CheckAsync::new(|value: Value| async move {
            tokio::task::yield_now().await;
            value.as_str() == Some("ok")
        }));

        assert_eq!(schema.execute_async(json!("ok")).await, success(json!("ok")));
        let result = schema.execute_async(json!("no")).await;
        assert_eq!(result.issues().unwrap().codes(), vec!["check:failed"]);
    }
}
