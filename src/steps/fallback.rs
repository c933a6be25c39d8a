//! Recovery from failures

use std::sync::Arc;

use serde_json::Value;

use super::with_message;
use crate::guard::{catch_sync, failed_issue};
use crate::issue::{Issues, MessageHandler};
use crate::result::{failure, success};
use crate::schema::SchemaMeta;
use crate::step::{RuntimeStep, StepContributor};

/// Replaces any failure with the value returned by a recovery function.
///
/// Successes pass through and the recovery function is never called for
/// them. A panic inside the recovery function yields `fallback:failed`.
///
/// ```
/// use serde_json::json;
/// use valchecker::prelude::*;
///
/// let schema = number().fallback(|_issues| json!(0));
/// assert_eq!(schema.execute(json!("x")).into_ready(), Some(ExecutionResult::success(json!(0))));
/// assert_eq!(schema.execute(json!(7)).into_ready(), Some(ExecutionResult::success(json!(7))));
/// ```
#[derive(Clone)]
pub struct Fallback {
    f: Arc<dyn Fn(&Issues) -> Value + Send + Sync>,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for Fallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fallback").field("f", &"<function>").finish()
    }
}

impl Fallback {
    /// Recover with `f`.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Issues) -> Value + Send + Sync + 'static,
    {
        Fallback {
            f: Arc::new(f),
            message: None,
        }
    }
}

with_message!(Fallback);

impl StepContributor for Fallback {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let f = Arc::clone(&self.f);
        let message = self.message.clone();
        vec![RuntimeStep::on_failure(move |issues: Issues| {
            match catch_sync(|| f(&issues)) {
                Ok(value) => success(value),
                Err(panic) => failure(failed_issue(
                    "fallback",
                    "Fallback failed",
                    None,
                    panic,
                    message.as_ref(),
                )),
            }
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::steps::IsNumber;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_fallback_not_called_on_success() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let schema = Schema::new().with(&IsNumber::new()).with(&Fallback::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            json!(0)
        }));

        assert_eq!(schema.execute(json!(5)).into_ready(), Some(success(json!(5))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fallback_sees_issues() {
        let schema = Schema::new()
            .with(&IsNumber::new())
            .with(&Fallback::new(|issues: &Issues| json!(issues.first().code)));

        assert_eq!(
            schema.execute(json!("x")).into_ready(),
            Some(success(json!("number:expected_number")))
        );
    }

    #[test]
    fn test_fallback_panic_is_contained() {
        let schema = Schema::new()
            .with(&IsNumber::new())
            .with(&Fallback::new(|_: &Issues| panic!("no default")));

        let result = schema.execute(json!("x")).into_ready().unwrap();
        let issue = result.issues().unwrap().first();
        assert_eq!(issue.code, "fallback:failed");
        assert_eq!(issue.payload["error"], json!("no default"));
    }
}
