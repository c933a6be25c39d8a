//! Containment of user callback failures
//!
//! Transforms, checks and fallbacks run user code. An error returned by that
//! code, or a panic raised inside it, is turned into a single
//! `"<step>:failed"` issue at the point of invocation so nothing escapes a
//! schema boundary.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use serde_json::Value;

use crate::issue::{create_issue, ExecutionIssue, IssueSpec, MessageHandler};

/// Run `f`, converting a panic into its message.
pub(crate) fn catch_sync<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

/// Await `fut`, converting a panic into its message.
pub(crate) async fn catch_async<F: Future>(fut: F) -> Result<F::Output, String> {
    AssertUnwindSafe(fut).catch_unwind().await.map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Build the issue reported when a callback of `step` fails.
///
/// `value` is recorded in the payload when the step had one to work on.
pub(crate) fn failed_issue(
    step: &str,
    default_message: &str,
    value: Option<Value>,
    error: String,
    message: Option<&MessageHandler>,
) -> ExecutionIssue {
    #[cfg(feature = "tracing")]
    tracing::warn!(step, error = %error, "callback failed");

    let mut spec = IssueSpec::new(format!("{}:failed", step), default_message);
    if let Some(value) = value {
        spec = spec.payload_entry("value", value);
    }
    create_issue(
        spec.payload_entry("error", Value::String(error))
            .custom_message(message),
    )
}
