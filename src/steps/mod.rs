//! Built-in leaf steps
//!
//! Every leaf follows the same shape: a success-only step that keeps the value
//! when a predicate holds and otherwise fails with one issue whose payload
//! carries the offending value. Messages can be overridden per step with a
//! [`MessageHandler`].
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use valchecker::issue::message;
//! use valchecker::steps::*;
//! use valchecker::Schema;
//!
//! let schema = Schema::new().with(&IsString::new().message(message(|_| "need text".into())));
//! let result = schema.execute(json!(5)).into_ready().unwrap();
//! assert_eq!(result.issues().unwrap().first().message, "need text");
//! ```

mod bounds;
mod check;
mod fallback;
mod json;
mod primitive;
mod string;
mod to_async;
mod transform;

pub use bounds::{Max, Min};
pub use check::{Check, CheckAsync};
pub use fallback::Fallback;
pub use json::{ParseJson, StringifyJson};
pub use primitive::{
    any, boolean, integer, literal, never, null, number, string, AnyValue, IsBoolean, IsInteger,
    IsNever, IsNull, IsNumber, IsString, Literal,
};
pub use string::{EndsWith, StartsWith, ToLowercase, ToTrimmed, ToUppercase};
pub use to_async::ToAsync;
pub use transform::{Transform, TransformAsync};

use serde_json::Value;

use crate::issue::{create_issue, IssueSpec, MessageHandler, Payload};
use crate::result::{failure, success};
use crate::step::RuntimeStep;

/// Adds a `message` builder to a step that stores `message: Option<MessageHandler>`.
macro_rules! with_message {
    ($($step:ty),+ $(,)?) => {
        $(
            impl $step {
                /// Override the default issue message.
                pub fn message(mut self, handler: $crate::issue::MessageHandler) -> Self {
                    self.message = Some(handler);
                    self
                }
            }
        )+
    };
}

pub(crate) use with_message;

/// A success-only step that fails with `code` unless `predicate` holds.
///
/// The issue payload is `{ value, ..extra }`.
pub(crate) fn predicate_step<P>(
    code: &'static str,
    default_message: String,
    message: Option<MessageHandler>,
    extra: Payload,
    predicate: P,
) -> RuntimeStep
where
    P: Fn(&Value) -> bool + Send + Sync + 'static,
{
    RuntimeStep::on_success(move |value: Value| {
        if predicate(&value) {
            success(value)
        } else {
            let mut payload = Payload::new();
            payload.insert("value".to_string(), value);
            payload.extend(extra.clone());
            failure(create_issue(
                IssueSpec::new(code, default_message.clone())
                    .payload(payload)
                    .custom_message(message.as_ref()),
            ))
        }
    })
}

/// A success-only step that rewrites string values and passes others through.
pub(crate) fn string_map_step<F>(f: F) -> RuntimeStep
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    RuntimeStep::on_success(move |value: Value| match value {
        Value::String(text) => Value::String(f(&text)),
        other => other,
    })
}
