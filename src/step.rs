//! Runtime steps and step contributors
//!
//! A [`RuntimeStep`] is the unit of composition: a function from the previous
//! [`ExecutionResult`] to the next one, possibly pending. Steps come in three
//! flavors:
//!
//! - [`RuntimeStep::any`] always runs and sees the raw previous result.
//! - [`RuntimeStep::on_success`] runs only on success and receives the value;
//!   failures are forwarded untouched.
//! - [`RuntimeStep::on_failure`] runs only on failure and receives the issues;
//!   successes are forwarded untouched.
//!
//! Step functions may return a bare [`Value`], an [`ExecutionResult`], or a
//! [`MaybePending`] of either; [`IntoStepOutcome`] normalizes them.
//!
//! A [`StepContributor`] is the plugin seam: it turns its own arguments into
//! zero or more steps when a schema is built.
//!
//! # Example
//!
//! ```
//! use serde_json::{json, Value};
//! use valchecker::{RuntimeStep, Schema, SchemaMeta, StepContributor};
//!
//! struct Double;
//!
//! impl StepContributor for Double {
//!     fn name(&self) -> &'static str {
//!         "double"
//!     }
//!
//!     fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
//!         vec![RuntimeStep::on_success(|value: Value| {
//!             json!(value.as_i64().unwrap_or_default() * 2)
//!         })]
//!     }
//! }
//!
//! let schema = Schema::new().with(&Double);
//! let result = schema.execute(json!(21)).into_ready().unwrap();
//! assert_eq!(result.value(), Some(&json!(42)));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::issue::Issues;
use crate::pending::MaybePending;
use crate::pipe::PipeFn;
use crate::result::ExecutionResult;
use crate::schema::SchemaMeta;

/// What a step produces: a result now or later.
pub type StepOutcome = MaybePending<ExecutionResult>;

/// Normalizes the return value of a step function.
pub trait IntoStepOutcome {
    /// Convert into a possibly pending result.
    fn into_step_outcome(self) -> StepOutcome;
}

impl IntoStepOutcome for ExecutionResult {
    #[inline]
    fn into_step_outcome(self) -> StepOutcome {
        MaybePending::Ready(self)
    }
}

impl IntoStepOutcome for Value {
    #[inline]
    fn into_step_outcome(self) -> StepOutcome {
        MaybePending::Ready(ExecutionResult::Success(self))
    }
}

impl IntoStepOutcome for MaybePending<ExecutionResult> {
    #[inline]
    fn into_step_outcome(self) -> StepOutcome {
        self
    }
}

impl IntoStepOutcome for MaybePending<Value> {
    #[inline]
    fn into_step_outcome(self) -> StepOutcome {
        self.map(ExecutionResult::Success)
    }
}

/// Which results a step reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Runs on every result
    Any,
    /// Runs on successes only
    Success,
    /// Runs on failures only
    Failure,
}

/// One compiled step of a pipeline. Immutable once built; cheap to clone.
#[derive(Clone)]
pub struct RuntimeStep {
    kind: StepKind,
    run: PipeFn<ExecutionResult>,
}

impl fmt::Debug for RuntimeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeStep")
            .field("kind", &self.kind)
            .field("run", &"<function>")
            .finish()
    }
}

impl RuntimeStep {
    /// A step that always runs and receives the raw previous result.
    pub fn any<F, R>(f: F) -> Self
    where
        F: Fn(ExecutionResult) -> R + Send + Sync + 'static,
        R: IntoStepOutcome,
    {
        RuntimeStep {
            kind: StepKind::Any,
            run: Arc::new(move |result| f(result).into_step_outcome()),
        }
    }

    /// A step that runs only on success, receiving the unwrapped value.
    pub fn on_success<F, R>(f: F) -> Self
    where
        F: Fn(Value) -> R + Send + Sync + 'static,
        R: IntoStepOutcome,
    {
        RuntimeStep {
            kind: StepKind::Success,
            run: Arc::new(move |result| match result {
                ExecutionResult::Success(value) => f(value).into_step_outcome(),
                failure @ ExecutionResult::Failure(_) => MaybePending::Ready(failure),
            }),
        }
    }

    /// A step that runs only on failure, receiving the issues.
    pub fn on_failure<F, R>(f: F) -> Self
    where
        F: Fn(Issues) -> R + Send + Sync + 'static,
        R: IntoStepOutcome,
    {
        RuntimeStep {
            kind: StepKind::Failure,
            run: Arc::new(move |result| match result {
                ExecutionResult::Failure(issues) => f(issues).into_step_outcome(),
                success @ ExecutionResult::Success(_) => MaybePending::Ready(success),
            }),
        }
    }

    /// Which results this step reacts to.
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// Run the step against a previous result.
    pub fn invoke(&self, previous: ExecutionResult) -> StepOutcome {
        (self.run)(previous)
    }

    pub(crate) fn pipe_fn(&self) -> PipeFn<ExecutionResult> {
        Arc::clone(&self.run)
    }
}

/// A plugin that contributes steps to a schema under construction.
///
/// Contributors carry their own arguments and are consulted exactly once,
/// when the schema is built. They must not execute schemas themselves.
pub trait StepContributor: Send + Sync {
    /// Operation name recorded in the schema's metadata.
    fn name(&self) -> &'static str;

    /// Produce the steps to append, in order.
    fn contribute(&self, meta: &SchemaMeta) -> Vec<RuntimeStep>;
}

impl<C: StepContributor + ?Sized> StepContributor for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn contribute(&self, meta: &SchemaMeta) -> Vec<RuntimeStep> {
        (**self).contribute(meta)
    }
}

impl<C: StepContributor + ?Sized> StepContributor for Arc<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn contribute(&self, meta: &SchemaMeta) -> Vec<RuntimeStep> {
        (**self).contribute(meta)
    }
}
