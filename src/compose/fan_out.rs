//! Fan-out over child values
//!
//! Runs a child schema once per element or property, in declaration order,
//! and aggregates the outcome. Every child is evaluated; failures do not stop
//! the fan-out. Child issues are prefixed with the child's key or index and
//! accumulated in declaration order. Once one child suspends, the remaining
//! children run one after another behind it, so at most one child computation
//! is in flight at a time.

use serde_json::Value;

use crate::issue::{Issues, PathSegment};
use crate::pending::MaybePending;
use crate::result::{failure, success, ExecutionResult};
use crate::schema::Schema;
use crate::semigroup::Semigroup;
use crate::step::StepOutcome;

/// One child value and the schema that validates it.
pub(crate) struct Child {
    segment: PathSegment,
    schema: Schema,
    value: Value,
}

impl Child {
    pub(crate) fn new(segment: impl Into<PathSegment>, schema: Schema, value: Value) -> Self {
        Child {
            segment: segment.into(),
            schema,
            value,
        }
    }
}

/// Successful child outputs, keyed by their segment, in declaration order.
pub(crate) type Outputs = Vec<(PathSegment, Value)>;

struct Accumulator {
    outputs: Outputs,
    issues: Option<Issues>,
}

impl Accumulator {
    fn new(capacity: usize, issues: Option<Issues>) -> Self {
        Accumulator {
            outputs: Vec::with_capacity(capacity),
            issues,
        }
    }

    fn absorb(&mut self, segment: PathSegment, result: ExecutionResult) {
        match result {
            ExecutionResult::Success(value) => self.outputs.push((segment, value)),
            ExecutionResult::Failure(issues) => {
                let prefixed = issues.with_path_prefix(std::slice::from_ref(&segment));
                self.issues = self.issues.take().combine(Some(prefixed));
            }
        }
    }

    fn finish<A>(self, assemble: A) -> ExecutionResult
    where
        A: FnOnce(Outputs) -> Value,
    {
        match self.issues {
            Some(issues) => failure(issues),
            None => success(assemble(self.outputs)),
        }
    }
}

/// Validate every child and assemble the outputs on full success.
///
/// `issues` seeds the accumulator with issues found before fan-out (such as
/// unexpected keys); they are reported ahead of any child issue.
pub(crate) fn fan_out<A>(children: Vec<Child>, issues: Option<Issues>, assemble: A) -> StepOutcome
where
    A: FnOnce(Outputs) -> Value + Send + 'static,
{
    let mut acc = Accumulator::new(children.len(), issues);
    let mut remaining = children.into_iter();

    while let Some(Child {
        segment,
        schema,
        value,
    }) = remaining.next()
    {
        match schema.execute(value) {
            MaybePending::Ready(result) => acc.absorb(segment, result),
            MaybePending::Pending(fut) => {
                return MaybePending::pending(async move {
                    acc.absorb(segment, fut.await);
                    for child in remaining {
                        let result = child.schema.execute(child.value).await;
                        acc.absorb(child.segment, result);
                    }
                    acc.finish(assemble)
                });
            }
        }
    }

    MaybePending::Ready(acc.finish(assemble))
}
