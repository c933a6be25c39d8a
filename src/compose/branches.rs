//! Sequential branch evaluation shared by union and intersection
//!
//! Branches run strictly in declaration order. A branch is not started until
//! the previous branch's result is known, so "first success" and "first
//! failure" are deterministic even when branches suspend.

use std::ops::ControlFlow;
use std::sync::Arc;

use serde_json::Value;

use crate::pending::MaybePending;
use crate::result::ExecutionResult;
use crate::schema::Schema;
use crate::step::StepOutcome;

/// Decides what a composer does with each branch result.
pub(crate) trait BranchPolicy: Send + 'static {
    /// Observe one branch result. `Break` ends evaluation with that result.
    fn visit(&mut self, result: ExecutionResult) -> ControlFlow<ExecutionResult>;

    /// Produce the result once every branch has been visited.
    fn finish(self, value: Value) -> ExecutionResult;
}

pub(crate) fn run_branches<P>(branches: &Arc<[Schema]>, value: Value, mut policy: P) -> StepOutcome
where
    P: BranchPolicy,
{
    for (index, branch) in branches.iter().enumerate() {
        match branch.execute(value.clone()) {
            MaybePending::Ready(result) => {
                if let ControlFlow::Break(done) = policy.visit(result) {
                    return MaybePending::Ready(done);
                }
            }
            MaybePending::Pending(fut) => {
                let rest = Arc::clone(branches);
                return MaybePending::pending(async move {
                    if let ControlFlow::Break(done) = policy.visit(fut.await) {
                        return done;
                    }
                    for branch in rest.iter().skip(index + 1) {
                        let result = branch.execute(value.clone()).await;
                        if let ControlFlow::Break(done) = policy.visit(result) {
                            return done;
                        }
                    }
                    policy.finish(value)
                });
            }
        }
    }

    MaybePending::Ready(policy.finish(value))
}
