//! All-of gates

use std::ops::ControlFlow;
use std::sync::Arc;

use serde_json::Value;

use super::branches::{run_branches, BranchPolicy};
use crate::issue::Issues;
use crate::result::{failure, success, ExecutionResult};
use crate::schema::{Schema, SchemaMeta};
use crate::step::{RuntimeStep, StepContributor};

/// Accepts a value only when every branch accepts it.
///
/// Every branch runs, in order, even after one has failed. Only the first
/// failing branch's issues are reported. On success the original input is
/// returned; branch outputs are discarded.
#[derive(Debug, Clone)]
pub struct IntersectionOf {
    branches: Arc<[Schema]>,
}

impl IntersectionOf {
    /// Branches that must all accept.
    pub fn new(branches: impl IntoIterator<Item = Schema>) -> Self {
        IntersectionOf {
            branches: branches.into_iter().collect(),
        }
    }
}

#[derive(Default)]
struct FirstFailure {
    issues: Option<Issues>,
}

impl BranchPolicy for FirstFailure {
    fn visit(&mut self, result: ExecutionResult) -> ControlFlow<ExecutionResult> {
        if let ExecutionResult::Failure(issues) = result {
            self.issues.get_or_insert(issues);
        }
        ControlFlow::Continue(())
    }

    fn finish(self, value: Value) -> ExecutionResult {
        match self.issues {
            Some(issues) => failure(issues),
            None => success(value),
        }
    }
}

impl StepContributor for IntersectionOf {
    fn name(&self) -> &'static str {
        "intersection"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let branches = Arc::clone(&self.branches);
        vec![RuntimeStep::on_success(move |value: Value| {
            run_branches(&branches, value, FirstFailure::default())
        })]
    }
}

/// A schema requiring every branch to accept the value.
pub fn intersection(branches: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::new().with(&IntersectionOf::new(branches))
}
