//! First-match alternatives

use std::ops::ControlFlow;
use std::sync::Arc;

use serde_json::Value;

use super::branches::{run_branches, BranchPolicy};
use crate::issue::{create_issue, IssueSpec, Issues, MessageHandler};
use crate::result::{failure, ExecutionResult};
use crate::schema::{Schema, SchemaMeta};
use crate::step::{RuntimeStep, StepContributor};
use crate::steps::with_message;

/// Accepts a value when any branch accepts it.
///
/// Branches are tried in order and the first success wins, including its
/// transformed output. When every branch fails, the issues of the first
/// branch are reported. A union without branches fails with `union:no_match`.
#[derive(Clone)]
pub struct UnionOf {
    branches: Arc<[Schema]>,
    message: Option<MessageHandler>,
}

impl std::fmt::Debug for UnionOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnionOf")
            .field("branches", &self.branches.len())
            .finish()
    }
}

impl UnionOf {
    /// Alternatives in priority order.
    pub fn new(branches: impl IntoIterator<Item = Schema>) -> Self {
        UnionOf {
            branches: branches.into_iter().collect(),
            message: None,
        }
    }
}

with_message!(UnionOf);

struct FirstSuccess {
    first_failure: Option<Issues>,
    message: Option<MessageHandler>,
}

impl BranchPolicy for FirstSuccess {
    fn visit(&mut self, result: ExecutionResult) -> ControlFlow<ExecutionResult> {
        match result {
            ExecutionResult::Success(_) => ControlFlow::Break(result),
            ExecutionResult::Failure(issues) => {
                self.first_failure.get_or_insert(issues);
                ControlFlow::Continue(())
            }
        }
    }

    fn finish(self, value: Value) -> ExecutionResult {
        match self.first_failure {
            Some(issues) => failure(issues),
            None => failure(create_issue(
                IssueSpec::new("union:no_match", "Expected a value matching the union.")
                    .payload_entry("value", value)
                    .custom_message(self.message.as_ref()),
            )),
        }
    }
}

impl StepContributor for UnionOf {
    fn name(&self) -> &'static str {
        "union"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let branches = Arc::clone(&self.branches);
        let message = self.message.clone();
        vec![RuntimeStep::on_success(move |value: Value| {
            let policy = FirstSuccess {
                first_failure: None,
                message: message.clone(),
            };
            run_branches(&branches, value, policy)
        })]
    }
}

/// A schema accepting whatever the first matching branch accepts.
pub fn union(branches: impl IntoIterator<Item = Schema>) -> Schema {
    Schema::new().with(&UnionOf::new(branches))
}
