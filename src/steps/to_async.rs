//! Forced suspension

use crate::pending::MaybePending;
use crate::result::ExecutionResult;
use crate::schema::SchemaMeta;
use crate::step::{RuntimeStep, StepContributor};

/// Turns the current result, success or failure, into a pending one.
///
/// Every later step then runs after the suspension point.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToAsync;

impl StepContributor for ToAsync {
    fn name(&self) -> &'static str {
        "toAsync"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        vec![RuntimeStep::any(|result: ExecutionResult| {
            MaybePending::pending(async move { result })
        })]
    }
}
