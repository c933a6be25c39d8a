//! Schemas and pipelines
//!
//! A [`Schema`] couples a [`Pipeline`] (the ordered, immutable list of runtime
//! steps) with [`SchemaMeta`] (the names of the operations that built it).
//! Schemas are built by appending contributors with [`Schema::with`]; each call
//! returns a new schema and leaves the original untouched.
//!
//! Executing a schema seeds the pipeline with `success(input)` and runs it
//! through the sequential [`Pipe`]. The outcome is ready when every step
//! answered synchronously, and a single flat future otherwise.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use valchecker::prelude::*;
//!
//! let schema = string().to_trimmed().min(3);
//!
//! let result = schema.execute(json!("  hello ")).into_ready().unwrap();
//! assert_eq!(result, ExecutionResult::success(json!("hello")));
//!
//! let result = schema.execute(json!(" hi ")).into_ready().unwrap();
//! assert_eq!(result.issues().unwrap().codes(), vec!["min:expected_min"]);
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::pending::MaybePending;
use crate::pipe::Pipe;
use crate::result::ExecutionResult;
use crate::step::{RuntimeStep, StepContributor};

/// Names of the operations applied to a schema, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaMeta {
    operations: Vec<&'static str>,
}

impl SchemaMeta {
    /// Operation names in the order they were applied.
    pub fn operations(&self) -> &[&'static str] {
        &self.operations
    }

    /// The most recently applied operation.
    pub fn last_operation(&self) -> Option<&'static str> {
        self.operations.last().copied()
    }

    /// Check whether an operation was applied.
    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains(&name)
    }
}

/// The ordered, immutable list of runtime steps backing a schema.
#[derive(Debug, Clone)]
pub struct Pipeline {
    steps: Arc<[RuntimeStep]>,
    pipe: Pipe<ExecutionResult>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::new(Vec::new())
    }
}

impl Pipeline {
    /// Freeze a list of steps into a pipeline.
    pub fn new(steps: Vec<RuntimeStep>) -> Self {
        let pipe = Pipe::new(steps.iter().map(RuntimeStep::pipe_fn).collect());
        Pipeline {
            steps: steps.into(),
            pipe,
        }
    }

    /// The steps in execution order.
    pub fn steps(&self) -> &[RuntimeStep] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check whether the pipeline has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step against `input`.
    ///
    /// An empty pipeline returns `success(input)`.
    pub fn execute(&self, input: Value) -> MaybePending<ExecutionResult> {
        self.pipe.run(ExecutionResult::Success(input))
    }
}

/// A validation schema: metadata plus an immutable pipeline.
///
/// Cloning is cheap and clones share their steps, so a schema can be used as a
/// child of many composers and executed concurrently from many tasks.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    meta: SchemaMeta,
    pipeline: Pipeline,
}

impl Schema {
    /// A schema with no steps; it accepts every value unchanged.
    pub fn new() -> Self {
        Schema::default()
    }

    /// Append the steps of a contributor, returning the extended schema.
    pub fn with<C>(self, contributor: &C) -> Self
    where
        C: StepContributor + ?Sized,
    {
        let contributed = contributor.contribute(&self.meta);

        let mut steps = Vec::with_capacity(self.pipeline.len() + contributed.len());
        steps.extend_from_slice(self.pipeline.steps());
        steps.extend(contributed);

        let mut meta = self.meta;
        meta.operations.push(contributor.name());

        Schema {
            meta,
            pipeline: Pipeline::new(steps),
        }
    }

    /// Operation metadata.
    pub fn meta(&self) -> &SchemaMeta {
        &self.meta
    }

    /// The compiled pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Validate `input`.
    ///
    /// Never panics on behalf of user callbacks and never returns an error:
    /// every outcome is an [`ExecutionResult`], now or later.
    pub fn execute(&self, input: Value) -> MaybePending<ExecutionResult> {
        #[cfg(feature = "tracing")]
        tracing::trace!(operations = ?self.meta.operations(), "executing schema");

        self.pipeline.execute(input)
    }

    /// Validate `input`, awaiting any pending steps.
    pub async fn execute_async(&self, input: Value) -> ExecutionResult {
        self.execute(input).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{create_issue, IssueSpec};
    use crate::result::{failure, success};
    use serde_json::json;
    use std::sync::Mutex;

    struct Record {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl StepContributor for Record {
        fn name(&self) -> &'static str {
            self.name
        }

        fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
            let log = Arc::clone(&self.log);
            let name = self.name;
            vec![RuntimeStep::any(move |result: ExecutionResult| {
                log.lock().unwrap().push(name);
                result
            })]
        }
    }

    struct Reject;

    impl StepContributor for Reject {
        fn name(&self) -> &'static str {
            "reject"
        }

        fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
            vec![RuntimeStep::on_success(|_value: Value| {
                failure(create_issue(IssueSpec::new("reject:always", "Rejected.")))
            })]
        }
    }

    #[test]
    fn test_empty_schema_returns_input() {
        let schema = Schema::new();
        assert!(schema.pipeline().is_empty());
        assert_eq!(
            schema.execute(json!({"a": 1})).into_ready(),
            Some(success(json!({"a": 1})))
        );
    }

    #[test]
    fn test_steps_run_in_chain_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let schema = Schema::new()
            .with(&Record { name: "first", log: Arc::clone(&log) })
            .with(&Record { name: "second", log: Arc::clone(&log) });

        assert_eq!(schema.meta().operations(), &["first", "second"]);
        assert_eq!(schema.meta().last_operation(), Some("second"));
        schema.execute(json!(null));
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_with_leaves_original_untouched() {
        let base = Schema::new();
        let extended = base.clone().with(&Reject);

        assert_eq!(base.pipeline().len(), 0);
        assert_eq!(extended.pipeline().len(), 1);
        assert!(extended.meta().contains("reject"));
        assert!(base.execute(json!(1)).into_ready().unwrap().is_success());
        assert!(extended.execute(json!(1)).into_ready().unwrap().is_failure());
    }

    #[tokio::test]
    async fn test_concurrent_executions_are_independent() {
        let schema = Schema::new().with(&Reject);
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let schema = schema.clone();
                tokio::spawn(async move { schema.execute_async(json!(n)).await })
            })
            .collect();

        for handle in handles {
            let result = handle.await.unwrap();
            assert_eq!(result.issues().unwrap().codes(), vec!["reject:always"]);
        }
    }
}
