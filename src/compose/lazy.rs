//! Deferred schemas for recursive structures
//!
//! A lazy node holds a factory instead of a schema. The factory is called on
//! the first execution and its schema is cached for every later execution, so
//! a schema may refer to itself without recursing at build time. A factory
//! that panics fails the execution with `lazy:failed` and is retried on the
//! next one.
//!
//! ```
//! use std::sync::OnceLock;
//!
//! use serde_json::json;
//! use valchecker::prelude::*;
//!
//! fn tree() -> Schema {
//!     static TREE: OnceLock<Schema> = OnceLock::new();
//!     TREE.get_or_init(|| {
//!         object([
//!             ("label", string()),
//!             ("children", array(lazy(tree))),
//!         ])
//!     })
//!     .clone()
//! }
//!
//! let input = json!({
//!     "label": "root",
//!     "children": [{"label": "leaf", "children": [{"label": 3, "children": []}]}]
//! });
//! let result = tree().execute(input).into_ready().unwrap();
//! let issue = result.issues().unwrap().first();
//! assert_eq!(issue.path_string(), ".children[0].children[0].label");
//! ```

use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::guard::{catch_sync, failed_issue};
use crate::pending::MaybePending;
use crate::result::failure;
use crate::schema::{Schema, SchemaMeta};
use crate::step::{RuntimeStep, StepContributor};

struct LazyNode {
    factory: Box<dyn Fn() -> Schema + Send + Sync>,
    resolved: OnceLock<Schema>,
}

impl LazyNode {
    // A panicking factory leaves the cell empty.
    fn schema(&self) -> Result<&Schema, String> {
        catch_sync(|| {
            self.resolved.get_or_init(|| {
                #[cfg(feature = "tracing")]
                tracing::debug!("resolving lazy schema");

                (self.factory)()
            })
        })
    }
}

/// A schema resolved from a factory on first use.
#[derive(Clone)]
pub struct Lazy {
    node: Arc<LazyNode>,
}

impl std::fmt::Debug for Lazy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lazy")
            .field("factory", &"<function>")
            .field("resolved", &self.node.resolved.get().is_some())
            .finish()
    }
}

impl Lazy {
    /// Defer building the schema to `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Schema + Send + Sync + 'static,
    {
        Lazy {
            node: Arc::new(LazyNode {
                factory: Box::new(factory),
                resolved: OnceLock::new(),
            }),
        }
    }

    /// Check whether the factory has been called.
    pub fn is_resolved(&self) -> bool {
        self.node.resolved.get().is_some()
    }
}

impl StepContributor for Lazy {
    fn name(&self) -> &'static str {
        "lazy"
    }

    fn contribute(&self, _meta: &SchemaMeta) -> Vec<RuntimeStep> {
        let node = Arc::clone(&self.node);
        vec![RuntimeStep::on_success(move |value: Value| match node.schema() {
            Ok(schema) => schema.execute(value),
            Err(error) => MaybePending::Ready(failure(failed_issue(
                "lazy",
                "Lazy schema failed",
                Some(value),
                error,
                None,
            ))),
        })]
    }
}

/// A schema built by `factory` when first executed.
pub fn lazy<F>(factory: F) -> Schema
where
    F: Fn() -> Schema + Send + Sync + 'static,
{
    Schema::new().with(&Lazy::new(factory))
}
