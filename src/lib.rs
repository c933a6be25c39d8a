//! # Valchecker
//!
//! Composable validation pipelines for untrusted JSON values.
//!
//! A [`Schema`] is an immutable, ordered list of runtime steps: type guards,
//! bounds, string predicates, transforms, recoveries and structural composers
//! that run other schemas over the parts of a value. Executing a schema yields
//! exactly one [`ExecutionResult`]: the validated (possibly transformed) value,
//! or every issue found along the way with the path to the offending value.
//!
//! Execution is synchronous until a step suspends. The outcome is a
//! [`MaybePending`]: `Ready` when every step answered at once, or a single
//! future when one did not. Once a step suspends, the remaining steps run after
//! it, in order.
//!
//! ## Quick Example
//!
//! ```rust
//! use serde_json::json;
//! use valchecker::prelude::*;
//!
//! let signup = object([
//!     ("email", Field::required(string().to_trimmed().to_lowercase().ends_with(".org"))),
//!     ("age", Field::optional(integer().min(18))),
//!     ("tags", Field::optional(array(string().min(1)))),
//! ]);
//!
//! let result = signup
//!     .execute(json!({"email": " Ada@Example.ORG ", "age": 36}))
//!     .into_ready()
//!     .unwrap();
//! assert_eq!(result, ExecutionResult::success(json!({"email": "ada@example.org", "age": 36})));
//!
//! let result = signup
//!     .execute(json!({"email": "ada@example.com", "tags": ["", "x", 1]}))
//!     .into_ready()
//!     .unwrap();
//! for issue in result.issues().unwrap().iter() {
//!     println!("{}", issue);
//! }
//! assert_eq!(result.issues().unwrap().len(), 3);
//! ```
//!
//! Async steps make the outcome pending; `.await` it (or call
//! [`Schema::execute_async`]):
//!
//! ```rust
//! use serde_json::{json, Value};
//! use valchecker::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let schema = string().check_async(|value: Value| async move {
//!     value.as_str() != Some("taken")
//! });
//!
//! assert!(schema.execute(json!("free")).is_pending());
//! assert!(schema.execute(json!("free")).await.is_success());
//! assert!(schema.execute_async(json!("taken")).await.is_failure());
//! # });
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod compose;
pub mod error;
pub mod ext;
mod guard;
pub mod issue;
pub mod pending;
pub mod pipe;
pub mod registry;
pub mod result;
pub mod schema;
pub mod semigroup;
pub mod step;
pub mod steps;
pub mod testing;

// Re-exports
pub use error::{BoxError, RegistryError};
pub use ext::SchemaExt;
pub use issue::{ExecutionIssue, Issues, MessageHandler, PathSegment};
pub use pending::MaybePending;
pub use registry::{PluginRegistry, SchemaBuilder};
pub use result::ExecutionResult;
pub use schema::{Pipeline, Schema, SchemaMeta};
pub use semigroup::Semigroup;
pub use step::{RuntimeStep, StepContributor, StepKind};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::compose::{
        array, intersection, lazy, loose_object, nullable, object, record, strict_object, union,
        Field, ObjectMode,
    };
    pub use crate::ext::SchemaExt;
    pub use crate::issue::{message, ExecutionIssue, Issues, PathSegment};
    pub use crate::pending::MaybePending;
    pub use crate::result::ExecutionResult;
    pub use crate::schema::Schema;
    pub use crate::steps::{any, boolean, integer, literal, never, null, number, string};
}
