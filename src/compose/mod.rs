//! Structural composers
//!
//! Composers validate a value by running other schemas against it or against
//! its parts:
//!
//! - [`array`], [`record`] and the object family fan out over child values,
//!   evaluate every child, and prefix child issue paths with the child's index
//!   or key;
//! - [`union`] and [`intersection`] run branch schemas against the whole value
//!   in declaration order;
//! - [`nullable`] and [`lazy`] wrap a single schema.
//!
//! Composers never run children concurrently. When a child suspends, the
//! remaining children are chained after it, so issue order always matches
//! declaration order.

mod array;
mod branches;
mod fan_out;
mod intersection;
mod lazy;
mod nullable;
mod object;
mod record;
mod union;

pub use array::{array, ArrayOf};
pub use intersection::{intersection, IntersectionOf};
pub use lazy::{lazy, Lazy};
pub use nullable::{nullable, Nullable};
pub use object::{loose_object, object, strict_object, Field, ObjectMode, ObjectOf};
pub use record::{record, RecordOf};
pub use union::{union, UnionOf};
