//! Semigroup trait for issue accumulation
//!
//! Composers that fan out over many children collect every child's issues
//! instead of stopping at the first failure. The accumulation goes through an
//! associative `combine`, so issue order always follows the order in which the
//! children were declared.
//!
//! # Examples
//!
//! ```
//! use valchecker::Semigroup;
//!
//! let v1 = vec!["a:1"];
//! let v2 = vec!["b:1", "b:2"];
//! assert_eq!(v1.combine(v2), vec!["a:1", "b:1", "b:2"]);
//!
//! // `None` is the empty accumulator
//! let acc: Option<Vec<&str>> = None;
//! assert_eq!(acc.combine(Some(vec!["x"])), Some(vec!["x"]));
//! ```

/// A type with an associative binary operation
///
/// # Laws
///
/// ```text
/// a.combine(b).combine(c) == a.combine(b.combine(c))
/// ```
pub trait Semigroup: Sized {
    /// Combine this value with another value associatively
    fn combine(self, other: Self) -> Self;
}

impl<T> Semigroup for Vec<T> {
    #[inline]
    fn combine(mut self, other: Self) -> Self {
        self.extend(other);
        self
    }
}

// Lifts any semigroup into an accumulator that starts empty
impl<S: Semigroup> Semigroup for Option<S> {
    #[inline]
    fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Some(left), Some(right)) => Some(left.combine(right)),
            (Some(left), None) => Some(left),
            (None, right) => right,
        }
    }
}
