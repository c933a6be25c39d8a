//! Sequential pipe
//!
//! A [`Pipe`] runs an ordered list of unary functions against a seed. While
//! every function answers synchronously the pipe stays on the fast path and
//! returns [`MaybePending::Ready`]. The first function that returns a pending
//! value ends synchronous iteration: the remaining functions are chained after
//! it, in order, inside a single future.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use valchecker::pipe::{Pipe, PipeFn};
//! use valchecker::MaybePending;
//!
//! let add_one: PipeFn<i32> = Arc::new(|x: i32| MaybePending::ready(x + 1));
//! let double: PipeFn<i32> = Arc::new(|x: i32| MaybePending::pending(async move { x * 2 }));
//!
//! let pipe = Pipe::new(vec![add_one, double]);
//! # tokio_test::block_on(async {
//! assert_eq!(pipe.run(4).await, 10);
//! # });
//! ```

use std::fmt;
use std::sync::Arc;

use crate::pending::MaybePending;

/// A function stored in a [`Pipe`].
pub type PipeFn<T> = Arc<dyn Fn(T) -> MaybePending<T> + Send + Sync>;

/// An immutable, ordered list of functions executed one after another.
///
/// Cloning a pipe is cheap; clones share the same function list.
pub struct Pipe<T> {
    fns: Arc<[PipeFn<T>]>,
}

impl<T> Clone for Pipe<T> {
    fn clone(&self) -> Self {
        Pipe {
            fns: Arc::clone(&self.fns),
        }
    }
}

impl<T> fmt::Debug for Pipe<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipe").field("len", &self.fns.len()).finish()
    }
}

impl<T> Pipe<T> {
    /// Create a pipe from functions in execution order.
    pub fn new(fns: Vec<PipeFn<T>>) -> Self {
        Pipe { fns: fns.into() }
    }

    /// Number of functions in the pipe.
    pub fn len(&self) -> usize {
        self.fns.len()
    }

    /// Check if the pipe has no functions.
    pub fn is_empty(&self) -> bool {
        self.fns.is_empty()
    }

    /// The functions in execution order.
    pub fn fns(&self) -> &[PipeFn<T>] {
        &self.fns
    }
}

impl<T: Send + 'static> Pipe<T> {
    /// Run every function in order, starting from `seed`.
    ///
    /// Each function is invoked exactly once and never before the previous
    /// function's output is available. An empty pipe returns the seed.
    pub fn run(&self, seed: T) -> MaybePending<T> {
        let mut current = seed;
        for (index, f) in self.fns.iter().enumerate() {
            match f(current) {
                MaybePending::Ready(next) => current = next,
                MaybePending::Pending(fut) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        step = index,
                        remaining = self.fns.len() - index - 1,
                        "pipe suspended"
                    );

                    let fns = Arc::clone(&self.fns);
                    return MaybePending::pending(async move {
                        let mut current = fut.await;
                        for f in fns.iter().skip(index + 1) {
                            current = f(current).await;
                        }
                        current
                    });
                }
            }
        }
        MaybePending::Ready(current)
    }
}
