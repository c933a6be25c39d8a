//! Ready-or-pending values
//!
//! Every step, composer and schema in this crate produces a [`MaybePending`]:
//! either the value is already available (`Ready`) or it will be produced by a
//! boxed future (`Pending`). Fully synchronous pipelines never allocate a
//! future; asynchrony only appears once some step actually suspends.
//!
//! # Examples
//!
//! ```
//! use valchecker::MaybePending;
//!
//! let ready = MaybePending::ready(21).map(|x| x * 2);
//! assert_eq!(ready.into_ready(), Some(42));
//!
//! # tokio_test::block_on(async {
//! let pending = MaybePending::pending(async { 21 }).map(|x| x * 2);
//! assert!(pending.is_pending());
//! assert_eq!(pending.await, 42);
//! # });
//! ```

use std::fmt;
use std::future::{Future, IntoFuture};

use futures::future::{self, BoxFuture, FutureExt};

/// A value that is either available now or produced later by a future.
pub enum MaybePending<T> {
    /// The value is available synchronously
    Ready(T),
    /// The value will be produced by a `Send + 'static` future
    Pending(BoxFuture<'static, T>),
}

impl<T> MaybePending<T> {
    /// Wrap an already available value.
    #[inline]
    pub fn ready(value: T) -> Self {
        MaybePending::Ready(value)
    }

    /// Check whether this value is still pending.
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, MaybePending::Pending(_))
    }

    /// Check whether this value is already available.
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, MaybePending::Ready(_))
    }

    /// Take the value if it is available synchronously.
    ///
    /// Returns `None` for a pending value; the future is dropped.
    ///
    /// ```
    /// use valchecker::MaybePending;
    ///
    /// assert_eq!(MaybePending::ready(1).into_ready(), Some(1));
    /// assert_eq!(MaybePending::pending(async { 1 }).into_ready(), None);
    /// ```
    pub fn into_ready(self) -> Option<T> {
        match self {
            MaybePending::Ready(value) => Some(value),
            MaybePending::Pending(_) => None,
        }
    }
}

impl<T: Send + 'static> MaybePending<T> {
    /// Box a future as a pending value.
    pub fn pending<F>(fut: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        MaybePending::Pending(fut.boxed())
    }

    /// Transform the value once it is available.
    ///
    /// A ready value is transformed immediately; a pending one stays pending.
    pub fn map<U, F>(self, f: F) -> MaybePending<U>
    where
        F: FnOnce(T) -> U + Send + 'static,
        U: Send + 'static,
    {
        match self {
            MaybePending::Ready(value) => MaybePending::Ready(f(value)),
            MaybePending::Pending(fut) => MaybePending::Pending(fut.map(f).boxed()),
        }
    }

    /// Chain a computation that may itself suspend.
    ///
    /// The result is flattened: a pending value never resolves to another
    /// pending value.
    pub fn and_then<U, F>(self, f: F) -> MaybePending<U>
    where
        F: FnOnce(T) -> MaybePending<U> + Send + 'static,
        U: Send + 'static,
    {
        match self {
            MaybePending::Ready(value) => f(value),
            MaybePending::Pending(fut) => MaybePending::pending(async move { f(fut.await).await }),
        }
    }

    /// Convert into a boxed future regardless of readiness.
    pub fn boxed(self) -> BoxFuture<'static, T> {
        match self {
            MaybePending::Ready(value) => future::ready(value).boxed(),
            MaybePending::Pending(fut) => fut,
        }
    }
}

impl<T: Send + 'static> IntoFuture for MaybePending<T> {
    type Output = T;
    type IntoFuture = BoxFuture<'static, T>;

    fn into_future(self) -> Self::IntoFuture {
        self.boxed()
    }
}

impl<T: fmt::Debug> fmt::Debug for MaybePending<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaybePending::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            MaybePending::Pending(_) => f.debug_tuple("Pending").field(&"<future>").finish(),
        }
    }
}
