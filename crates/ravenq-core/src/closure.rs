//! Callback combinator
//!
//! An [`Action`] is a shareable "invoke with arguments, return nothing"
//! capability. Arity is carried by the argument type: a single value for
//! arity 1, a tuple for arity 2 and 3. An absent callback is `None`.

use std::fmt;
use std::sync::Arc;

/// Shareable callback invoked with a borrowed argument value
pub struct Action<Args> {
    inner: Arc<dyn Fn(&Args) + Send + Sync>,
}

/// Callback taking one argument
pub type Action1<X> = Action<X>;

/// Callback taking two arguments, passed as a tuple
pub type Action2<X, Y> = Action<(X, Y)>;

/// Callback taking three arguments, passed as a tuple
pub type Action3<X, Y, Z> = Action<(X, Y, Z)>;

impl<Args> Action<Args> {
    /// Wrap a closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Invoke the callback
    pub fn apply(&self, args: &Args) {
        (self.inner)(args)
    }

    /// True when both handles refer to the same underlying callback
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }
}

impl<Args: 'static> Action<Args> {
    /// Callback whose invocation has no effect
    pub fn noop() -> Self {
        Self::new(|_| {})
    }
}

impl<Args> Clone for Action<Args> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<Args: 'static> Default for Action<Args> {
    fn default() -> Self {
        Self::noop()
    }
}

impl<Args> fmt::Debug for Action<Args> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").finish_non_exhaustive()
    }
}

/// No-op callback for any argument type
pub fn noop<Args: 'static>() -> Action<Args> {
    Action::noop()
}

/// No-op callback of arity 1
pub fn delegate1<X: 'static>() -> Action1<X> {
    Action::noop()
}

/// No-op callback of arity 2
pub fn delegate2<X: 'static, Y: 'static>() -> Action2<X, Y> {
    Action::noop()
}

/// No-op callback of arity 3
pub fn delegate3<X: 'static, Y: 'static, Z: 'static>() -> Action3<X, Y, Z> {
    Action::noop()
}

/// Compose two optional callbacks into one that runs `first`, then `second`.
///
/// If either side is absent the other is returned unchanged. A panic raised
/// by `first` unwinds straight to the caller and `second` does not run.
pub fn combine<Args: 'static>(
    first: Option<Action<Args>>,
    second: Option<Action<Args>>,
) -> Option<Action<Args>> {
    match (first, second) {
        (None, second) => second,
        (first, None) => first,
        (Some(first), Some(second)) => Some(Action::new(move |args: &Args| {
            first.apply(args);
            second.apply(args);
        })),
    }
}
