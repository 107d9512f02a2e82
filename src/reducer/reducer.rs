use std::sync::Arc;

use crate::error::BoxError;

/// A pure state transition `(state, action) -> state`.
///
/// `state` is `None` only for the INIT call made when the store is created;
/// every later call receives the current state. A reducer must be total:
/// for actions it does not handle it returns the `Arc` it was given, which
/// the store treats as "no change".
///
/// Any `Fn(Option<Arc<S>>, &A) -> Arc<S>` is a reducer. Wrap a closure that
/// can fail with [`fallible`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use statehouse::{Reducer, TypedAction};
///
/// fn counter(state: Option<Arc<i64>>, action: &TypedAction) -> Arc<i64> {
///     let state = state.unwrap_or_else(|| Arc::new(0));
///     match action.kind.as_str() {
///         "INC" => Arc::new(*state + 1),
///         _ => state,
///     }
/// }
///
/// let next = counter.reduce(Some(Arc::new(1)), &TypedAction::new("INC")).unwrap();
/// assert_eq!(*next, 2);
/// ```
pub trait Reducer<S, A>: Send + Sync {
    fn reduce(&self, state: Option<Arc<S>>, action: &A) -> Result<Arc<S>, BoxError>;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(Option<Arc<S>>, &A) -> Arc<S> + Send + Sync,
{
    fn reduce(&self, state: Option<Arc<S>>, action: &A) -> Result<Arc<S>, BoxError> {
        Ok(self(state, action))
    }
}

/// A reducer built from a closure returning `Result`. See [`fallible`].
pub struct Fallible<F>(F);

/// Wrap a closure that may fail into a [`Reducer`].
///
/// An `Err` aborts the dispatch: the store keeps its previous state and no
/// listener is notified.
pub fn fallible<F>(f: F) -> Fallible<F> {
    Fallible(f)
}

impl<S, A, F, E> Reducer<S, A> for Fallible<F>
where
    F: Fn(Option<Arc<S>>, &A) -> Result<Arc<S>, E> + Send + Sync,
    E: Into<BoxError>,
{
    fn reduce(&self, state: Option<Arc<S>>, action: &A) -> Result<Arc<S>, BoxError> {
        (self.0)(state, action).map_err(Into::into)
    }
}
