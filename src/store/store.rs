use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace, warn};

use crate::action::Action;
use crate::error::{BoxError, StoreError};
use crate::reducer::Reducer;
use crate::selector::Selector;

use super::builder::{ReentrancyPolicy, StoreBuilder, StoreConfig};
use super::subscription::{Listener, Listeners, Subscription};

struct Inner<S, A> {
    state: RwLock<Arc<S>>,
    reducer: Box<dyn Reducer<S, A>>,
    listeners: Arc<Listeners>,
    depth: AtomicUsize,
    config: StoreConfig,
}

/// A unidirectional state container.
///
/// The store owns one state value, one reducer fixed at creation and an
/// ordered list of listeners. [`dispatch`](Store::dispatch) runs the
/// reducer and, when it returns a different `Arc`, replaces the state and
/// notifies every listener in registration order before returning.
///
/// Cloning a `Store` yields another handle to the same store.
///
/// A listener that captures a clone of its own store keeps that store, and
/// its state, alive for as long as the listener stays registered. Dropping
/// every outside handle does not free it; call
/// [`Subscription::unsubscribe`] to break the cycle.
///
/// Dispatch is synchronous and is not serialized across threads. Guard the
/// store with a lock if several threads dispatch.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use statehouse::{Store, TypedAction};
///
/// fn counter(state: Option<Arc<i64>>, action: &TypedAction) -> Arc<i64> {
///     let state = state.unwrap_or_else(|| Arc::new(0));
///     match action.kind.as_str() {
///         "INC" => Arc::new(*state + 1),
///         "DEC" => Arc::new(*state - 1),
///         _ => state,
///     }
/// }
///
/// let store = Store::create(counter).unwrap();
/// store.dispatch(TypedAction::new("INC")).unwrap();
/// store.dispatch(TypedAction::new("INC")).unwrap();
/// assert_eq!(*store.get_state(), 2);
/// ```
pub struct Store<S, A> {
    inner: Arc<Inner<S, A>>,
}

impl<S, A> Store<S, A>
where
    S: 'static,
    A: Action + 'static,
{
    /// Start configuring a store.
    pub fn builder() -> StoreBuilder<S, A> {
        StoreBuilder::new()
    }

    /// Create a store from `reducer` with default settings.
    ///
    /// The reducer is called once with no state and the INIT action; its
    /// answer becomes the initial state. A reducer error there fails
    /// creation.
    pub fn create<R>(reducer: R) -> Result<Self, StoreError>
    where
        R: Reducer<S, A> + 'static,
    {
        Self::builder().reducer(reducer).build()
    }

    /// Like [`create`](Store::create), but a missing reducer is reported as
    /// [`StoreError::Configuration`].
    pub fn try_create<R>(reducer: Option<R>) -> Result<Self, StoreError>
    where
        R: Reducer<S, A> + 'static,
    {
        match reducer {
            Some(reducer) => Self::create(reducer),
            None => Self::builder().build(),
        }
    }

    pub(crate) fn from_parts(
        reducer: Box<dyn Reducer<S, A>>,
        config: StoreConfig,
    ) -> Result<Self, StoreError> {
        let init = A::init();
        let label = config.name.as_deref().unwrap_or("store");
        let state = reducer.reduce(None, &init).map_err(|source| {
            warn!(store = label, error = %source, "reducer failed during init");
            StoreError::Reducer {
                action: init.kind().to_string(),
                source,
            }
        })?;
        debug!(store = label, reentrancy = ?config.reentrancy, "store created");

        Ok(Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                reducer,
                listeners: Arc::new(Listeners::new()),
                depth: AtomicUsize::new(0),
                config,
            }),
        })
    }

    /// The current state.
    ///
    /// Inside a listener this is already the post-dispatch state.
    pub fn get_state(&self) -> Arc<S> {
        Arc::clone(&self.inner.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Borrow the current state for the duration of `f`.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.get_state();
        f(&*state)
    }

    /// Run a memoized selector against the current state.
    pub fn select<T: Clone>(&self, selector: &Selector<S, T>) -> T {
        selector.select(&self.get_state())
    }

    /// Register a listener, called after every state change.
    ///
    /// Listeners take no arguments; call [`get_state`](Store::get_state)
    /// to read the new state. Registering the same closure twice registers
    /// it twice.
    ///
    /// The listener lives until [`Subscription::unsubscribe`] is called,
    /// even if the returned handle is dropped. A listener holding a clone
    /// of this store therefore keeps the store alive until it is removed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.register(Arc::new(move || {
            listener();
            Ok(())
        }))
    }

    /// Register a listener that may fail.
    ///
    /// An error stops the notification cycle and is returned from the
    /// `dispatch` that triggered it as [`StoreError::Listener`].
    pub fn try_subscribe<F, E>(&self, listener: F) -> Subscription
    where
        F: Fn() -> Result<(), E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.register(Arc::new(move || listener().map_err(Into::into)))
    }

    fn register(&self, listener: Listener) -> Subscription {
        let id = self.inner.listeners.push(listener);
        debug!(store = self.label(), listener = id, "listener added");
        Subscription::new(id, &self.inner.listeners)
    }

    /// Dispatch an action.
    ///
    /// Runs the reducer against the current state. If it returns the same
    /// `Arc` nothing else happens. Otherwise the state is replaced and all
    /// listeners are called, in registration order, before this returns.
    ///
    /// A reducer error leaves the state untouched and notifies nobody. A
    /// listener error skips the remaining listeners of this cycle; the new
    /// state stays in place.
    pub fn dispatch(&self, action: A) -> Result<(), StoreError> {
        let depth = self.inner.depth.fetch_add(1, Ordering::SeqCst);
        let _guard = DepthGuard(&self.inner.depth);

        if depth > 0 && self.inner.config.reentrancy == ReentrancyPolicy::Reject {
            warn!(
                store = self.label(),
                action = action.kind(),
                depth,
                "re-entrant dispatch rejected"
            );
            return Err(StoreError::ReentrantDispatch {
                action: action.kind().to_string(),
            });
        }

        trace!(store = self.label(), action = action.kind(), depth, "dispatching");

        let current = self.get_state();
        let next = self
            .inner
            .reducer
            .reduce(Some(Arc::clone(&current)), &action)
            .map_err(|source| {
                warn!(
                    store = self.label(),
                    action = action.kind(),
                    error = %source,
                    "reducer failed"
                );
                StoreError::Reducer {
                    action: action.kind().to_string(),
                    source,
                }
            })?;

        if Arc::ptr_eq(&current, &next) {
            debug!(store = self.label(), action = action.kind(), "state unchanged");
            return Ok(());
        }

        *self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = next;

        self.notify()
    }

    /// Notify all listeners of a state change.
    fn notify(&self) -> Result<(), StoreError> {
        for (index, listener) in self.inner.listeners.snapshot().into_iter().enumerate() {
            listener().map_err(|source| {
                warn!(store = self.label(), index, error = %source, "listener failed");
                StoreError::Listener { index, source }
            })?;
        }
        Ok(())
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Label given through [`StoreBuilder::name`], if any.
    pub fn name(&self) -> Option<&str> {
        self.inner.config.name.as_deref()
    }

    /// How this store treats a dispatch issued from inside a listener.
    pub fn reentrancy(&self) -> ReentrancyPolicy {
        self.inner.config.reentrancy
    }

    fn label(&self) -> &str {
        self.name().unwrap_or("store")
    }
}

/// Decrements the dispatch depth on every exit path, unwinding included.
struct DepthGuard<'a>(&'a AtomicUsize);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Store")
            .field("name", &self.inner.config.name)
            .field("state", &*state)
            .field("listeners", &self.inner.listeners.len())
            .finish()
    }
}
