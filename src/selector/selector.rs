use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

type Projector<S, T> = Arc<dyn Fn(&Arc<S>) -> T + Send + Sync>;

/// A projection of store state, memoized on the identity of the state.
///
/// Selecting from the same `Arc` twice returns the cached value; a
/// different `Arc` recomputes. The cache only holds a weak reference, so
/// old states are never kept alive by a selector.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use statehouse::Selector;
///
/// let total = Selector::new(|items: &Vec<u32>| items.iter().sum::<u32>());
/// let doubled = total.map(|sum| sum * 2);
///
/// let state = Arc::new(vec![1, 2, 3]);
/// assert_eq!(total.select(&state), 6);
/// assert_eq!(doubled.select(&state), 12);
/// assert_eq!(total.recomputations(), 1);
/// ```
pub struct Selector<S, T> {
    project: Projector<S, T>,
    cached: Arc<RwLock<Option<(Weak<S>, T)>>>,
    recomputations: Arc<AtomicUsize>,
}

impl<S: 'static, T: Clone + 'static> Selector<S, T> {
    /// Create a selector from a projection of the state.
    pub fn new<F>(project: F) -> Self
    where
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        Self::from_projector(Arc::new(move |state: &Arc<S>| project(&**state)))
    }

    fn from_projector(project: Projector<S, T>) -> Self {
        Self {
            project,
            cached: Arc::new(RwLock::new(None)),
            recomputations: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl<S, T: Clone> Selector<S, T> {
    /// Get the projected value, recomputing only for a new state.
    pub fn select(&self, state: &Arc<S>) -> T {
        {
            let cached = self.cached.read().unwrap_or_else(PoisonError::into_inner);
            if let Some((source, value)) = cached.as_ref() {
                if std::ptr::eq(source.as_ptr(), Arc::as_ptr(state)) {
                    return value.clone();
                }
            }
        }

        let value = (self.project)(state);
        self.recomputations.fetch_add(1, Ordering::SeqCst);
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) =
            Some((Arc::downgrade(state), value.clone()));
        value
    }

    /// How many times the projection has run.
    pub fn recomputations(&self) -> usize {
        self.recomputations.load(Ordering::SeqCst)
    }

    /// Drop the cached value.
    pub fn reset(&self) {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<S, T> Selector<S, T>
where
    S: Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Derive a selector that projects this selector's output further.
    pub fn map<U, F>(&self, f: F) -> Selector<S, U>
    where
        U: Clone + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let parent = self.clone();
        Selector::from_projector(Arc::new(move |state: &Arc<S>| f(&parent.select(state))))
    }
}

impl<S, T> Clone for Selector<S, T> {
    fn clone(&self) -> Self {
        Self {
            project: Arc::clone(&self.project),
            cached: Arc::clone(&self.cached),
            recomputations: Arc::clone(&self.recomputations),
        }
    }
}
