use std::marker::PhantomData;

use crate::action::Action;
use crate::error::StoreError;
use crate::reducer::Reducer;

use super::Store;

/// What happens when a listener dispatches while a dispatch is running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReentrancyPolicy {
    /// Run the nested dispatch synchronously, to completion, before the
    /// outer notification cycle resumes. Nesting depth is unbounded.
    #[default]
    Allow,
    /// Fail the nested dispatch with [`StoreError::ReentrantDispatch`]
    /// without running the reducer.
    Reject,
}

/// Settings fixed for the lifetime of a store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Label attached to log events.
    pub name: Option<String>,
    /// Handling of dispatches issued from inside a listener.
    pub reentrancy: ReentrancyPolicy,
}

/// Builder for [`Store`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use statehouse::{ReentrancyPolicy, Store, StoreError, TypedAction};
///
/// fn counter(state: Option<Arc<i64>>, _action: &TypedAction) -> Arc<i64> {
///     state.unwrap_or_else(|| Arc::new(0))
/// }
///
/// let store = Store::builder()
///     .name("counter")
///     .reentrancy(ReentrancyPolicy::Reject)
///     .reducer(counter)
///     .build()
///     .unwrap();
/// assert_eq!(*store.get_state(), 0);
///
/// let missing = Store::<i64, TypedAction>::builder().build();
/// assert!(matches!(missing, Err(StoreError::Configuration)));
/// ```
pub struct StoreBuilder<S, A> {
    reducer: Option<Box<dyn Reducer<S, A>>>,
    config: StoreConfig,
    _marker: PhantomData<fn(&A) -> S>,
}

impl<S, A> StoreBuilder<S, A>
where
    S: 'static,
    A: Action + 'static,
{
    pub(crate) fn new() -> Self {
        Self {
            reducer: None,
            config: StoreConfig::default(),
            _marker: PhantomData,
        }
    }

    /// Set the reducer. The last call wins.
    pub fn reducer<R>(mut self, reducer: R) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        self.reducer = Some(Box::new(reducer));
        self
    }

    /// Label the store in log events.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    /// Choose how a dispatch from inside a listener is handled.
    pub fn reentrancy(mut self, policy: ReentrancyPolicy) -> Self {
        self.config.reentrancy = policy;
        self
    }

    /// Replace all settings at once.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Create the store, running the reducer once with the INIT action.
    pub fn build(self) -> Result<Store<S, A>, StoreError> {
        let reducer = self.reducer.ok_or(StoreError::Configuration)?;
        Store::from_parts(reducer, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypedAction;
    use std::sync::Arc;

    fn unit(state: Option<Arc<()>>, _action: &TypedAction) -> Arc<()> {
        state.unwrap_or_default()
    }

    #[test]
    fn defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.name, None);
        assert_eq!(config.reentrancy, ReentrancyPolicy::Allow);
    }

    #[test]
    fn config_is_carried_into_store() {
        let store = Store::builder()
            .config(StoreConfig {
                name: Some("unit".to_string()),
                reentrancy: ReentrancyPolicy::Reject,
            })
            .reducer(unit)
            .build()
            .unwrap();

        assert_eq!(store.name(), Some("unit"));
        assert_eq!(store.reentrancy(), ReentrancyPolicy::Reject);
    }

    #[test]
    fn missing_reducer_is_rejected() {
        let result = StoreBuilder::<(), TypedAction>::new().name("empty").build();
        assert!(matches!(result, Err(StoreError::Configuration)));
    }
}
