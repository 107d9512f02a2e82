use thiserror::Error;

/// Type-erased error returned by fallible reducers and listeners.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by [`Store`](crate::Store) creation and dispatch.
///
/// The store performs no local recovery. Every failure is handed back to
/// the immediate caller of `create`, `build` or `dispatch`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store was built without a reducer.
    #[error("reducer function is mandatory to create the store")]
    Configuration,

    /// The reducer failed. The state is left at its last valid value.
    #[error("reducer failed on action `{action}`: {source}")]
    Reducer {
        action: String,
        #[source]
        source: BoxError,
    },

    /// A listener failed. Listeners registered after it were skipped for
    /// this notification cycle.
    #[error("listener #{index} failed: {source}")]
    Listener {
        index: usize,
        #[source]
        source: BoxError,
    },

    /// A listener dispatched while the store was configured with
    /// [`ReentrancyPolicy::Reject`](crate::ReentrancyPolicy::Reject).
    #[error("re-entrant dispatch of `{action}` rejected")]
    ReentrantDispatch { action: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_message() {
        assert_eq!(
            StoreError::Configuration.to_string(),
            "reducer function is mandatory to create the store"
        );
    }

    #[test]
    fn reducer_error_keeps_source() {
        let err = StoreError::Reducer {
            action: "BOOM".to_string(),
            source: "kaboom".into(),
        };
        assert_eq!(err.to_string(), "reducer failed on action `BOOM`: kaboom");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("kaboom"));
    }
}
