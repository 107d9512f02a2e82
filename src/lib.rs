//! # Statehouse
//!
//! A minimal unidirectional state store for Rust.
//!
//! A [`Store`] holds one immutable state value behind an `Arc`. Changes go
//! through [`Store::dispatch`], which hands the current state and an
//! [`Action`] to a pure [`Reducer`]. When the reducer returns a different
//! `Arc` the state is replaced and every listener registered with
//! [`Store::subscribe`] runs, in order, before `dispatch` returns. Returning
//! the same `Arc` means "nothing changed" and notifies nobody; the check is
//! by identity, never by value.
//!
//! Everything is synchronous. There is no middleware, persistence or undo.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use statehouse::{Store, TypedAction};
//!
//! fn counter(state: Option<Arc<i64>>, action: &TypedAction) -> Arc<i64> {
//!     let state = state.unwrap_or_else(|| Arc::new(0));
//!     match action.kind.as_str() {
//!         "INC" => Arc::new(*state + 1),
//!         _ => state,
//!     }
//! }
//!
//! let store = Store::create(counter).unwrap();
//! let calls = Arc::new(AtomicUsize::new(0));
//! let calls_clone = calls.clone();
//! store.subscribe(move || {
//!     calls_clone.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! store.dispatch(TypedAction::new("INC")).unwrap();
//! store.dispatch(TypedAction::new("UNKNOWN")).unwrap();
//!
//! assert_eq!(*store.get_state(), 1);
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! ```

pub mod action;
pub mod error;
pub mod reducer;
pub mod selector;
pub mod store;

// Re-export main types for convenience
pub use action::{Action, TypedAction, INIT_ACTION_TYPE};
pub use error::{BoxError, StoreError};
pub use reducer::{fallible, Fallible, Reducer};
pub use selector::Selector;
pub use store::{ReentrancyPolicy, Store, StoreBuilder, StoreConfig, Subscription};
