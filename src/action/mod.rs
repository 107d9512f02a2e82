//! Actions describe an intent to change state.
//!
//! The store treats actions as opaque: it hands them to the reducer and
//! only reads their type tag for diagnostics.

mod action;

pub use action::{Action, TypedAction, INIT_ACTION_TYPE};
