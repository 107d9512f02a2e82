//! Pure state transitions.
//!
//! A reducer maps the current state and an action to the next state.
//! Returning the same `Arc` signals that nothing changed.

mod reducer;

pub use reducer::{fallible, Fallible, Reducer};
