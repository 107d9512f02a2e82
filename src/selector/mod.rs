//! Memoized projections over store state.

mod selector;

pub use selector::Selector;
