//! The store: state, reducer and listeners behind one handle.
//!
//! A store is created from a reducer, read with `get_state`, observed with
//! `subscribe` and driven with `dispatch`. Every store is an independent
//! instance; nothing is kept in globals.

mod builder;
mod store;
mod subscription;

pub use builder::{ReentrancyPolicy, StoreBuilder, StoreConfig};
pub use store::Store;
pub use subscription::Subscription;
