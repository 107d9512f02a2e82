use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::error::BoxError;

pub(crate) type Listener = Arc<dyn Fn() -> Result<(), BoxError> + Send + Sync>;

/// Ordered listener registry shared by a store and its subscriptions.
pub(crate) struct Listeners {
    next_id: AtomicU64,
    entries: RwLock<Vec<(u64, Listener)>>,
}

impl Listeners {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn push(&self, listener: Listener) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: u64) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.iter().position(|(entry_id, _)| *entry_id == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Listeners registered right now, in registration order.
    ///
    /// Taken at the start of every notification cycle so listeners may
    /// subscribe or unsubscribe without holding the lock.
    pub(crate) fn snapshot(&self) -> Vec<Listener> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Handle to a single listener registration.
///
/// Dropping the handle leaves the listener registered for the lifetime of
/// the store. Call [`unsubscribe`](Subscription::unsubscribe) to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Subscription {
    pub(crate) fn new(id: u64, listeners: &Arc<Listeners>) -> Self {
        Self {
            id,
            listeners: Arc::downgrade(listeners),
        }
    }

    /// Remove this registration from the store.
    ///
    /// Returns `false` if it was already removed or the store is gone.
    /// A removal during a notification cycle takes effect from the next one.
    pub fn unsubscribe(&self) -> bool {
        let removed = self
            .listeners
            .upgrade()
            .is_some_and(|listeners| listeners.remove(self.id));
        if removed {
            tracing::debug!(listener = self.id, "listener removed");
        }
        removed
    }
}
