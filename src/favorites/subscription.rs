//! Callback registry owned by a single store instance.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::set::FavoritesSet;

type Listener = dyn Fn(&FavoritesSet) + Send + Sync;

#[derive(Default)]
struct Entries {
    next_id: u64,
    listeners: Vec<(u64, Arc<Listener>)>,
}

#[derive(Clone, Default)]
pub(crate) struct ListenerRegistry {
    entries: Arc<Mutex<Entries>>,
}

impl ListenerRegistry {
    pub(crate) fn register<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&FavoritesSet) + Send + Sync + 'static,
    {
        let mut entries = self.entries.lock();
        let id = entries.next_id;
        entries.next_id += 1;
        let listener: Arc<Listener> = Arc::new(callback);
        entries.listeners.push((id, listener));

        Subscription {
            id,
            entries: Arc::downgrade(&self.entries),
        }
    }

    /// Invoke every current listener in registration order.
    ///
    /// The lock is released before callbacks run, so a callback may
    /// subscribe or unsubscribe without deadlocking.
    pub(crate) fn notify(&self, names: &FavoritesSet) {
        let listeners: Vec<Arc<Listener>> = self
            .entries
            .lock()
            .listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(names);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().listeners.len()
    }
}

/// Handle returned by `FavoritesStore::subscribe`.
///
/// The callback stays registered until this handle is dropped or
/// [`Subscription::unsubscribe`] is called.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    entries: Weak<Mutex<Entries>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the work.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(entries) = self.entries.upgrade() {
            entries.lock().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
