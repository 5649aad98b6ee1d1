//! Persisted favorites with live fan-out to every consumer.
//!
//! Mutations update memory first, then persist, then broadcast. Persistence
//! is at-least-once and best-effort ordered: a failed write is logged and the
//! in-memory set stays authoritative for the rest of the process.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{watch, Mutex, OnceCell};

use super::set::FavoritesSet;
use super::subscription::{ListenerRegistry, Subscription};
use crate::cache::{CacheKey, LocalCache};

#[derive(Debug, Default)]
struct FavoritesState {
    names: FavoritesSet,
    ready: bool,
}

struct Inner {
    cache: LocalCache,
    state: RwLock<FavoritesState>,
    /// Serializes read-modify-write cycles across clones.
    mutation: Mutex<()>,
    initial_load: OnceCell<()>,
    watch_tx: watch::Sender<FavoritesSet>,
    listeners: ListenerRegistry,
}

/// Shared handle to the favorites set. Clones observe the same state.
#[derive(Clone)]
pub struct FavoritesStore {
    inner: Arc<Inner>,
}

impl FavoritesStore {
    /// Create a store that has not read persisted state yet.
    pub fn new(cache: LocalCache) -> Self {
        let (watch_tx, _) = watch::channel(FavoritesSet::new());
        Self {
            inner: Arc::new(Inner {
                cache,
                state: RwLock::new(FavoritesState::default()),
                mutation: Mutex::new(()),
                initial_load: OnceCell::new(),
                watch_tx,
                listeners: ListenerRegistry::default(),
            }),
        }
    }

    /// Create a store and complete the initial load.
    pub async fn open(cache: LocalCache) -> Self {
        let store = Self::new(cache);
        store.load().await;
        store
    }

    /// Load persisted favorites once. Later calls return immediately.
    ///
    /// Subscribers are notified with the loaded set.
    pub async fn load(&self) {
        self.inner
            .initial_load
            .get_or_init(|| async {
                let names: FavoritesSet = self
                    .inner
                    .cache
                    .read_as(CacheKey::Favorites)
                    .await
                    .unwrap_or_default();

                tracing::debug!(count = names.len(), "Favorites loaded");

                {
                    let mut state = self.inner.state.write();
                    state.names = names.clone();
                    state.ready = true;
                }
                self.publish(&names);
            })
            .await;
    }

    /// True once the initial load has completed.
    pub fn is_ready(&self) -> bool {
        self.inner.state.read().ready
    }

    pub fn names(&self) -> FavoritesSet {
        self.inner.state.read().names.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.state.read().names.contains(name)
    }

    /// Add `name`. Returns `true` if it was not already a favorite.
    pub async fn add(&self, name: &str) -> bool {
        let name = name.to_string();
        self.mutate(move |names| names.insert(name)).await
    }

    /// Remove `name`. Returns `true` if it was a favorite.
    pub async fn remove(&self, name: &str) -> bool {
        self.mutate(|names| names.remove(name)).await
    }

    /// Flip membership of `name`. Returns whether it is a favorite afterwards.
    pub async fn toggle(&self, name: &str) -> bool {
        self.mutate(|names| {
            if names.remove(name) {
                false
            } else {
                names.insert(name);
                true
            }
        })
        .await
    }

    /// Live view of the set.
    ///
    /// The receiver starts at the current state; intermediate states between
    /// two reads may be skipped.
    pub fn watch(&self) -> watch::Receiver<FavoritesSet> {
        self.inner.watch_tx.subscribe()
    }

    /// Register a callback invoked synchronously after every change.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&FavoritesSet) + Send + Sync + 'static,
    {
        self.inner.listeners.register(callback)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.listeners.len()
    }

    async fn mutate<R>(&self, op: impl FnOnce(&mut FavoritesSet) -> R) -> R {
        self.load().await;
        let _serialized = self.inner.mutation.lock().await;

        let (result, next) = {
            let mut state = self.inner.state.write();
            let result = op(&mut state.names);
            (result, state.names.clone())
        };

        self.inner.cache.write(CacheKey::Favorites, &next).await;
        self.publish(&next);
        result
    }

    fn publish(&self, names: &FavoritesSet) {
        self.inner.watch_tx.send_replace(names.clone());
        self.inner.listeners.notify(names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex as SyncMutex;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_not_ready_until_loaded() {
        let temp_dir = TempDir::new().unwrap();
        let store = FavoritesStore::new(LocalCache::new(temp_dir.path()));
        assert!(!store.is_ready());

        store.load().await;
        assert!(store.is_ready());
        assert!(store.names().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let temp_dir = TempDir::new().unwrap();
        let store = FavoritesStore::open(LocalCache::new(temp_dir.path())).await;
        store.add("bulbasaur").await;
        let before = store.names();

        assert!(store.toggle("pikachu").await);
        assert!(!store.toggle("pikachu").await);

        assert_eq!(store.names(), before);
    }

    #[tokio::test]
    async fn test_add_persists_immediately() {
        let temp_dir = TempDir::new().unwrap();
        let cache = LocalCache::new(temp_dir.path());
        let store = FavoritesStore::open(cache.clone()).await;

        store.add("eevee").await;
        store.add("eevee").await;

        let persisted: Vec<String> = cache.read_as(CacheKey::Favorites).await.unwrap();
        assert_eq!(persisted, vec!["eevee"]);
    }

    #[tokio::test]
    async fn test_early_mutation_waits_for_persisted_state() {
        let temp_dir = TempDir::new().unwrap();
        let cache = LocalCache::new(temp_dir.path());
        cache.write(CacheKey::Favorites, &vec!["mew"]).await;

        let store = FavoritesStore::new(cache);
        store.add("mewtwo").await;

        assert_eq!(store.names().to_vec(), vec!["mew", "mewtwo"]);
    }

    #[tokio::test]
    async fn test_clones_share_state_and_callbacks() {
        let temp_dir = TempDir::new().unwrap();
        let store = FavoritesStore::open(LocalCache::new(temp_dir.path())).await;
        let other = store.clone();

        let seen = Arc::new(SyncMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = other.subscribe(move |names| sink.lock().push(names.len()));

        store.add("a").await;
        store.add("b").await;
        store.remove("a").await;

        assert!(other.contains("b"));
        assert_eq!(*seen.lock(), vec![1, 2, 1]);
    }

    #[tokio::test]
    async fn test_late_watcher_sees_only_latest() {
        let temp_dir = TempDir::new().unwrap();
        let store = FavoritesStore::open(LocalCache::new(temp_dir.path())).await;
        store.add("a").await;
        store.add("b").await;

        let rx = store.watch();
        assert!(!rx.has_changed().unwrap());
        assert_eq!(rx.borrow().to_vec(), vec!["a", "b"]);
    }
}
