//! Thread-safe handle over a [`TodoStore`].
//!
//! `SharedStore` is cheap to clone; every clone refers to the same store.
//! Besides running the store's own callback observers it publishes a
//! [`StoreEvent`] on a broadcast channel after each successful mutation, so
//! async consumers can follow changes without registering a callback.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;

use crate::error::Result;
use crate::models::TodoItem;
use crate::observer::Subscription;
use crate::store::TodoStore;

const DEFAULT_EVENT_CAPACITY: usize = 64;

/// A change that has been applied to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreEvent {
    Added(TodoItem),
    Updated(TodoItem),
    Deleted(TodoItem),
    Cleared { removed: usize },
}

#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<TodoStore>>,
    events: broadcast::Sender<StoreEvent>,
}

impl Default for SharedStore {
    fn default() -> Self {
        Self::new(TodoStore::new())
    }
}

impl SharedStore {
    pub fn new(store: TodoStore) -> Self {
        Self::with_event_capacity(store, DEFAULT_EVENT_CAPACITY)
    }

    /// Use a larger buffer when receivers may fall behind. A capacity of
    /// zero is raised to one.
    pub fn with_event_capacity(store: TodoStore, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(Mutex::new(store)),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // Events are sent while the lock is still held so that their order on
    // the channel matches the order the mutations were applied in.

    pub fn add(&self, title: impl Into<String>, description: impl Into<String>) -> TodoItem {
        let mut store = self.lock();
        let item = store.add(title, description);
        self.publish(StoreEvent::Added(item.clone()));
        item
    }

    pub fn add_checked(&self, title: &str, description: &str) -> Result<TodoItem> {
        let mut store = self.lock();
        let item = store.add_checked(title, description)?;
        self.publish(StoreEvent::Added(item.clone()));
        Ok(item)
    }

    pub fn update(
        &self,
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> bool {
        let mut store = self.lock();
        let updated = store.update(id, title, description);
        self.publish_updated(&store, id, updated)
    }

    pub fn update_checked(&self, id: i64, title: &str, description: &str) -> Result<bool> {
        let mut store = self.lock();
        let updated = store.update_checked(id, title, description)?;
        Ok(self.publish_updated(&store, id, updated))
    }

    pub fn delete(&self, item: &TodoItem) -> bool {
        let mut store = self.lock();
        let deleted = store.delete(item);
        if deleted {
            self.publish(StoreEvent::Deleted(item.clone()));
        }
        deleted
    }

    pub fn delete_by_id(&self, id: i64) -> bool {
        let mut store = self.lock();
        match store.find_by_id(id) {
            Some(item) if store.delete(&item) => {
                self.publish(StoreEvent::Deleted(item));
                true
            }
            _ => false,
        }
    }

    pub fn clear(&self) {
        let mut store = self.lock();
        let removed = store.count();
        store.clear();
        self.publish(StoreEvent::Cleared { removed });
    }

    pub fn find_by_id(&self, id: i64) -> Option<TodoItem> {
        self.lock().find_by_id(id)
    }

    pub fn count(&self) -> usize {
        self.lock().count()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> Vec<TodoItem> {
        self.lock().snapshot()
    }

    /// Register a callback observer on the underlying store.
    ///
    /// The callback runs while the store lock is held and must not call back
    /// into this `SharedStore`.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut() + Send + 'static,
    {
        self.lock().subscribe(callback)
    }

    pub fn unsubscribe(&self, handle: Subscription) -> bool {
        self.lock().unsubscribe(handle)
    }

    /// Run `f` with read access to the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&TodoStore) -> R) -> R {
        f(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, TodoStore> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish_updated(&self, store: &TodoStore, id: i64, updated: bool) -> bool {
        if updated
            && let Some(item) = store.find_by_id(id)
        {
            self.publish(StoreEvent::Updated(item));
        }
        updated
    }

    fn publish(&self, event: StoreEvent) {
        // No receivers is fine; the event is simply dropped.
        if let Err(broadcast::error::SendError(event)) = self.events.send(event) {
            trace!(?event, "no event receivers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdGenerator;

    fn shared() -> SharedStore {
        SharedStore::new(TodoStore::with_ids(IdGenerator::starting_at(1)))
    }

    #[tokio::test]
    async fn test_mutations_publish_events_in_order() {
        let store = shared();
        let mut rx = store.subscribe_events();

        let item = store.add("Buy milk", "2%");
        assert!(store.update(item.id, "Buy milk", "whole"));
        assert!(store.delete_by_id(item.id));
        store.clear();

        assert_eq!(rx.recv().await.unwrap(), StoreEvent::Added(item.clone()));
        assert_eq!(
            rx.recv().await.unwrap(),
            StoreEvent::Updated(TodoItem::new(item.id, "Buy milk", "whole"))
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            StoreEvent::Deleted(TodoItem::new(item.id, "Buy milk", "whole"))
        );
        assert_eq!(rx.recv().await.unwrap(), StoreEvent::Cleared { removed: 0 });
    }

    #[tokio::test]
    async fn test_failed_mutations_publish_nothing() {
        let store = shared();
        let mut rx = store.subscribe_events();

        assert!(!store.update(77, "x", ""));
        assert!(!store.delete_by_id(77));
        assert!(!store.delete(&TodoItem::new(77, "x", "")));
        assert!(store.add_checked(" ", "").is_err());

        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn test_mutations_without_receivers_succeed() {
        let store = shared();
        store.add("a", "");
        store.clear();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_state_across_tasks() {
        let store = shared();
        let mut handles = Vec::new();
        for n in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.add(format!("task {n}"), "");
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut ids: Vec<i64> = store.snapshot().iter().map(|i| i.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(store.count(), 8);
    }

    #[test]
    fn test_zero_event_capacity_is_usable() {
        let store = SharedStore::with_event_capacity(TodoStore::new(), 0);
        let mut rx = store.subscribe_events();

        let item = store.add("Buy milk", "");

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::Added(item));
    }

    #[test]
    fn test_concurrent_events_follow_mutation_order() {
        const ROUNDS: usize = 2_000;
        let store = SharedStore::with_event_capacity(
            TodoStore::with_ids(IdGenerator::starting_at(1)),
            ROUNDS * 2 + 16,
        );
        let mut rx = store.subscribe_events();

        let adder = {
            let store = store.clone();
            std::thread::spawn(move || {
                for n in 0..ROUNDS {
                    store.add(format!("task {n}"), "");
                }
            })
        };
        let updater = {
            let store = store.clone();
            std::thread::spawn(move || {
                for n in 0..ROUNDS {
                    let newest = store.with_store(|s| s.items().last().map(|i| i.id));
                    if let Some(id) = newest {
                        store.update(id, format!("edit {n}"), "");
                    }
                }
            })
        };
        adder.join().unwrap();
        updater.join().unwrap();

        let mut added = std::collections::HashSet::new();
        while let Ok(event) = rx.try_recv() {
            match event {
                StoreEvent::Added(item) => {
                    added.insert(item.id);
                }
                StoreEvent::Updated(item) => {
                    assert!(added.contains(&item.id), "update of {} seen before its add", item.id);
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(added.len(), ROUNDS);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = StoreEvent::Cleared { removed: 3 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "cleared", "removed": 3}));
    }
}
