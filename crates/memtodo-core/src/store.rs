//! In-memory to-do store.
//!
//! `TodoStore` owns the authoritative list of items for the lifetime of the
//! process. Every successful mutation runs the registered observers
//! synchronously, in registration order, before returning.

use std::fmt;

use tracing::debug;

use crate::error::Result;
use crate::ids::IdGenerator;
use crate::models::{TodoItem, validate_title};
use crate::observer::{Observers, Subscription};

#[derive(Debug, Default)]
pub struct TodoStore {
    items: Vec<TodoItem>,
    ids: IdGenerator,
    observers: Observers,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a specific id source (useful for tests).
    pub fn with_ids(ids: IdGenerator) -> Self {
        Self {
            items: Vec::new(),
            ids,
            observers: Observers::new(),
        }
    }

    /// Append a new item. The title is stored as given.
    pub fn add(&mut self, title: impl Into<String>, description: impl Into<String>) -> TodoItem {
        let item = TodoItem::new(self.ids.next_id(), title, description);
        debug!(id = item.id, title = %item.title, "added todo");
        self.items.push(item.clone());
        self.observers.notify();
        item
    }

    /// Like [`add`](Self::add), but trims both fields and rejects a blank title.
    pub fn add_checked(&mut self, title: &str, description: &str) -> Result<TodoItem> {
        let title = validate_title(title)?;
        Ok(self.add(title, description.trim()))
    }

    /// Replace the title and description of the item with `id`.
    ///
    /// Returns false, without notifying, when no item has that id.
    pub fn update(
        &mut self,
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> bool {
        let Some(slot) = self.items.iter_mut().find(|item| item.id == id) else {
            debug!(id, "update skipped, no such todo");
            return false;
        };
        *slot = TodoItem::new(id, title, description);
        debug!(id, title = %slot.title, "updated todo");
        self.observers.notify();
        true
    }

    /// Like [`update`](Self::update), but trims both fields and rejects a blank title.
    pub fn update_checked(&mut self, id: i64, title: &str, description: &str) -> Result<bool> {
        let title = validate_title(title)?;
        Ok(self.update(id, title, description.trim()))
    }

    /// Remove the item equal to `item`.
    ///
    /// The candidate is located by id and must also match on title and
    /// description, so a stale copy of an edited item removes nothing.
    pub fn delete(&mut self, item: &TodoItem) -> bool {
        let Some(index) = self.position(item.id) else {
            return false;
        };
        if self.items[index] != *item {
            debug!(id = item.id, "delete skipped, item has changed");
            return false;
        }
        self.items.remove(index);
        debug!(id = item.id, "deleted todo");
        self.observers.notify();
        true
    }

    pub fn delete_by_id(&mut self, id: i64) -> bool {
        match self.find_by_id(id) {
            Some(item) => self.delete(&item),
            None => false,
        }
    }

    pub fn find_by_id(&self, id: i64) -> Option<TodoItem> {
        self.items.iter().find(|item| item.id == id).cloned()
    }

    /// Remove every item. Observers run even if the store was already empty.
    pub fn clear(&mut self) {
        debug!(removed = self.items.len(), "cleared todos");
        self.items.clear();
        self.observers.notify();
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Read-only view in insertion order.
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// Owned copy of the current items.
    pub fn snapshot(&self) -> Vec<TodoItem> {
        self.items.clone()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut() + Send + 'static,
    {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, handle: Subscription) -> bool {
        self.observers.unsubscribe(handle)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Dump the store contents at debug level.
    pub fn log_contents(&self) {
        debug!("\n{}", self);
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }
}

impl fmt::Display for TodoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Todo store ===")?;
        writeln!(f, "Total todos: {}", self.items.len())?;
        for (index, item) in self.items.iter().enumerate() {
            writeln!(f, "{}: {} - {}", index, item.title, item.description)?;
        }
        write!(f, "==================")
    }
}
