//! Change-observer registry used by [`crate::TodoStore`].

use std::fmt;

use tracing::trace;

/// Handle returned by [`Observers::subscribe`], used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Callback = Box<dyn FnMut() + Send>;

/// Zero-argument callbacks, kept and invoked in registration order.
#[derive(Default)]
pub struct Observers {
    next: u64,
    entries: Vec<(Subscription, Callback)>,
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> Subscription
    where
        F: FnMut() + Send + 'static,
    {
        let handle = Subscription(self.next);
        self.next += 1;
        self.entries.push((handle, Box::new(callback)));
        handle
    }

    /// Returns false if the handle was never registered or is already gone.
    pub fn unsubscribe(&mut self, handle: Subscription) -> bool {
        match self.entries.iter().position(|(h, _)| *h == handle) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn notify(&mut self) {
        trace!(observers = self.entries.len(), "notifying observers");
        for (_, callback) in &mut self.entries {
            callback();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
