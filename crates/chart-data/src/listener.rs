// File: crates/chart-data/src/listener.rs
// Summary: Ordered change listeners invoked synchronously after a notifying mutation.
// Notes:
// - Listeners receive `&T`. A listener therefore cannot mutate the store that
//   is notifying it; re-entrant mutation is not supported.
// - Cloning a store does not carry its listeners across.

use std::fmt;

/// Handle returned by `add_listener`, used to remove the listener later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub struct Listeners<T: ?Sized> {
    entries: Vec<(ListenerId, Box<dyn Fn(&T)>)>,
    next_id: u64,
}

impl<T: ?Sized> Listeners<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new(), next_id: 0 }
    }

    pub fn add<F>(&mut self, callback: F) -> ListenerId
    where
        F: Fn(&T) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    /// Returns `true` if the listener was registered.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Invoke every listener in registration order.
    pub fn notify(&self, source: &T) {
        for (_, callback) in &self.entries {
            callback(source);
        }
    }
}

impl<T: ?Sized> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").field("count", &self.entries.len()).finish()
    }
}
