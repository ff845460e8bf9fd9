//! Keyed at-most-once memoization.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::{Condvar, Mutex};

enum Slot<V> {
    InFlight,
    Ready(V),
}

/// Memoizes a fallible computation per key.
///
/// The first caller for a key runs the computation with the map
/// unlocked; concurrent callers for the same key block until it
/// finishes. A success is stored for the lifetime of the cache. A
/// failure (or a panic) clears the in-flight marker and wakes the
/// waiters, one of which becomes the new computing caller, so errors
/// are returned but never remembered.
pub struct KeyedOnce<K, V> {
    slots: Mutex<HashMap<K, Slot<V>>>,
    wakeup: Condvar,
}

impl<K: Eq + Hash + Clone, V: Clone> KeyedOnce<K, V> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            wakeup: Condvar::new(),
        }
    }

    /// The stored value for a key, if a computation has completed.
    pub fn peek(&self, key: &K) -> Option<V> {
        match self.slots.lock().get(key) {
            Some(Slot::Ready(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// Number of completed entries.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the stored value for `key`, computing it with `init` if
    /// absent.
    ///
    /// `init` runs without the internal lock held; at most one `init`
    /// is in flight per key at any time.
    pub fn get_or_try_init<E>(
        &self,
        key: K,
        init: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        loop {
            let mut slots = self.slots.lock();
            match slots.get(&key) {
                Some(Slot::Ready(value)) => return Ok(value.clone()),
                Some(Slot::InFlight) => {
                    self.wakeup.wait(&mut slots);
                }
                None => {
                    slots.insert(key.clone(), Slot::InFlight);
                    break;
                }
            }
        }

        let mut cleanup = ClearOnDrop {
            cache: self,
            key: &key,
            armed: true,
        };
        match init() {
            Ok(value) => {
                let mut slots = self.slots.lock();
                slots.insert(key.clone(), Slot::Ready(value.clone()));
                cleanup.armed = false;
                drop(slots);
                self.wakeup.notify_all();
                Ok(value)
            }
            Err(e) => Err(e),
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for KeyedOnce<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the in-flight marker when the computation did not store a
/// value, covering both the error return and an unwinding `init`.
struct ClearOnDrop<'a, K: Eq + Hash + Clone, V: Clone> {
    cache: &'a KeyedOnce<K, V>,
    key: &'a K,
    armed: bool,
}

impl<K: Eq + Hash + Clone, V: Clone> Drop for ClearOnDrop<'_, K, V> {
    fn drop(&mut self) {
        if self.armed {
            self.cache.slots.lock().remove(self.key);
            self.cache.wakeup.notify_all();
        }
    }
}
