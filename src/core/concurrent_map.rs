//! # Concurrent Map
//!
//! A hash map whose every operation is atomic with respect to every other operation
//! on the same map. Each call takes the internal lock exactly once, so compound
//! check-then-act sequences must go through [`ConcurrentMap::try_insert`] or
//! [`ConcurrentMap::update`] instead of being assembled from `contains` + `insert`
//! at the call site.
//!
//! ## Atomicity Guarantees
//! - `get`, `contains_key`, `len`, `keys` observe a consistent snapshot
//! - `insert` is last-writer-wins
//! - `try_insert` is first-writer-wins and reports whether this call won
//! - `remove` returns the removed value to exactly one caller
//! - `update` runs its closure while holding the write lock

use std::collections::HashMap;
use std::hash::Hash;

use super::MtResource;

/// Thread-safe map shared by handle. Cloning shares the same storage.
pub struct ConcurrentMap<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    entries: MtResource<HashMap<K, V>>,
}

impl<K, V> ConcurrentMap<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            entries: MtResource::new(HashMap::new()),
        }
    }

    /// Returns a clone of the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get().get(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.get().contains_key(key)
    }

    /// Inserts `value`, replacing any previous entry (last writer wins).
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.entries.get_mut().insert(key, value)
    }

    /// Inserts `value` only if `key` is vacant.
    ///
    /// # Returns
    /// `Ok(())` if this call claimed the key, `Err(value)` handing the rejected
    /// value back to the caller otherwise.
    pub fn try_insert(&self, key: K, value: V) -> Result<(), V> {
        let mut entries = self.entries.get_mut();
        if entries.contains_key(&key) {
            return Err(value);
        }
        entries.insert(key, value);
        Ok(())
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.entries.get_mut().remove(key)
    }

    /// Runs `f` against the entry for `key` under the write lock.
    ///
    /// The closure receives the slot itself, so it may fill, replace or clear it.
    pub fn update<R>(&self, key: &K, f: impl FnOnce(&mut Option<V>) -> R) -> R {
        let mut entries = self.entries.get_mut();
        let mut slot = entries.remove(key);
        let result = f(&mut slot);
        if let Some(value) = slot {
            entries.insert(key.clone(), value);
        }
        result
    }

    /// Returns a snapshot of the keys currently present.
    pub fn keys(&self) -> Vec<K> {
        self.entries.get().keys().cloned().collect()
    }

    /// Returns a snapshot of every entry currently present.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.entries
            .get()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.get().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.get().is_empty()
    }
}

impl<K, V> Default for ConcurrentMap<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for ConcurrentMap<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}
