#![forbid(unsafe_code)]

//! Keyed load-exactly-once cache.
//!
//! [`LoadOnceMap`] memoizes the result of an expensive per-key load for the
//! lifetime of the map. Each key owns an [`OnceLock`] slot:
//!
//! 1. The slot is fetched (or inserted) under a short map lock.
//! 2. The load runs inside [`OnceLock::get_or_init`], *outside* the map lock.
//!
//! Concurrent first touches of the same key therefore serialize on that key's
//! slot and converge on one value, while loads of different keys proceed in
//! parallel. Readers never observe a partially initialized value.
//!
//! Values are never evicted or replaced.

use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use rustc_hash::FxHashMap;

/// Concurrent memo of `K -> V`, loading each key at most once.
pub struct LoadOnceMap<K, V> {
    slots: RwLock<FxHashMap<K, Arc<OnceLock<V>>>>,
    loads: AtomicUsize,
}

impl<K, V> LoadOnceMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(FxHashMap::default()),
            loads: AtomicUsize::new(0),
        }
    }

    /// Cached value for `key`, running `load` first if no value exists yet.
    ///
    /// `load` runs at most once per key over the lifetime of the map.
    pub fn get_or_load<F>(&self, key: &K, load: F) -> V
    where
        F: FnOnce(&K) -> V,
    {
        let slot = self.slot(key);
        slot.get_or_init(|| {
            self.loads.fetch_add(1, Ordering::Relaxed);
            load(key)
        })
        .clone()
    }

    /// Cached value for `key` without loading.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(key).and_then(|slot| slot.get().cloned())
    }

    /// Store `value` for `key` unless a value is already present.
    ///
    /// Returns `true` if `value` was stored.
    pub fn seed(&self, key: K, value: V) -> bool {
        let slot = self.slot(&key);
        slot.set(value).is_ok()
    }

    /// Number of keys holding a value.
    #[must_use]
    pub fn len(&self) -> usize {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.get().is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of times a load closure has run.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Keys holding a value, in unspecified order.
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .iter()
            .filter(|(_, slot)| slot.get().is_some())
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn slot(&self, key: &K) -> Arc<OnceLock<V>> {
        {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = slots.get(key) {
                return Arc::clone(slot);
            }
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.clone()).or_default())
    }
}

impl<K, V> Default for LoadOnceMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> std::fmt::Debug for LoadOnceMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("LoadOnceMap")
            .field("slots", &slots.len())
            .field("loads", &self.loads.load(Ordering::Relaxed))
            .finish()
    }
}
