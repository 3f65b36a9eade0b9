use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use crate::value::Value;

/// Values already seen by each `unique()` call site.
///
/// Keyed by the operator's offset in the filter source, so two `unique()`
/// calls in one filter track independent sets. Entries persist across
/// evaluations until [`UniqueCache::clear`] is called.
#[derive(Debug, Default)]
pub struct UniqueCache {
    seen: Mutex<HashMap<usize, HashSet<String>>>,
}

impl UniqueCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value` at `location`; true if it had not been seen there before.
    pub fn observe(&self, location: usize, value: &Value) -> bool {
        self.observe_key(location, value.canonical())
    }

    /// Same as [`UniqueCache::observe`] for an already canonical key.
    pub fn observe_key(&self, location: usize, key: String) -> bool {
        self.lock().entry(location).or_default().insert(key)
    }

    /// Drop entries recorded by an evaluation that did not complete.
    pub fn forget(&self, entries: &[(usize, String)]) {
        let mut seen = self.lock();
        for (location, key) in entries {
            if let Some(keys) = seen.get_mut(location) {
                keys.remove(key);
                if keys.is_empty() {
                    seen.remove(location);
                }
            }
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of distinct values remembered across all call sites.
    pub fn len(&self) -> usize {
        self.lock().values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<usize, HashSet<String>>> {
        self.seen.lock().unwrap_or_else(|poisoned| {
            log::warn!("uniqueness cache lock was poisoned; continuing with its contents");
            poisoned.into_inner()
        })
    }
}
