//! # Session Cache
//!
//! Process-lifetime memoization with typed keys. Keys are structured tuples
//! of the full parameter set of a request, never formatted strings.
//!
//! There is no eviction: entries live as long as the owning session. A
//! disabled cache reports every key absent and drops every insert, which
//! forces full recomputation while keeping call sites unchanged. Toggling
//! the cache off does not discard entries already stored.

use std::collections::HashMap;
use std::hash::Hash;

/// Typed key/value memo store.
#[derive(Debug, Clone)]
pub struct SessionCache<K, V> {
    entries: HashMap<K, V>,
    enabled: bool,
}

impl<K, V> Default for SessionCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            enabled: true,
        }
    }
}

impl<K: Eq + Hash, V> SessionCache<K, V> {
    /// An empty, enabled cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty cache that stores nothing until enabled.
    pub fn disabled() -> Self {
        Self {
            entries: HashMap::new(),
            enabled: false,
        }
    }

    /// Whether lookups and inserts are active.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn the cache on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Look up `key`. Always `None` while disabled.
    pub fn get(&self, key: &K) -> Option<&V> {
        if !self.enabled {
            return None;
        }
        self.entries.get(key)
    }

    /// Store `value` under `key`, replacing any previous entry. No-op while
    /// disabled.
    pub fn put(&mut self, key: K, value: V) {
        if self.enabled {
            self.entries.insert(key, value);
        }
    }

    /// Number of stored entries, including those hidden while disabled.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
