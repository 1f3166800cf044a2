//! Generic keyed entity store shared by every cache in the client
//!
//! Entries iterate in insertion order. A collection is unbounded unless a
//! maximum size is configured; when a new key would overflow it, the oldest
//! entry not protected by the keep predicate is evicted and handed back to
//! the caller so the owner can run its own removal contract.

use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Predicate deciding whether an entry survives eviction
pub type KeepOverLimit<K, V> = Arc<dyn Fn(&K, &V) -> bool + Send + Sync>;

/// Size and eviction policy for a [`Collection`]
pub struct CacheOptions<K, V> {
    /// Maximum number of entries; `None` is unbounded
    pub max_size: Option<usize>,
    /// Entries for which this returns true are never evicted
    pub keep_over_limit: Option<KeepOverLimit<K, V>>,
}

impl<K, V> CacheOptions<K, V> {
    /// Unbounded, no eviction
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            max_size: None,
            keep_over_limit: None,
        }
    }

    /// Bounded to `max_size` entries, evicting oldest first
    #[must_use]
    pub fn limited(max_size: usize) -> Self {
        Self {
            max_size: Some(max_size),
            keep_over_limit: None,
        }
    }

    /// Protect entries matching `keep` from eviction
    #[must_use]
    pub fn with_keep_over_limit<F>(mut self, keep: F) -> Self
    where
        F: Fn(&K, &V) -> bool + Send + Sync + 'static,
    {
        self.keep_over_limit = Some(Arc::new(keep));
        self
    }

    /// Check if this is the default unbounded policy
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.max_size.is_none() && self.keep_over_limit.is_none()
    }
}

impl<K, V> Default for CacheOptions<K, V> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<K, V> Clone for CacheOptions<K, V> {
    fn clone(&self) -> Self {
        Self {
            max_size: self.max_size,
            keep_over_limit: self.keep_over_limit.clone(),
        }
    }
}

impl<K, V> fmt::Debug for CacheOptions<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheOptions")
            .field("max_size", &self.max_size)
            .field("keep_over_limit", &self.keep_over_limit.is_some())
            .finish()
    }
}

/// Insertion-ordered map from id to entity
pub struct Collection<K, V> {
    entries: IndexMap<K, V>,
    options: CacheOptions<K, V>,
}

impl<K, V> Collection<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Create an unbounded collection
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(CacheOptions::unbounded())
    }

    /// Create a collection with the given policy
    #[must_use]
    pub fn with_options(options: CacheOptions<K, V>) -> Self {
        Self {
            entries: IndexMap::new(),
            options,
        }
    }

    /// The policy this collection was built with
    pub fn options(&self) -> &CacheOptions<K, V> {
        &self.options
    }

    /// Check if this collection uses the default unbounded policy
    pub fn is_default_caching(&self) -> bool {
        self.options.is_default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace an entry.
    ///
    /// Returns the entries displaced by this insertion. Replacing an existing
    /// key never evicts. With a maximum size of zero nothing is stored and the
    /// given entry itself comes back.
    #[must_use = "displaced entries must go through the owner's removal path"]
    pub fn set(&mut self, key: K, value: V) -> Vec<(K, V)> {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return Vec::new();
        }

        let mut evicted = Vec::new();
        if let Some(max_size) = self.options.max_size {
            if max_size == 0 {
                evicted.push((key, value));
                return evicted;
            }
            if self.entries.len() >= max_size {
                let victim = self.entries.iter().position(|(k, v)| {
                    !self
                        .options
                        .keep_over_limit
                        .as_ref()
                        .is_some_and(|keep| keep(k, v))
                });
                if let Some((k, v)) = victim.and_then(|index| self.entries.shift_remove_index(index)) {
                    evicted.push((k, v));
                }
            }
        }

        self.entries.insert(key, value);
        evicted
    }

    /// Remove an entry, keeping the order of the rest
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.entries.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.entries.values_mut()
    }

    /// Keep only the entries matching `keep`
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.entries.retain(|k, v| keep(k, v));
    }

    /// Remove and return every entry matching `filter`
    pub fn sweep<F>(&mut self, mut filter: F) -> Vec<(K, V)>
    where
        F: FnMut(&K, &V) -> bool,
    {
        let keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(k, v)| filter(k, v))
            .map(|(k, _)| k.clone())
            .collect();

        keys.into_iter()
            .filter_map(|k| self.entries.shift_remove(&k).map(|v| (k, v)))
            .collect()
    }
}

impl<K, V> Default for Collection<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for Collection<K, V>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish()
    }
}
