//! Frozen sorted map with floor/ceiling lookups
//!
//! The map is sorted once when it is built and exposes no way to change it
//! afterwards. When the underlying data changes, build a new one.

use std::cmp::Ordering;

/// Read-only sorted mapping with nearest-key queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigableOrderedMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K: Ord, V> NavigableOrderedMap<K, V> {
    /// Build the map from arbitrary entries. A repeated key keeps its last value.
    pub fn new(data: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut entries: Vec<(K, V)> = data.into_iter().collect();
        // Reverse first so the stable sort puts the latest entry of a key in front.
        entries.reverse();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.dedup_by(|later, kept| later.0 == kept.0);
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries
            .binary_search_by(|(k, _)| k.cmp(key))
            .ok()
            .map(|i| &self.entries[i].1)
    }

    /// The greatest key less than or equal to `key`
    pub fn floor_key(&self, key: &K) -> Option<&K> {
        self.floor_item(key).map(|(k, _)| k)
    }

    /// The least key greater than or equal to `key`
    pub fn ceiling_key(&self, key: &K) -> Option<&K> {
        self.ceiling_item(key).map(|(k, _)| k)
    }

    /// The entry with the greatest key less than or equal to `key`
    pub fn floor_item(&self, key: &K) -> Option<(&K, &V)> {
        let index = self
            .entries
            .partition_point(|(k, _)| k.cmp(key) != Ordering::Greater);
        index
            .checked_sub(1)
            .map(|i| (&self.entries[i].0, &self.entries[i].1))
    }

    /// The entry with the least key greater than or equal to `key`
    pub fn ceiling_item(&self, key: &K) -> Option<(&K, &V)> {
        let index = self
            .entries
            .partition_point(|(k, _)| k.cmp(key) == Ordering::Less);
        self.entries.get(index).map(|(k, v)| (k, v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<K, V> Default for NavigableOrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for NavigableOrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter)
    }
}
