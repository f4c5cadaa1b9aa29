//! Ordered containers shared by the bootstrappers.

use std::collections::btree_map::{self, Entry};
use std::collections::BTreeMap;

/// An ordered map whose first insertion for a key wins.
///
/// Later insertions under an existing key are rejected and handed back to
/// the caller, which keeps the dedup policy in one place: every bootstrapper
/// feeds its inputs through this map, keyed by maturity, expiry or
/// (expiry, strike).
///
/// Iteration is in ascending key order.
///
/// # Example
///
/// ```rust
/// use curvekit_core::collections::InsertIfAbsentMap;
///
/// let mut map = InsertIfAbsentMap::new();
/// assert!(map.insert(3, "first").is_ok());
/// assert_eq!(map.insert(3, "second"), Err("second"));
/// assert_eq!(map.get(&3), Some(&"first"));
/// assert_eq!(map.rejected_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct InsertIfAbsentMap<K: Ord, V> {
    entries: BTreeMap<K, V>,
    rejected: usize,
}

impl<K: Ord, V> InsertIfAbsentMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            rejected: 0,
        }
    }

    /// Inserts `value` under `key` unless the key is already present.
    ///
    /// Returns `Err(value)` with the rejected value when the key exists.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), V> {
        match self.entries.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
            Entry::Occupied(_) => {
                self.rejected += 1;
                Err(value)
            }
        }
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Number of accepted entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entry was accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of insertions rejected so far.
    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.rejected
    }

    /// Iterates entries in ascending key order.
    pub fn iter(&self) -> btree_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    /// Iterates keys in ascending order.
    pub fn keys(&self) -> btree_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    /// Iterates values in ascending key order.
    pub fn values(&self) -> btree_map::Values<'_, K, V> {
        self.entries.values()
    }

    /// Returns the first (smallest-key) entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.entries.iter().next()
    }

    /// Consumes the map, returning entries in ascending key order.
    #[must_use]
    pub fn into_vec(self) -> Vec<(K, V)> {
        self.entries.into_iter().collect()
    }
}

impl<K: Ord, V> Default for InsertIfAbsentMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> IntoIterator for InsertIfAbsentMap<K, V> {
    type Item = (K, V);
    type IntoIter = btree_map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a InsertIfAbsentMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = btree_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_insert_wins() {
        let mut map = InsertIfAbsentMap::new();
        assert!(map.insert("3Y", 0.04).is_ok());
        assert_eq!(map.insert("3Y", 0.06), Err(0.06));
        assert_eq!(map.get(&"3Y"), Some(&0.04));
        assert_eq!(map.len(), 1);
        assert_eq!(map.rejected_count(), 1);
    }

    #[test]
    fn test_iterates_in_key_order() {
        let mut map = InsertIfAbsentMap::new();
        for key in [5, 1, 3, 2, 4] {
            map.insert(key, key * 10).unwrap();
        }
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec![1, 2, 3, 4, 5]);
        assert_eq!(map.first(), Some((&1, &10)));
        assert_eq!(map.into_vec().last(), Some(&(5, 50)));
    }

    proptest! {
        #[test]
        fn prop_keeps_first_value_per_key(items in proptest::collection::vec((0u8..20, any::<i32>()), 0..60)) {
            let mut map = InsertIfAbsentMap::new();
            for (k, v) in &items {
                let _ = map.insert(*k, *v);
            }
            for (key, value) in &map {
                let first = items.iter().find(|(k, _)| k == key).map(|(_, v)| v);
                prop_assert_eq!(Some(value), first);
            }
            prop_assert_eq!(map.len() + map.rejected_count(), items.len());
            let keys: Vec<_> = map.keys().collect();
            prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
