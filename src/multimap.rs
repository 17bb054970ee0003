//! A name-indexed multimap.
//!
//! Lookups over several groups can find more than one entity with the same name, e.g. a dimension `stations` in a group and another `stations` in its parent.
//! A [`NameMultimap`] keeps all of them.

use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

/// A mapping from names to sets of values.
///
/// Each name maps to a set, so adding an identical (name, value) pair twice stores it once.
///
/// Entries are kept in insertion order, both across names and within the values of a name.
/// Group lookups insert the current group first, then ancestors nearest first, then descendants, so the first value of [`equal_range`](NameMultimap::equal_range) is the one found in the nearest searched group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameMultimap<V: Hash + Eq> {
    map: IndexMap<String, IndexSet<V>>,
}

/// A multimap erase error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MultimapError {
    /// The key is not in the multimap.
    #[error("key {0} not present in multimap")]
    KeyNotFound(String),
    /// The key is present but not with that value.
    #[error("key value pair [{0}, ..] not present in multimap")]
    PairNotFound(String),
}

impl<V: Hash + Eq> Default for NameMultimap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Hash + Eq> NameMultimap<V> {
    /// Create an empty multimap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }

    /// Add `value` under `key`.
    ///
    /// Adding a (key, value) pair which is already present is a no-op.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        self.map.entry(key.into()).or_default().insert(value);
    }

    /// Returns true if `key` has at least one value.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Returns true if `value` is stored under `key`.
    #[must_use]
    pub fn has(&self, key: &str, value: &V) -> bool {
        self.map
            .get(key)
            .is_some_and(|values| values.contains(value))
    }

    /// Returns all values stored under `key`.
    ///
    /// An absent key gives an empty vector.
    #[must_use]
    pub fn equal_range(&self, key: &str) -> Vec<&V> {
        self.map
            .get(key)
            .map_or_else(Vec::new, |values| values.iter().collect())
    }

    /// Returns the first value stored under `key`.
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&V> {
        self.map.get(key).and_then(|values| values.first())
    }

    /// Remove `key` and all of its values.
    ///
    /// # Errors
    /// Returns [`MultimapError::KeyNotFound`] if `key` is not present.
    pub fn erase_key(&mut self, key: &str) -> Result<(), MultimapError> {
        self.map
            .shift_remove(key)
            .map(|_| ())
            .ok_or_else(|| MultimapError::KeyNotFound(key.to_string()))
    }

    /// Remove the pair (`key`, `value`).
    ///
    /// The key is removed once its last value is erased.
    ///
    /// # Errors
    /// Returns [`MultimapError::PairNotFound`] if the pair is not present.
    pub fn erase(&mut self, key: &str, value: &V) -> Result<(), MultimapError> {
        let Some(values) = self.map.get_mut(key) else {
            return Err(MultimapError::PairNotFound(key.to_string()));
        };
        if !values.shift_remove(value) {
            return Err(MultimapError::PairNotFound(key.to_string()));
        }
        if values.is_empty() {
            self.map.shift_remove(key);
        }
        Ok(())
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn size(&self) -> usize {
        self.map.len()
    }

    /// Returns the number of (key, value) pairs.
    #[must_use]
    pub fn length(&self) -> usize {
        self.map.values().map(IndexSet::len).sum()
    }

    /// Returns true if the multimap holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over every (key, value) pair.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.map
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |value| (key.as_str(), value)))
    }

    /// Move every pair of `other` into `self`.
    pub fn append(&mut self, other: Self) {
        for (key, values) in other.map {
            self.map.entry(key).or_default().extend(values);
        }
    }
}

impl<V: Hash + Eq> Extend<(String, V)> for NameMultimap<V> {
    fn extend<T: IntoIterator<Item = (String, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}

impl<V: Hash + Eq> FromIterator<(String, V)> for NameMultimap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        let mut multimap = Self::new();
        multimap.extend(iter);
        multimap
    }
}
