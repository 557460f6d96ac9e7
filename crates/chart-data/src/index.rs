// File: crates/chart-data/src/index.rs
// Summary: Bidirectional mapping between an ordered key sequence and dense positions.
// Notes:
// - Contract: `positions` is the exact inverse of `keys` whenever a method returns.
//   Appends update the map in place; inserts and removals shift positions and
//   rebuild the map wholesale (O(n)).

use rustc_hash::FxHashMap;

#[derive(Clone, Debug, Default)]
pub struct KeyIndex {
    keys: Vec<String>,
    positions: FxHashMap<String, usize>,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from an ordered key sequence.
    /// Later duplicates are ignored so the map stays an exact inverse.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::new();
        for key in keys {
            index.push(key);
        }
        index
    }

    pub fn len(&self) -> usize { self.keys.len() }

    pub fn is_empty(&self) -> bool { self.keys.is_empty() }

    pub fn keys(&self) -> &[String] { &self.keys }

    /// Position of `key`, or `None` when absent. Never panics.
    #[inline]
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    /// Key at `position`, or `None` when out of range.
    #[inline]
    pub fn key_at(&self, position: usize) -> Option<&str> {
        self.keys.get(position).map(String::as_str)
    }

    /// Append `key` and return its position. An existing key is left where it is.
    pub fn push(&mut self, key: impl Into<String>) -> usize {
        let key = key.into();
        if let Some(pos) = self.positions.get(&key) {
            return *pos;
        }
        let pos = self.keys.len();
        self.positions.insert(key.clone(), pos);
        self.keys.push(key);
        pos
    }

    /// Insert `key` at `position` (clamped to `len`), shifting later keys down.
    /// Returns `false` without change when the key already exists.
    pub fn insert(&mut self, position: usize, key: impl Into<String>) -> bool {
        let key = key.into();
        if self.positions.contains_key(&key) {
            return false;
        }
        let pos = position.min(self.keys.len());
        self.keys.insert(pos, key);
        self.rebuild();
        true
    }

    /// Remove the key at `position`, returning it.
    pub fn remove_at(&mut self, position: usize) -> Option<String> {
        if position >= self.keys.len() {
            return None;
        }
        let key = self.keys.remove(position);
        self.rebuild();
        Some(key)
    }

    /// Remove `key`, returning its former position.
    pub fn remove(&mut self, key: &str) -> Option<usize> {
        let pos = self.position_of(key)?;
        self.remove_at(pos);
        Some(pos)
    }

    /// Replace the key sequence and reconstruct the map.
    pub fn reset<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self = Self::from_keys(keys);
    }

    /// Reconstruct the key -> position map from the key sequence.
    pub fn rebuild(&mut self) {
        self.positions.clear();
        self.positions.reserve(self.keys.len());
        for (pos, key) in self.keys.iter().enumerate() {
            self.positions.insert(key.clone(), pos);
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.positions.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.keys.iter().map(String::as_str)
    }
}
