// File: crates/chart-data/src/properties.rs
// Summary: Sparse, lazily allocated name -> value annotations attached to store scopes.
// Notes:
// - A scope with no properties owns no map. `clear` drops the map itself.
// - Names iterate in insertion order (serde_json `preserve_order`).

use std::hash::Hash;

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

/// Properties for a single scope (typically the whole dataset).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Properties {
    map: Option<Map<String, Value>>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.map.as_ref().and_then(|m| m.get(name))
    }

    /// Set `name`, allocating the scope map on first write.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.map.get_or_insert_with(Map::new).insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let map = self.map.as_mut()?;
        let old = map.shift_remove(name);
        if map.is_empty() {
            self.map = None;
        }
        old
    }

    /// Property names in insertion order; empty when nothing was set.
    pub fn keys(&self) -> Vec<String> {
        self.map.as_ref().map(|m| m.keys().cloned().collect()).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.map = None;
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_none()
    }

    /// Whether storage has been allocated for this scope.
    pub fn is_allocated(&self) -> bool {
        self.map.is_some()
    }

    pub fn as_map(&self) -> Option<&Map<String, Value>> {
        self.map.as_ref()
    }
}

/// Properties for many scopes of one granularity (rows, columns, cells, items),
/// keyed by the scope's addressing keys. Scopes without properties are absent.
#[derive(Clone, Debug)]
pub struct PropertyOverlay<S> {
    scopes: FxHashMap<S, Map<String, Value>>,
}

impl<S> Default for PropertyOverlay<S> {
    fn default() -> Self {
        Self { scopes: FxHashMap::default() }
    }
}

impl<S: Eq + Hash> PropertyOverlay<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<Q>(&self, scope: &Q, name: &str) -> Option<&Value>
    where
        S: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.scopes.get(scope).and_then(|m| m.get(name))
    }

    pub fn set(&mut self, scope: S, name: impl Into<String>, value: Value) {
        self.scopes.entry(scope).or_default().insert(name.into(), value);
    }

    pub fn keys<Q>(&self, scope: &Q) -> Vec<String>
    where
        S: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.scopes.get(scope).map(|m| m.keys().cloned().collect()).unwrap_or_default()
    }

    /// Whole map for one scope, if allocated.
    pub fn scope<Q>(&self, scope: &Q) -> Option<&Map<String, Value>>
    where
        S: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.scopes.get(scope)
    }

    /// Discard the scope's map entirely.
    pub fn clear<Q>(&mut self, scope: &Q)
    where
        S: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.scopes.remove(scope);
    }

    /// Keep only the scopes for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&S) -> bool) {
        self.scopes.retain(|scope, _| keep(scope));
    }

    /// Number of allocated scopes.
    pub fn allocated(&self) -> usize {
        self.scopes.len()
    }

    pub fn clear_all(&mut self) {
        self.scopes.clear();
    }
}
