// File: crates/chart-data/src/store1d.rs
// Summary: One-dimensional keyed values (section key -> value) with properties and selections.

use serde_json::Value;

use crate::error::{DataError, Result};
use crate::index::KeyIndex;
use crate::listener::{ListenerId, Listeners};
use crate::payload::{check_unique, KeyedValue};
use crate::properties::{Properties, PropertyOverlay};
use crate::selection::SelectionOverlay;
use crate::types::targets;

/// Ordered `(key, value)` entries. Entry positions shift down on removal.
#[derive(Clone, Debug, Default)]
pub struct KeyedValues {
    index: KeyIndex,
    values: Vec<Option<f64>>,
    properties: Properties,
    item_properties: PropertyOverlay<String>,
    selections: SelectionOverlay<String>,
    listeners: Listeners<KeyedValues>,
}

impl KeyedValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a payload list.
    pub fn from_payload(entries: Vec<KeyedValue>) -> Result<Self> {
        let mut out = Self::new();
        out.load(entries, false)?;
        Ok(out)
    }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn keys(&self) -> &[String] { self.index.keys() }

    pub fn key(&self, index: usize) -> Option<&str> { self.index.key_at(index) }

    pub fn index_of(&self, key: &str) -> Option<usize> { self.index.position_of(key) }

    /// Value for `key`; `None` for an unknown key or an absent value.
    pub fn value_by_key(&self, key: &str) -> Option<f64> {
        self.index.position_of(key).and_then(|i| self.values[i])
    }

    /// Value at `index`; `None` for an absent value or an out-of-range index.
    pub fn value_by_index(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] { &self.values }

    /// Upsert: a new key appends an entry, an existing key is updated in place.
    pub fn add(&mut self, key: &str, value: Option<f64>, notify: bool) {
        match self.index.position_of(key) {
            Some(i) => self.values[i] = value,
            None => {
                self.index.push(key);
                self.values.push(value);
                tracing::trace!(target: targets::STORE1D, key, len = self.values.len(), "entry added");
            }
        }
        if notify {
            self.notify_listeners();
        }
    }

    pub fn remove(&mut self, key: &str, notify: bool) -> Result<()> {
        let index = self.index.position_of(key).ok_or_else(|| DataError::not_found(key))?;
        self.remove_by_index(index, notify)
    }

    /// Remove the entry at `index` together with its properties and selections.
    pub fn remove_by_index(&mut self, index: usize, notify: bool) -> Result<()> {
        let key = self
            .index
            .remove_at(index)
            .ok_or(DataError::IndexOutOfBounds { index, len: self.values.len() })?;
        self.values.remove(index);
        self.item_properties.clear(key.as_str());
        self.selections.retain(|item| *item != key);
        tracing::trace!(target: targets::STORE1D, key = %key, index, "entry removed");
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    /// Sum of the present values.
    pub fn total(&self) -> f64 {
        self.counted().sum()
    }

    /// Smallest counted value.
    /// Zero and NaN values are skipped as if absent, so an all-zero store has no minimum.
    pub fn min(&self) -> Option<f64> {
        self.counted().reduce(f64::min)
    }

    /// Largest counted value. Same skipping rule as [`Self::min`].
    pub fn max(&self) -> Option<f64> {
        self.counted().reduce(f64::max)
    }

    // Only "truthy" values are counted: absent, 0.0 and NaN are all skipped.
    fn counted(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| v.filter(|x| *x != 0.0 && !x.is_nan()))
    }

    // ---- properties -------------------------------------------------------

    pub fn get_property(&self, name: &str) -> Option<&Value> { self.properties.get(name) }

    pub fn set_property(&mut self, name: &str, value: Value, notify: bool) {
        self.properties.set(name, value);
        if notify {
            self.notify_listeners();
        }
    }

    pub fn property_keys(&self) -> Vec<String> { self.properties.keys() }

    pub fn clear_properties(&mut self, notify: bool) {
        self.properties.clear();
        if notify {
            self.notify_listeners();
        }
    }

    pub fn get_item_property(&self, key: &str, name: &str) -> Option<&Value> {
        self.item_properties.get(key, name)
    }

    /// Set a property on the entry `key`. Unknown keys are a structural error.
    pub fn set_item_property(&mut self, key: &str, name: &str, value: Value, notify: bool) -> Result<()> {
        if !self.index.contains(key) {
            return Err(DataError::not_found(key));
        }
        self.item_properties.set(key.to_string(), name, value);
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    pub fn item_property_keys(&self, key: &str) -> Vec<String> { self.item_properties.keys(key) }

    pub fn clear_item_properties(&mut self, key: &str, notify: bool) {
        self.item_properties.clear(key);
        if notify {
            self.notify_listeners();
        }
    }

    // ---- selections -------------------------------------------------------

    pub fn select(&mut self, selection_id: &str, key: &str, notify: bool) {
        self.selections.select(selection_id, key.to_string());
        if notify {
            self.notify_listeners();
        }
    }

    pub fn unselect(&mut self, selection_id: &str, key: &str, notify: bool) {
        self.selections.unselect(selection_id, key);
        if notify {
            self.notify_listeners();
        }
    }

    pub fn is_selected(&self, selection_id: &str, key: &str) -> bool {
        self.selections.is_selected(selection_id, key)
    }

    pub fn clear_selection(&mut self, selection_id: &str, notify: bool) {
        self.selections.clear_selection(selection_id);
        if notify {
            self.notify_listeners();
        }
    }

    pub fn selection(&self) -> &SelectionOverlay<String> { &self.selections }

    // ---- listeners --------------------------------------------------------

    pub fn add_listener<F>(&mut self, callback: F) -> ListenerId
    where
        F: Fn(&KeyedValues) + 'static,
    {
        self.listeners.add(callback)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool { self.listeners.remove(id) }

    pub fn listener_count(&self) -> usize { self.listeners.len() }

    pub fn notify_listeners(&self) { self.listeners.notify(self) }

    // ---- payloads ---------------------------------------------------------

    /// Replace every entry from a JSON list of `{key, value}` objects.
    pub fn parse(&mut self, json: &str, notify: bool) -> Result<()> {
        let entries: Vec<KeyedValue> = serde_json::from_str(json)?;
        self.load(entries, notify)
    }

    /// Replace every entry; properties and selections are reset.
    pub fn load(&mut self, entries: Vec<KeyedValue>, notify: bool) -> Result<()> {
        check_unique(entries.iter().map(|e| &e.key))?;
        let (keys, values): (Vec<String>, Vec<Option<f64>>) =
            entries.into_iter().map(|e| (e.key, e.value)).unzip();
        self.index.reset(keys);
        self.values = values;
        self.properties.clear();
        self.item_properties.clear_all();
        self.selections.clear_all();
        tracing::debug!(target: targets::STORE1D, entries = self.values.len(), "loaded");
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    pub fn to_payload(&self) -> Vec<KeyedValue> {
        self.index
            .iter()
            .zip(&self.values)
            .map(|(key, value)| KeyedValue { key: key.to_string(), value: *value })
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_payload())?)
    }
}
