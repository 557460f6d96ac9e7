// File: crates/chart-data/src/xy.rs
// Summary: Named series of ordered (x, y) items addressed by series/item key or position.
// Notes:
// - Item keys are unique within one series, not across series.
// - Generated item keys come from a per-series counter and only ever increase.
// - Either coordinate may be absent. Absent values do not contribute to bounds.

use serde_json::Value;

use crate::error::{DataError, Result};
use crate::index::KeyIndex;
use crate::listener::{ListenerId, Listeners};
use crate::payload::{check_unique, SeriesEntry, SeriesItem, SeriesPayload};
use crate::properties::{Properties, PropertyOverlay};
use crate::selection::SelectionOverlay;
use crate::types::targets;

/// Item identity: `(series key, item key)`.
pub type ItemKey = (String, String);

fn item_key(series_key: &str, item_key: &str) -> ItemKey {
    (series_key.to_string(), item_key.to_string())
}

/// One item as returned by the read accessors.
#[derive(Clone, Debug, PartialEq)]
pub struct XYItem {
    pub key: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Clone, Debug, Default)]
struct SeriesItems {
    keys: KeyIndex,
    xs: Vec<Option<f64>>,
    ys: Vec<Option<f64>>,
    next_key: u64,
}

impl SeriesItems {
    fn len(&self) -> usize { self.xs.len() }

    /// Next unused counter value, rendered as a string.
    fn fresh_key(&mut self) -> String {
        loop {
            let key = self.next_key.to_string();
            self.next_key += 1;
            if !self.keys.contains(&key) {
                return key;
            }
        }
    }

    fn push(&mut self, key: String, x: Option<f64>, y: Option<f64>) {
        self.keys.push(key);
        self.xs.push(x);
        self.ys.push(y);
    }

    fn item(&self, index: usize) -> Option<XYItem> {
        Some(XYItem { key: self.keys.key_at(index)?.to_string(), x: self.xs[index], y: self.ys[index] })
    }

    fn remove(&mut self, index: usize) -> Option<String> {
        let key = self.keys.remove_at(index)?;
        self.xs.remove(index);
        self.ys.remove(index);
        Some(key)
    }
}

#[derive(Clone, Debug, Default)]
pub struct KeyedSeries {
    series: KeyIndex,
    data: Vec<SeriesItems>,
    properties: Properties,
    series_properties: PropertyOverlay<String>,
    item_properties: PropertyOverlay<ItemKey>,
    selections: SelectionOverlay<ItemKey>,
    listeners: Listeners<KeyedSeries>,
}

impl KeyedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_payload(payload: SeriesPayload) -> Result<Self> {
        let mut out = Self::new();
        out.load(payload, false)?;
        Ok(out)
    }

    pub fn series_count(&self) -> usize { self.series.len() }

    pub fn is_empty(&self) -> bool { self.series.is_empty() }

    pub fn series_keys(&self) -> &[String] { self.series.keys() }

    pub fn series_key(&self, series: usize) -> Option<&str> { self.series.key_at(series) }

    pub fn series_index(&self, series_key: &str) -> Option<usize> { self.series.position_of(series_key) }

    /// Items in the series at `series`; zero for an unknown position.
    pub fn item_count(&self, series: usize) -> usize {
        self.data.get(series).map_or(0, SeriesItems::len)
    }

    /// Position of `item_key` within `series_key`.
    pub fn item_index(&self, series_key: &str, item_key: &str) -> Option<usize> {
        let s = self.series.position_of(series_key)?;
        self.data[s].keys.position_of(item_key)
    }

    pub fn item_key(&self, series: usize, item: usize) -> Option<&str> {
        self.data.get(series)?.keys.key_at(item)
    }

    pub fn x(&self, series: usize, item: usize) -> Option<f64> {
        self.data.get(series)?.xs.get(item).copied().flatten()
    }

    pub fn y(&self, series: usize, item: usize) -> Option<f64> {
        self.data.get(series)?.ys.get(item).copied().flatten()
    }

    pub fn item(&self, series: usize, item: usize) -> Option<XYItem> {
        self.data.get(series)?.item(item)
    }

    pub fn item_by_key(&self, series_key: &str, item_key: &str) -> Option<XYItem> {
        let s = self.series.position_of(series_key)?;
        let block = &self.data[s];
        block.item(block.keys.position_of(item_key)?)
    }

    /// Every item of one series, in order.
    pub fn series_items(&self, series_key: &str) -> Option<Vec<XYItem>> {
        let s = self.series.position_of(series_key)?;
        let block = &self.data[s];
        Some((0..block.len()).filter_map(|i| block.item(i)).collect())
    }

    /// Create an empty series. Fails if the key is already used.
    pub fn add_series(&mut self, series_key: &str, notify: bool) -> Result<()> {
        if self.series.contains(series_key) {
            return Err(DataError::duplicate(series_key));
        }
        self.push_series(series_key);
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    fn push_series(&mut self, series_key: &str) -> usize {
        let s = self.series.push(series_key);
        self.data.push(SeriesItems::default());
        tracing::trace!(target: targets::XY, series = series_key, "series created");
        s
    }

    fn ensure_series(&mut self, series_key: &str) -> usize {
        match self.series.position_of(series_key) {
            Some(s) => s,
            None => self.push_series(series_key),
        }
    }

    /// Append an item under a freshly generated key, creating the series if needed.
    /// Returns the generated key.
    pub fn add(&mut self, series_key: &str, x: Option<f64>, y: Option<f64>, notify: bool) -> String {
        let s = self.ensure_series(series_key);
        let block = &mut self.data[s];
        let key = block.fresh_key();
        block.push(key.clone(), x, y);
        if notify {
            self.notify_listeners();
        }
        key
    }

    /// Upsert by explicit item key: update x/y in place or append.
    pub fn add_by_key(&mut self, series_key: &str, item_key: &str, x: Option<f64>, y: Option<f64>, notify: bool) {
        let s = self.ensure_series(series_key);
        let block = &mut self.data[s];
        match block.keys.position_of(item_key) {
            Some(i) => {
                block.xs[i] = x;
                block.ys[i] = y;
            }
            None => block.push(item_key.to_string(), x, y),
        }
        if notify {
            self.notify_listeners();
        }
    }

    /// Remove the item at `(series, item)`; later items move down one position.
    pub fn remove(&mut self, series: usize, item: usize, notify: bool) -> Result<()> {
        let series_key = self
            .series
            .key_at(series)
            .ok_or(DataError::IndexOutOfBounds { index: series, len: self.series.len() })?
            .to_string();
        let block = &mut self.data[series];
        let len = block.len();
        let removed = block.remove(item).ok_or(DataError::IndexOutOfBounds { index: item, len })?;
        let id = (series_key, removed);
        self.item_properties.clear(&id);
        self.selections.retain(|selected| *selected != id);
        tracing::trace!(target: targets::XY, series = %id.0, item = %id.1, index = item, "item removed");
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    pub fn remove_by_key(&mut self, series_key: &str, item_key: &str, notify: bool) -> Result<()> {
        let s = self.series.position_of(series_key).ok_or_else(|| DataError::not_found(series_key))?;
        let i = self.data[s].keys.position_of(item_key).ok_or_else(|| DataError::not_found(item_key))?;
        self.remove(s, i, notify)
    }

    /// Remove a whole series; later series move down one position.
    pub fn remove_series(&mut self, series_key: &str, notify: bool) -> Result<()> {
        let s = self.series.remove(series_key).ok_or_else(|| DataError::not_found(series_key))?;
        self.data.remove(s);
        self.series_properties.clear(series_key);
        self.item_properties.retain(|(series, _)| series != series_key);
        self.selections.retain(|(series, _)| series != series_key);
        tracing::trace!(target: targets::XY, series = series_key, index = s, "series removed");
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    /// `[xmin, xmax, ymin, ymax]` over every item. An absent x (or y) does not
    /// contribute to the x (or y) range. An empty store yields `[inf, -inf, inf, -inf]`.
    pub fn bounds(&self) -> [f64; 4] {
        let [xmin, xmax] = self.xbounds();
        let [ymin, ymax] = self.ybounds();
        [xmin, xmax, ymin, ymax]
    }

    pub fn xbounds(&self) -> [f64; 2] {
        self.data
            .iter()
            .flat_map(|block| block.xs.iter().flatten().copied())
            .fold([f64::INFINITY, f64::NEG_INFINITY], |[lo, hi], x| [lo.min(x), hi.max(x)])
    }

    pub fn ybounds(&self) -> [f64; 2] {
        self.data
            .iter()
            .flat_map(|block| block.ys.iter().flatten().copied())
            .fold([f64::INFINITY, f64::NEG_INFINITY], |[lo, hi], y| [lo.min(y), hi.max(y)])
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

    pub fn get_series_property(&self, series_key: &str, name: &str) -> Option<&Value> {
        self.series_properties.get(series_key, name)
    }

    pub fn set_series_property(&mut self, series_key: &str, name: &str, value: Value, notify: bool) -> Result<()> {
        if !self.series.contains(series_key) {
            return Err(DataError::not_found(series_key));
        }
        self.series_properties.set(series_key.to_string(), name, value);
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    pub fn series_property_keys(&self, series_key: &str) -> Vec<String> {
        self.series_properties.keys(series_key)
    }

    pub fn clear_series_properties(&mut self, series_key: &str, notify: bool) {
        self.series_properties.clear(series_key);
        if notify {
            self.notify_listeners();
        }
    }

    pub fn get_item_property(&self, series_key: &str, item: &str, name: &str) -> Option<&Value> {
        self.item_properties.get(&item_key(series_key, item), name)
    }

    pub fn set_item_property(&mut self, series_key: &str, item: &str, name: &str, value: Value, notify: bool) -> Result<()> {
        if self.item_index(series_key, item).is_none() {
            return Err(DataError::not_found(format!("{series_key}/{item}")));
        }
        self.item_properties.set(item_key(series_key, item), name, value);
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    pub fn item_property_keys(&self, series_key: &str, item: &str) -> Vec<String> {
        self.item_properties.keys(&item_key(series_key, item))
    }

    pub fn clear_item_properties(&mut self, series_key: &str, item: &str, notify: bool) {
        self.item_properties.clear(&item_key(series_key, item));
        if notify {
            self.notify_listeners();
        }
    }

    pub fn item_properties(&self, series_key: &str, item: &str) -> Option<&serde_json::Map<String, Value>> {
        self.item_properties.scope(&item_key(series_key, item))
    }

    // ---- selections -------------------------------------------------------

    pub fn select(&mut self, selection_id: &str, series_key: &str, item: &str, notify: bool) {
        self.selections.select(selection_id, item_key(series_key, item));
        if notify {
            self.notify_listeners();
        }
    }

    pub fn unselect(&mut self, selection_id: &str, series_key: &str, item: &str, notify: bool) {
        self.selections.unselect(selection_id, &item_key(series_key, item));
        if notify {
            self.notify_listeners();
        }
    }

    pub fn is_selected(&self, selection_id: &str, series_key: &str, item: &str) -> bool {
        self.selections.is_selected(selection_id, &item_key(series_key, item))
    }

    pub fn clear_selection(&mut self, selection_id: &str, notify: bool) {
        self.selections.clear_selection(selection_id);
        if notify {
            self.notify_listeners();
        }
    }

    pub fn selection(&self) -> &SelectionOverlay<ItemKey> { &self.selections }

    // ---- listeners --------------------------------------------------------

    pub fn add_listener<F>(&mut self, callback: F) -> ListenerId
    where
        F: Fn(&KeyedSeries) + 'static,
    {
        self.listeners.add(callback)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool { self.listeners.remove(id) }

    pub fn listener_count(&self) -> usize { self.listeners.len() }

    pub fn notify_listeners(&self) { self.listeners.notify(self) }

    // ---- payloads ---------------------------------------------------------

    pub fn parse(&mut self, json: &str, notify: bool) -> Result<()> {
        let payload: SeriesPayload = serde_json::from_str(json)?;
        self.load(payload, notify)
    }

    /// Replace every series; properties and selections are reset.
    /// On error the store is left unchanged.
    pub fn load(&mut self, payload: SeriesPayload, notify: bool) -> Result<()> {
        check_unique(payload.series.iter().map(|s| &s.series_key))?;
        let mut series = KeyIndex::new();
        let mut data = Vec::with_capacity(payload.series.len());
        for SeriesEntry { series_key, items } in payload.series {
            check_unique(items.iter().filter_map(|item| item.key.as_ref()))?;
            // Generated keys must not collide with explicit keys further down the list.
            let explicit = KeyIndex::from_keys(items.iter().filter_map(|item| item.key.clone()));
            let mut block = SeriesItems::default();
            for SeriesItem { key, x, y } in items {
                let key = match key {
                    Some(key) => key,
                    None => loop {
                        let candidate = block.fresh_key();
                        if !explicit.contains(&candidate) {
                            break candidate;
                        }
                    },
                };
                block.push(key, x, y);
            }
            series.push(series_key);
            data.push(block);
        }

        self.series = series;
        self.data = data;
        self.properties.clear();
        self.series_properties.clear_all();
        self.item_properties.clear_all();
        self.selections.clear_all();
        tracing::debug!(target: targets::XY, series = self.series.len(), "loaded");
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    pub fn to_payload(&self) -> SeriesPayload {
        SeriesPayload {
            series: self
                .series
                .iter()
                .zip(&self.data)
                .map(|(series_key, block)| SeriesEntry {
                    series_key: series_key.to_string(),
                    items: (0..block.len())
                        .filter_map(|i| block.item(i))
                        .map(|item| SeriesItem { key: Some(item.key), x: item.x, y: item.y })
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_payload())?)
    }
}
