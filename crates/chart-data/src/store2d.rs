// File: crates/chart-data/src/store2d.rs
// Summary: Row x column table of keyed values with properties, selections and listeners.
// Notes:
// - Contract: after every call returns, `data.len() == row_count()` and every row
//   holds exactly `column_count()` cells.
// - Row, column and cell properties are keyed by their keys, not positions, so
//   structural inserts never shift them.

use serde_json::Value;

use crate::error::{DataError, Result};
use crate::index::KeyIndex;
use crate::listener::{ListenerId, Listeners};
use crate::payload::{check_unique, fit_row, TablePayload, TableRow};
use crate::properties::{Properties, PropertyOverlay};
use crate::selection::SelectionOverlay;
use crate::types::targets;

/// Cell identity used for item properties and selections: `(row key, column key)`.
pub type CellKey = (String, String);

fn cell_key(row_key: &str, column_key: &str) -> CellKey {
    (row_key.to_string(), column_key.to_string())
}

#[derive(Clone, Debug, Default)]
pub struct KeyedValues2D {
    rows: KeyIndex,
    columns: KeyIndex,
    data: Vec<Vec<Option<f64>>>,
    properties: Properties,
    row_properties: PropertyOverlay<String>,
    column_properties: PropertyOverlay<String>,
    item_properties: PropertyOverlay<CellKey>,
    selections: SelectionOverlay<CellKey>,
    listeners: Listeners<KeyedValues2D>,
}

impl KeyedValues2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_payload(payload: TablePayload) -> Result<Self> {
        let mut out = Self::new();
        out.load(payload, false)?;
        Ok(out)
    }

    /// Assemble a table from already-shaped parts (one row per key, each `column_keys.len()` wide).
    pub(crate) fn from_grid(row_keys: &[String], column_keys: &[String], data: Vec<Vec<Option<f64>>>) -> Self {
        let out = Self {
            rows: KeyIndex::from_keys(row_keys.iter().cloned()),
            columns: KeyIndex::from_keys(column_keys.iter().cloned()),
            data,
            ..Self::default()
        };
        debug_assert!(out.shape_ok());
        out
    }

    pub fn row_count(&self) -> usize { self.rows.len() }

    pub fn column_count(&self) -> usize { self.columns.len() }

    /// True when the table has no rows and no columns.
    pub fn is_empty(&self) -> bool { self.rows.is_empty() && self.columns.is_empty() }

    pub fn row_keys(&self) -> &[String] { self.rows.keys() }

    pub fn column_keys(&self) -> &[String] { self.columns.keys() }

    pub fn row_key(&self, row: usize) -> Option<&str> { self.rows.key_at(row) }

    pub fn column_key(&self, column: usize) -> Option<&str> { self.columns.key_at(column) }

    pub fn row_index(&self, row_key: &str) -> Option<usize> { self.rows.position_of(row_key) }

    pub fn column_index(&self, column_key: &str) -> Option<usize> { self.columns.position_of(column_key) }

    /// Cell at `(row, column)` positions; `None` when absent or out of range.
    #[inline]
    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    /// Cell for `(row_key, column_key)`; `None` for unknown keys or an absent cell.
    pub fn value_by_key(&self, row_key: &str, column_key: &str) -> Option<f64> {
        let r = self.rows.position_of(row_key)?;
        let c = self.columns.position_of(column_key)?;
        self.value(r, c)
    }

    /// All cells of one row, in column order.
    pub fn row_values(&self, row: usize) -> Option<&[Option<f64>]> {
        self.data.get(row).map(Vec::as_slice)
    }

    /// Add or update one cell, growing the table as needed.
    ///
    /// A new column is appended first and every existing row is backfilled with
    /// an absent cell; a new row is then appended sized to the column count.
    /// Both are structural: positions handed out earlier may no longer be valid.
    pub fn add(&mut self, row_key: &str, column_key: &str, value: Option<f64>, notify: bool) {
        let c = match self.columns.position_of(column_key) {
            Some(c) => c,
            None => {
                let c = self.columns.push(column_key);
                for row in &mut self.data {
                    row.push(None);
                }
                tracing::trace!(target: targets::STORE2D, column = column_key, columns = self.columns.len(), "column appended");
                c
            }
        };
        let r = match self.rows.position_of(row_key) {
            Some(r) => r,
            None => {
                let r = self.rows.push(row_key);
                self.data.push(vec![None; self.columns.len()]);
                tracing::trace!(target: targets::STORE2D, row = row_key, rows = self.rows.len(), "row appended");
                r
            }
        };
        self.data[r][c] = value;
        debug_assert!(self.shape_ok());
        if notify {
            self.notify_listeners();
        }
    }

    /// Insert an all-absent row at `index`. An index past the end appends.
    pub fn insert_row(&mut self, row_key: &str, index: usize, notify: bool) -> Result<()> {
        if self.rows.contains(row_key) {
            return Err(DataError::duplicate(row_key));
        }
        let index = index.min(self.rows.len());
        self.rows.insert(index, row_key);
        self.data.insert(index, vec![None; self.columns.len()]);
        tracing::trace!(target: targets::STORE2D, row = row_key, index, "row inserted");
        debug_assert!(self.shape_ok());
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    /// Remove a row with its properties and any selections that reference it.
    pub fn remove_row(&mut self, row_key: &str, notify: bool) -> Result<()> {
        let r = self.rows.remove(row_key).ok_or_else(|| DataError::not_found(row_key))?;
        self.data.remove(r);
        self.row_properties.clear(row_key);
        self.item_properties.retain(|(row, _)| row != row_key);
        self.selections.retain(|(row, _)| row != row_key);
        tracing::trace!(target: targets::STORE2D, row = row_key, index = r, "row removed");
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    /// Remove a column from every row, with its properties and selections.
    pub fn remove_column(&mut self, column_key: &str, notify: bool) -> Result<()> {
        let c = self.columns.remove(column_key).ok_or_else(|| DataError::not_found(column_key))?;
        for row in &mut self.data {
            row.remove(c);
        }
        self.column_properties.clear(column_key);
        self.item_properties.retain(|(_, col)| col != column_key);
        self.selections.retain(|(_, col)| col != column_key);
        tracing::trace!(target: targets::STORE2D, column = column_key, index = c, "column removed");
        debug_assert!(self.shape_ok());
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    fn shape_ok(&self) -> bool {
        self.data.len() == self.rows.len() && self.data.iter().all(|r| r.len() == self.columns.len())
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

    pub fn get_row_property(&self, row_key: &str, name: &str) -> Option<&Value> {
        self.row_properties.get(row_key, name)
    }

    pub fn set_row_property(&mut self, row_key: &str, name: &str, value: Value, notify: bool) -> Result<()> {
        if !self.rows.contains(row_key) {
            return Err(DataError::not_found(row_key));
        }
        self.row_properties.set(row_key.to_string(), name, value);
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    pub fn row_property_keys(&self, row_key: &str) -> Vec<String> { self.row_properties.keys(row_key) }

    pub fn clear_row_properties(&mut self, row_key: &str, notify: bool) {
        self.row_properties.clear(row_key);
        if notify {
            self.notify_listeners();
        }
    }

    /// Whole property map of a row, if any property was set.
    pub fn row_properties(&self, row_key: &str) -> Option<&serde_json::Map<String, Value>> {
        self.row_properties.scope(row_key)
    }

    pub fn get_column_property(&self, column_key: &str, name: &str) -> Option<&Value> {
        self.column_properties.get(column_key, name)
    }

    pub fn set_column_property(&mut self, column_key: &str, name: &str, value: Value, notify: bool) -> Result<()> {
        if !self.columns.contains(column_key) {
            return Err(DataError::not_found(column_key));
        }
        self.column_properties.set(column_key.to_string(), name, value);
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    pub fn column_property_keys(&self, column_key: &str) -> Vec<String> {
        self.column_properties.keys(column_key)
    }

    pub fn clear_column_properties(&mut self, column_key: &str, notify: bool) {
        self.column_properties.clear(column_key);
        if notify {
            self.notify_listeners();
        }
    }

    pub fn column_properties(&self, column_key: &str) -> Option<&serde_json::Map<String, Value>> {
        self.column_properties.scope(column_key)
    }

    pub fn get_item_property(&self, row_key: &str, column_key: &str, name: &str) -> Option<&Value> {
        self.item_properties.get(&cell_key(row_key, column_key), name)
    }

    pub fn set_item_property(
        &mut self,
        row_key: &str,
        column_key: &str,
        name: &str,
        value: Value,
        notify: bool,
    ) -> Result<()> {
        if !self.rows.contains(row_key) {
            return Err(DataError::not_found(row_key));
        }
        if !self.columns.contains(column_key) {
            return Err(DataError::not_found(column_key));
        }
        self.item_properties.set(cell_key(row_key, column_key), name, value);
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    pub fn item_property_keys(&self, row_key: &str, column_key: &str) -> Vec<String> {
        self.item_properties.keys(&cell_key(row_key, column_key))
    }

    pub fn clear_item_properties(&mut self, row_key: &str, column_key: &str, notify: bool) {
        self.item_properties.clear(&cell_key(row_key, column_key));
        if notify {
            self.notify_listeners();
        }
    }

    pub fn item_properties(&self, row_key: &str, column_key: &str) -> Option<&serde_json::Map<String, Value>> {
        self.item_properties.scope(&cell_key(row_key, column_key))
    }

    // ---- selections -------------------------------------------------------

    pub fn select(&mut self, selection_id: &str, row_key: &str, column_key: &str, notify: bool) {
        self.selections.select(selection_id, cell_key(row_key, column_key));
        if notify {
            self.notify_listeners();
        }
    }

    pub fn unselect(&mut self, selection_id: &str, row_key: &str, column_key: &str, notify: bool) {
        self.selections.unselect(selection_id, &cell_key(row_key, column_key));
        if notify {
            self.notify_listeners();
        }
    }

    pub fn is_selected(&self, selection_id: &str, row_key: &str, column_key: &str) -> bool {
        self.selections.is_selected(selection_id, &cell_key(row_key, column_key))
    }

    pub fn clear_selection(&mut self, selection_id: &str, notify: bool) {
        self.selections.clear_selection(selection_id);
        if notify {
            self.notify_listeners();
        }
    }

    pub fn selection(&self) -> &SelectionOverlay<CellKey> { &self.selections }

    // ---- listeners --------------------------------------------------------

    pub fn add_listener<F>(&mut self, callback: F) -> ListenerId
    where
        F: Fn(&KeyedValues2D) + 'static,
    {
        self.listeners.add(callback)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool { self.listeners.remove(id) }

    pub fn listener_count(&self) -> usize { self.listeners.len() }

    pub fn notify_listeners(&self) { self.listeners.notify(self) }

    // ---- payloads ---------------------------------------------------------

    /// Replace the table from `{columnKeys, rows: [{key, values}]}`; `{}` empties it.
    pub fn parse(&mut self, json: &str, notify: bool) -> Result<()> {
        let payload: TablePayload = serde_json::from_str(json)?;
        self.load(payload, notify)
    }

    /// Replace the table. All properties and selections are reset.
    /// On error the table is left unchanged.
    pub fn load(&mut self, payload: TablePayload, notify: bool) -> Result<()> {
        let TablePayload { column_keys, rows } = payload;
        check_unique(&column_keys)?;
        check_unique(rows.iter().map(|r| &r.key))?;
        let width = column_keys.len();
        let mut row_keys = Vec::with_capacity(rows.len());
        let mut data = Vec::with_capacity(rows.len());
        for TableRow { key, values } in rows {
            data.push(fit_row(values, width, &key)?);
            row_keys.push(key);
        }

        self.rows.reset(row_keys);
        self.columns.reset(column_keys);
        self.data = data;
        self.properties.clear();
        self.row_properties.clear_all();
        self.column_properties.clear_all();
        self.item_properties.clear_all();
        self.selections.clear_all();
        tracing::debug!(
            target: targets::STORE2D,
            rows = self.rows.len(),
            columns = self.columns.len(),
            "loaded"
        );
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    pub fn to_payload(&self) -> TablePayload {
        TablePayload {
            column_keys: self.columns.keys().to_vec(),
            rows: self
                .rows
                .iter()
                .zip(&self.data)
                .map(|(key, values)| TableRow { key: key.to_string(), values: values.clone() })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_payload())?)
    }
}
