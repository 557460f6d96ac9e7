// File: crates/chart-data/src/store3d.rs
// Summary: Series x row x column cube of keyed values with per-series row sparsity.
// Notes:
// - Column keys are global: every row of every series has `column_count()` cells.
// - Rows are per series. A row key known to one series may be missing from
//   another; lookups through the missing pair resolve to absence.
// - The global row index is the union of all series' rows in first-seen order.

use serde_json::Value;

use crate::error::{DataError, Result};
use crate::index::KeyIndex;
use crate::listener::{ListenerId, Listeners};
use crate::payload::{check_unique, fit_row, CubePayload, CubeRow, CubeSeries};
use crate::properties::{Properties, PropertyOverlay};
use crate::selection::SelectionOverlay;
use crate::types::targets;

/// Cell identity: `(series key, row key, column key)`.
pub type CubeKey = (String, String, String);

fn cube_key(series_key: &str, row_key: &str, column_key: &str) -> CubeKey {
    (series_key.to_string(), row_key.to_string(), column_key.to_string())
}

/// Rows present in one series.
#[derive(Clone, Debug, Default)]
struct SeriesRows {
    rows: KeyIndex,
    values: Vec<Vec<Option<f64>>>,
}

impl SeriesRows {
    fn value(&self, row_key: &str, column: usize) -> Option<f64> {
        let r = self.rows.position_of(row_key)?;
        self.values[r].get(column).copied().flatten()
    }
}

#[derive(Clone, Debug, Default)]
pub struct KeyedValues3D {
    series: KeyIndex,
    rows: KeyIndex,
    columns: KeyIndex,
    data: Vec<SeriesRows>,
    properties: Properties,
    item_properties: PropertyOverlay<CubeKey>,
    selections: SelectionOverlay<CubeKey>,
    listeners: Listeners<KeyedValues3D>,
}

impl KeyedValues3D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_payload(payload: CubePayload) -> Result<Self> {
        let mut out = Self::new();
        out.load(payload, false)?;
        Ok(out)
    }

    pub fn series_count(&self) -> usize { self.series.len() }

    /// Number of distinct row keys across all series.
    pub fn row_count(&self) -> usize { self.rows.len() }

    pub fn column_count(&self) -> usize { self.columns.len() }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty() && self.rows.is_empty() && self.columns.is_empty()
    }

    pub fn series_keys(&self) -> &[String] { self.series.keys() }

    pub fn row_keys(&self) -> &[String] { self.rows.keys() }

    pub fn column_keys(&self) -> &[String] { self.columns.keys() }

    pub fn series_key(&self, series: usize) -> Option<&str> { self.series.key_at(series) }

    pub fn row_key(&self, row: usize) -> Option<&str> { self.rows.key_at(row) }

    pub fn column_key(&self, column: usize) -> Option<&str> { self.columns.key_at(column) }

    pub fn series_index(&self, series_key: &str) -> Option<usize> { self.series.position_of(series_key) }

    pub fn row_index(&self, row_key: &str) -> Option<usize> { self.rows.position_of(row_key) }

    pub fn column_index(&self, column_key: &str) -> Option<usize> { self.columns.position_of(column_key) }

    /// Row keys present in one series, in that series' order.
    pub fn series_row_keys(&self, series_key: &str) -> Option<&[String]> {
        let s = self.series.position_of(series_key)?;
        Some(self.data[s].rows.keys())
    }

    /// Whether `row_key` exists within `series_key` (not merely globally).
    pub fn has_row(&self, series_key: &str, row_key: &str) -> bool {
        self.series
            .position_of(series_key)
            .is_some_and(|s| self.data[s].rows.contains(row_key))
    }

    /// Cell by positions; `row` is a global row position.
    pub fn value(&self, series: usize, row: usize, column: usize) -> Option<f64> {
        let row_key = self.rows.key_at(row)?;
        self.data.get(series)?.value(row_key, column)
    }

    /// Cell by keys; absent when any key is unknown or the row is not in that series.
    pub fn value_by_key(&self, series_key: &str, row_key: &str, column_key: &str) -> Option<f64> {
        let s = self.series.position_of(series_key)?;
        let c = self.columns.position_of(column_key)?;
        self.data[s].value(row_key, c)
    }

    /// Add or update one cell.
    ///
    /// Unknown series are created empty; an unknown column is appended and every
    /// row of every series is backfilled; an unknown row is appended to the target
    /// series only.
    pub fn add(&mut self, series_key: &str, row_key: &str, column_key: &str, value: Option<f64>, notify: bool) {
        let s = match self.series.position_of(series_key) {
            Some(s) => s,
            None => {
                let s = self.series.push(series_key);
                self.data.push(SeriesRows::default());
                tracing::trace!(target: targets::STORE3D, series = series_key, "series created");
                s
            }
        };
        let c = match self.columns.position_of(column_key) {
            Some(c) => c,
            None => {
                let c = self.columns.push(column_key);
                for series in &mut self.data {
                    for row in &mut series.values {
                        row.push(None);
                    }
                }
                tracing::trace!(target: targets::STORE3D, column = column_key, "column appended");
                c
            }
        };
        let width = self.columns.len();
        let target = &mut self.data[s];
        let r = match target.rows.position_of(row_key) {
            Some(r) => r,
            None => {
                let r = target.rows.push(row_key);
                target.values.push(vec![None; width]);
                self.rows.push(row_key);
                tracing::trace!(target: targets::STORE3D, series = series_key, row = row_key, "row appended");
                r
            }
        };
        target.values[r][c] = value;
        if notify {
            self.notify_listeners();
        }
    }

    // ---- properties -------------------------------------------------------

    pub fn get_dataset_property(&self, name: &str) -> Option<&Value> { self.properties.get(name) }

    pub fn set_dataset_property(&mut self, name: &str, value: Value, notify: bool) {
        self.properties.set(name, value);
        if notify {
            self.notify_listeners();
        }
    }

    pub fn dataset_property_keys(&self) -> Vec<String> { self.properties.keys() }

    pub fn get_property(&self, series_key: &str, row_key: &str, column_key: &str, name: &str) -> Option<&Value> {
        self.item_properties.get(&cube_key(series_key, row_key, column_key), name)
    }

    /// Set a cell property. The row must exist within the series.
    pub fn set_property(
        &mut self,
        series_key: &str,
        row_key: &str,
        column_key: &str,
        name: &str,
        value: Value,
        notify: bool,
    ) -> Result<()> {
        if !self.has_row(series_key, row_key) {
            return Err(DataError::not_found(format!("{series_key}/{row_key}")));
        }
        if !self.columns.contains(column_key) {
            return Err(DataError::not_found(column_key));
        }
        self.item_properties.set(cube_key(series_key, row_key, column_key), name, value);
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    pub fn property_keys(&self, series_key: &str, row_key: &str, column_key: &str) -> Vec<String> {
        self.item_properties.keys(&cube_key(series_key, row_key, column_key))
    }

    pub fn clear_properties(&mut self, series_key: &str, row_key: &str, column_key: &str, notify: bool) {
        self.item_properties.clear(&cube_key(series_key, row_key, column_key));
        if notify {
            self.notify_listeners();
        }
    }

    pub fn properties(&self, series_key: &str, row_key: &str, column_key: &str) -> Option<&serde_json::Map<String, Value>> {
        self.item_properties.scope(&cube_key(series_key, row_key, column_key))
    }

    // ---- selections -------------------------------------------------------

    pub fn select(&mut self, selection_id: &str, series_key: &str, row_key: &str, column_key: &str, notify: bool) {
        self.selections.select(selection_id, cube_key(series_key, row_key, column_key));
        if notify {
            self.notify_listeners();
        }
    }

    pub fn unselect(&mut self, selection_id: &str, series_key: &str, row_key: &str, column_key: &str, notify: bool) {
        self.selections.unselect(selection_id, &cube_key(series_key, row_key, column_key));
        if notify {
            self.notify_listeners();
        }
    }

    pub fn is_selected(&self, selection_id: &str, series_key: &str, row_key: &str, column_key: &str) -> bool {
        self.selections.is_selected(selection_id, &cube_key(series_key, row_key, column_key))
    }

    pub fn clear_selection(&mut self, selection_id: &str, notify: bool) {
        self.selections.clear_selection(selection_id);
        if notify {
            self.notify_listeners();
        }
    }

    pub fn selection(&self) -> &SelectionOverlay<CubeKey> { &self.selections }

    // ---- listeners --------------------------------------------------------

    pub fn add_listener<F>(&mut self, callback: F) -> ListenerId
    where
        F: Fn(&KeyedValues3D) + 'static,
    {
        self.listeners.add(callback)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool { self.listeners.remove(id) }

    pub fn listener_count(&self) -> usize { self.listeners.len() }

    pub fn notify_listeners(&self) { self.listeners.notify(self) }

    // ---- payloads ---------------------------------------------------------

    pub fn parse(&mut self, json: &str, notify: bool) -> Result<()> {
        let payload: CubePayload = serde_json::from_str(json)?;
        self.load(payload, notify)
    }

    /// Replace the cube from a payload; properties and selections are fully reset.
    /// On error the cube is left unchanged.
    pub fn load(&mut self, payload: CubePayload, notify: bool) -> Result<()> {
        let CubePayload { column_keys, row_keys, series } = payload;
        check_unique(&column_keys)?;
        check_unique(&row_keys)?;
        check_unique(series.iter().map(|s| &s.series_key))?;

        let width = column_keys.len();
        let mut rows = KeyIndex::from_keys(row_keys);
        let mut series_index = KeyIndex::new();
        let mut data = Vec::with_capacity(series.len());
        for CubeSeries { series_key, rows: series_rows } in series {
            check_unique(series_rows.iter().map(|r| &r.row_key))?;
            let mut block = SeriesRows::default();
            for CubeRow { row_key, values } in series_rows {
                block.values.push(fit_row(values, width, &row_key)?);
                rows.push(row_key.as_str());
                block.rows.push(row_key);
            }
            series_index.push(series_key);
            data.push(block);
        }

        self.series = series_index;
        self.rows = rows;
        self.columns = KeyIndex::from_keys(column_keys);
        self.data = data;
        self.properties.clear();
        self.item_properties.clear_all();
        self.selections.clear_all();
        tracing::debug!(
            target: targets::STORE3D,
            series = self.series.len(),
            rows = self.rows.len(),
            columns = self.columns.len(),
            "loaded"
        );
        if notify {
            self.notify_listeners();
        }
        Ok(())
    }

    pub fn to_payload(&self) -> CubePayload {
        CubePayload {
            column_keys: self.columns.keys().to_vec(),
            row_keys: self.rows.keys().to_vec(),
            series: self
                .series
                .iter()
                .zip(&self.data)
                .map(|(series_key, block)| CubeSeries {
                    series_key: series_key.to_string(),
                    rows: block
                        .rows
                        .iter()
                        .zip(&block.values)
                        .map(|(row_key, values)| CubeRow { row_key: row_key.to_string(), values: values.clone() })
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_payload())?)
    }
}
