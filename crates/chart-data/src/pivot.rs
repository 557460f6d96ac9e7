// File: crates/chart-data/src/pivot.rs
// Summary: Stateless transforms from 2D/3D tables into stacked baselines, 1D values and XY series.
// Notes:
// - Extracted XY items are keyed by the row (or column) key they came from.
// - Table pivots emit one item per row (or column), absent cells included.
// - Cube pivots skip rows (or columns) whose x cell is absent; an absent y is kept.
// - Properties are copied row/column scope first, then the x cell, then the y
//   cell, so a later scope overrides an earlier one on name clashes.

use serde_json::{Map, Value};

use crate::error::{DataError, Result};
use crate::store1d::KeyedValues;
use crate::store2d::KeyedValues2D;
use crate::store3d::KeyedValues3D;
use crate::types::{targets, ExtractOptions, SYMBOLS_PROPERTY, X_SYMBOLS_PROPERTY, Y_SYMBOLS_PROPERTY};
use crate::xy::KeyedSeries;

/// Per-cell baselines for drawing the rows of `source` stacked on one another.
///
/// Each column is walked in row order with a positive and a negative running
/// base, both starting at `baseline`. The first row is the reference layer and
/// always gets `baseline`. Every later row gets the positive base when its own
/// value is >= 0 and the negative base otherwise. After emitting, a strictly
/// positive value advances the positive base and a strictly negative value the
/// negative base. Absent cells stack like zero.
pub fn extract_stack_base_values(source: &KeyedValues2D, baseline: f64) -> KeyedValues2D {
    let rows = source.row_count();
    let columns = source.column_count();
    let mut grid = vec![vec![None; columns]; rows];
    for c in 0..columns {
        let mut pos_base = baseline;
        let mut neg_base = baseline;
        for (r, out) in grid.iter_mut().enumerate() {
            let v = source.value(r, c).unwrap_or(0.0);
            let base = if r == 0 {
                baseline
            } else if v >= 0.0 {
                pos_base
            } else {
                neg_base
            };
            out[c] = Some(base);
            if v > 0.0 {
                pos_base += v;
            } else if v < 0.0 {
                neg_base += v;
            }
        }
    }
    tracing::debug!(target: targets::PIVOT, rows, columns, baseline, "stack base values extracted");
    KeyedValues2D::from_grid(source.row_keys(), source.column_keys(), grid)
}

/// One row of a table as 1D values keyed by column key.
pub fn extract_row_values(source: &KeyedValues2D, row_key: &str) -> Result<KeyedValues> {
    let r = source.row_index(row_key).ok_or_else(|| DataError::not_found(row_key))?;
    let mut out = KeyedValues::new();
    for (c, column_key) in source.column_keys().iter().enumerate() {
        out.add(column_key, source.value(r, c), false);
        if let Some(props) = source.item_properties(row_key, column_key) {
            for (name, value) in props {
                out.set_item_property(column_key, name, value.clone(), false)?;
            }
        }
    }
    Ok(out)
}

/// One column of a table as 1D values keyed by row key.
pub fn extract_column_values(source: &KeyedValues2D, column_key: &str) -> Result<KeyedValues> {
    let c = source.column_index(column_key).ok_or_else(|| DataError::not_found(column_key))?;
    let mut out = KeyedValues::new();
    for (r, row_key) in source.row_keys().iter().enumerate() {
        out.add(row_key, source.value(r, c), false);
        if let Some(props) = source.item_properties(row_key, column_key) {
            for (name, value) in props {
                out.set_item_property(row_key, name, value.clone(), false)?;
            }
        }
    }
    Ok(out)
}

/// Pair two columns of a table into one XY series: one item per row, x from
/// `x_column`, y from `y_column`. Absent cells become absent coordinates.
pub fn extract_xy_from_columns_2d(
    source: &KeyedValues2D,
    x_column: &str,
    y_column: &str,
    options: &ExtractOptions,
) -> Result<KeyedSeries> {
    let xc = source.column_index(x_column).ok_or_else(|| DataError::not_found(x_column))?;
    let yc = source.column_index(y_column).ok_or_else(|| DataError::not_found(y_column))?;
    let series_key = options.series_key.as_str();
    let mut out = KeyedSeries::new();
    out.add_series(series_key, false)?;
    for (r, row_key) in source.row_keys().iter().enumerate() {
        out.add_by_key(series_key, row_key, source.value(r, xc), source.value(r, yc), false);
        if options.carry_properties {
            let scopes = [
                source.row_properties(row_key),
                source.item_properties(row_key, x_column),
                source.item_properties(row_key, y_column),
            ];
            copy_item_properties(&mut out, series_key, row_key, &scopes)?;
        }
    }
    copy_symbols(&mut out, source.get_column_property(x_column, SYMBOLS_PROPERTY), X_SYMBOLS_PROPERTY);
    copy_symbols(&mut out, source.get_column_property(y_column, SYMBOLS_PROPERTY), Y_SYMBOLS_PROPERTY);
    tracing::debug!(
        target: targets::PIVOT,
        x = x_column,
        y = y_column,
        items = out.item_count(0),
        "xy extracted from columns"
    );
    Ok(out)
}

/// Pair two rows of a table into one XY series: one item per column.
pub fn extract_xy_from_rows_2d(
    source: &KeyedValues2D,
    x_row: &str,
    y_row: &str,
    options: &ExtractOptions,
) -> Result<KeyedSeries> {
    let xr = source.row_index(x_row).ok_or_else(|| DataError::not_found(x_row))?;
    let yr = source.row_index(y_row).ok_or_else(|| DataError::not_found(y_row))?;
    let series_key = options.series_key.as_str();
    let mut out = KeyedSeries::new();
    out.add_series(series_key, false)?;
    for (c, column_key) in source.column_keys().iter().enumerate() {
        out.add_by_key(series_key, column_key, source.value(xr, c), source.value(yr, c), false);
        if options.carry_properties {
            let scopes = [
                source.column_properties(column_key),
                source.item_properties(x_row, column_key),
                source.item_properties(y_row, column_key),
            ];
            copy_item_properties(&mut out, series_key, column_key, &scopes)?;
        }
    }
    copy_symbols(&mut out, source.get_row_property(x_row, SYMBOLS_PROPERTY), X_SYMBOLS_PROPERTY);
    copy_symbols(&mut out, source.get_row_property(y_row, SYMBOLS_PROPERTY), Y_SYMBOLS_PROPERTY);
    tracing::debug!(
        target: targets::PIVOT,
        x = x_row,
        y = y_row,
        items = out.item_count(0),
        "xy extracted from rows"
    );
    Ok(out)
}

/// Pair two columns of a cube into XY series, one output series per input series.
/// Rows missing from a series, or whose x cell is absent, produce no item.
pub fn extract_xy_from_columns(
    source: &KeyedValues3D,
    x_column: &str,
    y_column: &str,
    options: &ExtractOptions,
) -> Result<KeyedSeries> {
    if source.column_index(x_column).is_none() {
        return Err(DataError::not_found(x_column));
    }
    if source.column_index(y_column).is_none() {
        return Err(DataError::not_found(y_column));
    }
    let mut out = KeyedSeries::new();
    for series_key in source.series_keys() {
        out.add_series(series_key, false)?;
        let rows = source.series_row_keys(series_key).unwrap_or_default();
        for row_key in rows {
            let Some(x) = source.value_by_key(series_key, row_key, x_column) else { continue };
            let y = source.value_by_key(series_key, row_key, y_column);
            out.add_by_key(series_key, row_key, Some(x), y, false);
            if options.carry_properties {
                let scopes = [
                    source.properties(series_key, row_key, x_column),
                    source.properties(series_key, row_key, y_column),
                ];
                copy_item_properties(&mut out, series_key, row_key, &scopes)?;
            }
        }
    }
    tracing::debug!(target: targets::PIVOT, x = x_column, y = y_column, series = out.series_count(), "xy extracted from cube columns");
    Ok(out)
}

/// Pair two rows of a cube into XY series, one output series per input series.
/// Series lacking the x row produce an empty series.
pub fn extract_xy_from_rows(
    source: &KeyedValues3D,
    x_row: &str,
    y_row: &str,
    options: &ExtractOptions,
) -> Result<KeyedSeries> {
    if source.row_index(x_row).is_none() {
        return Err(DataError::not_found(x_row));
    }
    if source.row_index(y_row).is_none() {
        return Err(DataError::not_found(y_row));
    }
    let mut out = KeyedSeries::new();
    for series_key in source.series_keys() {
        out.add_series(series_key, false)?;
        for column_key in source.column_keys() {
            let Some(x) = source.value_by_key(series_key, x_row, column_key) else { continue };
            let y = source.value_by_key(series_key, y_row, column_key);
            out.add_by_key(series_key, column_key, Some(x), y, false);
            if options.carry_properties {
                let scopes = [
                    source.properties(series_key, x_row, column_key),
                    source.properties(series_key, y_row, column_key),
                ];
                copy_item_properties(&mut out, series_key, column_key, &scopes)?;
            }
        }
    }
    tracing::debug!(target: targets::PIVOT, x = x_row, y = y_row, series = out.series_count(), "xy extracted from cube rows");
    Ok(out)
}

fn copy_item_properties(
    out: &mut KeyedSeries,
    series_key: &str,
    item_key: &str,
    scopes: &[Option<&Map<String, Value>>],
) -> Result<()> {
    for props in scopes.iter().flatten() {
        for (name, value) in props.iter() {
            out.set_item_property(series_key, item_key, name, value.clone(), false)?;
        }
    }
    Ok(())
}

fn copy_symbols(out: &mut KeyedSeries, symbols: Option<&Value>, target: &str) {
    if let Some(symbols) = symbols {
        out.set_property(target, symbols.clone(), false);
    }
}
