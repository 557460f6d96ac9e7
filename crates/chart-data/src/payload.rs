// File: crates/chart-data/src/payload.rs
// Summary: Serializable payload shapes accepted by `load`/`parse` and produced by `to_payload`.
// Notes:
// - Field names are camelCase on the wire. Every field defaults, so `{}` is a
//   valid (empty) payload for the table, cube and series shapes.
// - `null` values are absent cells.

use serde::{Deserialize, Serialize};

/// One `{key, value}` entry of a 1D payload (the payload itself is a list).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyedValue {
    pub key: String,
    #[serde(default)]
    pub value: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePayload {
    #[serde(default)]
    pub column_keys: Vec<String>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub key: String,
    #[serde(default)]
    pub values: Vec<Option<f64>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CubePayload {
    #[serde(default)]
    pub column_keys: Vec<String>,
    /// Global row order; rows found only inside `series` are appended after these.
    #[serde(default)]
    pub row_keys: Vec<String>,
    #[serde(default)]
    pub series: Vec<CubeSeries>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeSeries {
    pub series_key: String,
    #[serde(default)]
    pub rows: Vec<CubeRow>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeRow {
    pub row_key: String,
    #[serde(default)]
    pub values: Vec<Option<f64>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesPayload {
    #[serde(default)]
    pub series: Vec<SeriesEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesEntry {
    pub series_key: String,
    #[serde(default)]
    pub items: Vec<SeriesItem>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesItem {
    /// Omitted keys are generated on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

/// Pad `values` with absence up to `width`; error if it is longer.
pub(crate) fn fit_row(
    mut values: Vec<Option<f64>>,
    width: usize,
    row_key: &str,
) -> crate::Result<Vec<Option<f64>>> {
    if values.len() > width {
        return Err(crate::DataError::Shape(format!(
            "row '{row_key}' has {} values but only {width} column keys",
            values.len()
        )));
    }
    if values.len() < width {
        tracing::warn!(
            row = row_key,
            have = values.len(),
            want = width,
            "short payload row padded with absent values"
        );
        values.resize(width, None);
    }
    Ok(values)
}

/// Reject a key list that repeats a key.
pub(crate) fn check_unique<'a>(keys: impl IntoIterator<Item = &'a String>) -> crate::Result<()> {
    let mut seen = rustc_hash::FxHashSet::default();
    for key in keys {
        if !seen.insert(key.as_str()) {
            return Err(crate::DataError::duplicate(key.clone()));
        }
    }
    Ok(())
}
