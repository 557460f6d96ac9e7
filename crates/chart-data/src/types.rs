// File: crates/chart-data/src/types.rs
// Summary: Shared constants, logging targets, and option structs.

/// Series key used when an extraction is not given one.
pub const DEFAULT_SERIES_KEY: &str = "series 1";

/// Column/row property naming symbolic axis labels.
pub const SYMBOLS_PROPERTY: &str = "symbols";
/// Dataset property carrying the x column/row symbols onto an XY store.
pub const X_SYMBOLS_PROPERTY: &str = "x-symbols";
/// Dataset property carrying the y column/row symbols onto an XY store.
pub const Y_SYMBOLS_PROPERTY: &str = "y-symbols";

/// Target names for log filtering, e.g. `RUST_LOG=chart_data::store2d=trace`.
pub mod targets {
    pub const STORE1D: &str = "chart_data::store1d";
    pub const STORE2D: &str = "chart_data::store2d";
    pub const STORE3D: &str = "chart_data::store3d";
    pub const XY: &str = "chart_data::xy";
    pub const PIVOT: &str = "chart_data::pivot";
}

/// Options for the XY extraction functions in [`crate::pivot`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractOptions {
    /// Key of the output series (2D sources only; 3D sources keep their series keys).
    pub series_key: String,
    /// Copy row and cell properties onto the extracted items.
    pub carry_properties: bool,
}

impl ExtractOptions {
    pub fn with_series_key(series_key: impl Into<String>) -> Self {
        Self { series_key: series_key.into(), ..Self::default() }
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self { series_key: DEFAULT_SERIES_KEY.to_string(), carry_properties: true }
    }
}
