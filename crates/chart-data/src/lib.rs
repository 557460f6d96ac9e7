// File: crates/chart-data/src/lib.rs
// Summary: Data library entry point; exports keyed stores, overlays, and pivot transforms.

pub mod error;
pub mod types;
pub mod index;
pub mod properties;
pub mod selection;
pub mod listener;
pub mod payload;
pub mod store1d;
pub mod store2d;
pub mod store3d;
pub mod xy;
pub mod pivot;

pub use error::{DataError, Result};
pub use types::{ExtractOptions, DEFAULT_SERIES_KEY};
pub use index::KeyIndex;
pub use properties::{Properties, PropertyOverlay};
pub use selection::SelectionOverlay;
pub use listener::{ListenerId, Listeners};
pub use store1d::KeyedValues;
pub use store2d::KeyedValues2D;
pub use store3d::KeyedValues3D;
pub use xy::{KeyedSeries, XYItem};
pub use pivot::{
    extract_column_values, extract_row_values, extract_stack_base_values,
    extract_xy_from_columns, extract_xy_from_columns_2d, extract_xy_from_rows,
    extract_xy_from_rows_2d,
};
