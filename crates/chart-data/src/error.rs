// File: crates/chart-data/src/error.rs
// Summary: Error type shared by every store; soft lookups never produce one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    /// A structural call tried to create a key that already exists.
    #[error("duplicate key '{key}'")]
    DuplicateKey { key: String },

    /// A structural call referenced a key that does not exist.
    #[error("key not found: '{key}'")]
    KeyNotFound { key: String },

    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Payload shape disagrees with its own key declarations.
    #[error("payload shape mismatch: {0}")]
    Shape(String),

    #[error("invalid payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl DataError {
    pub fn duplicate(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
