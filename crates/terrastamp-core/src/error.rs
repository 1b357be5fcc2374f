//! Error types for Terrastamp

use thiserror::Error;

use crate::id::StampId;

/// The main error type for Terrastamp operations
#[derive(Debug, Error)]
pub enum TerrastampError {
    #[error("Index out of range on axis {axis}: window {base}..{} exceeds extent {extent}", .base + .len)]
    IndexOutOfRange {
        axis: usize,
        base: usize,
        len: usize,
        extent: usize,
    },

    #[error("Dimension mismatch on axis {axis}: {left} != {right}")]
    DimensionMismatch {
        axis: usize,
        left: usize,
        right: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Heightmap error: {0}")]
    Heightmap(String),

    #[error("Stamp not found: {0}")]
    StampNotFound(StampId),

    #[error("Terrain grid has not been built")]
    GridNotBuilt,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for Terrastamp operations
pub type Result<T> = std::result::Result<T, TerrastampError>;

impl From<toml::de::Error> for TerrastampError {
    fn from(err: toml::de::Error) -> Self {
        TerrastampError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for TerrastampError {
    fn from(err: toml::ser::Error) -> Self {
        TerrastampError::TomlSerError(err.to_string())
    }
}
