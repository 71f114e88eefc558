//! Error types for snapshot and config loading.

use thiserror::Error;

use crate::types::{HomesteadId, VillagerId};

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while loading or validating Hearth inputs.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("toml serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot format: {0}")]
    UnsupportedFormat(String),

    #[error("duplicate villager id: {0}")]
    DuplicateVillager(VillagerId),

    #[error("duplicate homestead id: {0}")]
    DuplicateHomestead(HomesteadId),
}
