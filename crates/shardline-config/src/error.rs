//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config at {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Duplicate sharded table '{0}'")]
    DuplicateTable(String),

    #[error("Duplicate sharding column '{column}' on table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("Sharded table '{0}' declares no sharding columns")]
    NoColumns(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("XDG directory error: {0}")]
    XdgError(String),
}
