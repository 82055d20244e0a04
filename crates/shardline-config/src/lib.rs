//! Configuration management for shardline
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. Environment variables (SHARDLINE_* prefix, `__` between sections)
//! 2. shardline.local.toml (gitignored, local overrides)
//! 3. shardline.toml (git-tracked, project config)
//! 4. ~/.config/shardline/config.toml (user defaults)
//! 5. Built-in defaults (lowest precedence)
//!
//! ```toml
//! [router]
//! max_condition_depth = 128
//! nullable_in_list = true
//!
//! [[tables]]
//! name = "orders"
//! columns = [{ name = "user_id", kind = "signed" }]
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Default for [`RouterConfig::max_condition_depth`].
pub const DEFAULT_MAX_CONDITION_DEPTH: usize = 128;

/// Main shardline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardlineConfig {
    pub router: RouterConfig,
    pub tables: Vec<TableConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Deepest AND/OR nesting a condition may have.
    pub max_condition_depth: usize,
    /// Skip `NULL` bind values inside `IN (...)` instead of failing.
    pub nullable_in_list: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_condition_depth: DEFAULT_MAX_CONDITION_DEPTH,
            nullable_in_list: true,
        }
    }
}

/// A sharded table and its sharding columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

impl TableConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    #[must_use]
    pub fn column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.push(ColumnConfig {
            name: name.into(),
            kind,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    pub kind: ColumnKind,
}

/// Value domain of a sharding column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnKind {
    Signed,
    Unsigned,
    Float,
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Signed => "signed",
            ColumnKind::Unsigned => "unsigned",
            ColumnKind::Float => "float",
            ColumnKind::Text => "text",
        };
        f.write_str(name)
    }
}

impl ShardlineConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from specific project directory
    pub fn load_from_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(project_dir).load()
    }

    /// Parse a single TOML file, without layering or validation.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Create a development configuration
    pub fn development() -> Self {
        Self {
            router: RouterConfig {
                max_condition_depth: DEFAULT_MAX_CONDITION_DEPTH,
                nullable_in_list: true,
            },
            ..Default::default()
        }
    }

    /// Create a production configuration
    pub fn production() -> Self {
        Self {
            router: RouterConfig {
                max_condition_depth: 64,
                nullable_in_list: true,
            },
            ..Default::default()
        }
    }

    /// Add a sharded table
    #[must_use]
    pub fn with_table(mut self, table: TableConfig) -> Self {
        self.tables.push(table);
        self
    }

    /// Check the configuration for conflicts the router cannot resolve.
    ///
    /// Table and column names compare case-insensitively.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.router.max_condition_depth == 0 {
            return Err(ConfigError::ValidationError(
                "router.max_condition_depth must be at least 1".to_string(),
            ));
        }

        let mut tables = BTreeSet::new();
        for table in &self.tables {
            let table_name = table.name.trim().to_lowercase();
            if table_name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "table name must not be empty".to_string(),
                ));
            }
            if !tables.insert(table_name) {
                return Err(ConfigError::DuplicateTable(table.name.clone()));
            }
            if table.columns.is_empty() {
                return Err(ConfigError::NoColumns(table.name.clone()));
            }

            let mut columns = BTreeSet::new();
            for column in &table.columns {
                let column_name = column.name.trim().to_lowercase();
                if column_name.is_empty() {
                    return Err(ConfigError::ValidationError(format!(
                        "table '{}' has a column with an empty name",
                        table.name
                    )));
                }
                if !columns.insert(column_name) {
                    return Err(ConfigError::DuplicateColumn {
                        table: table.name.clone(),
                        column: column.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
