//! Which tables are sharded, and on which columns.

use std::collections::BTreeMap;

use shardline_routing::ScalarKind;

/// Sharding columns per table.
///
/// Names are stored lowercased; lookups are case-insensitive like MySQL
/// identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardingSchema {
    tables: BTreeMap<String, BTreeMap<String, ScalarKind>>,
}

impl ShardingSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `column` of `table` as a sharding column.
    #[must_use]
    pub fn column(mut self, table: &str, column: &str, kind: ScalarKind) -> Self {
        self.add_column(table, column, kind);
        self
    }

    pub fn add_column(&mut self, table: &str, column: &str, kind: ScalarKind) {
        self.tables
            .entry(table.to_lowercase())
            .or_default()
            .insert(column.to_lowercase(), kind);
    }

    pub fn is_sharded(&self, table: &str) -> bool {
        self.tables.contains_key(&table.to_lowercase())
    }

    /// Returns the declared kind of a sharding column.
    pub fn column_kind(&self, table: &str, column: &str) -> Option<ScalarKind> {
        self.tables
            .get(&table.to_lowercase())
            .and_then(|columns| columns.get(&column.to_lowercase()))
            .copied()
    }

    /// Sharded table names, sorted.
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
