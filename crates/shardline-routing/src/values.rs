//! Immutable routing input handed to sharding strategies.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::Serialize;

use crate::range::Range;
use crate::scalar::Scalar;
use crate::scope::BinaryLogic;

/// Candidates for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnValues {
    /// Discrete candidates, sorted.
    pub scalars: Vec<Scalar>,
    /// Disjoint candidate intervals, sorted by lower bound.
    pub ranges: Vec<Range>,
    /// Scalars pushed into the column, including ones optimized away.
    pub scalar_count: usize,
    /// Ranges pushed into the column, including ones optimized away.
    pub range_count: usize,
    /// The logic the column was last combined under.
    pub logic: BinaryLogic,
}

impl ColumnValues {
    /// Returns true if at least one value can satisfy the column's predicates.
    pub fn has_candidates(&self) -> bool {
        !self.scalars.is_empty() || !self.ranges.is_empty()
    }
}

/// Per-column candidates of one table.
///
/// Columns never mentioned by a predicate are absent, which a strategy must
/// read as "unconstrained". A present column with no candidates means no
/// row can match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShardingValues {
    table: String,
    columns: BTreeMap<String, ColumnValues>,
}

impl ShardingValues {
    pub(crate) fn new(table: String, columns: BTreeMap<String, ColumnValues>) -> Self {
        Self { table, columns }
    }

    /// Values for a table no predicate constrained.
    pub fn unconstrained(table: impl Into<String>) -> Self {
        Self::new(table.into(), BTreeMap::new())
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn column(&self, column: &str) -> Option<&ColumnValues> {
        self.columns.get(column)
    }

    /// Constrained column names, sorted.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn scalar_values(&self, column: &str) -> &[Scalar] {
        self.columns
            .get(column)
            .map(|c| c.scalars.as_slice())
            .unwrap_or_default()
    }

    pub fn range_values(&self, column: &str) -> &[Range] {
        self.columns
            .get(column)
            .map(|c| c.ranges.as_slice())
            .unwrap_or_default()
    }

    pub fn logic(&self, column: &str) -> Option<BinaryLogic> {
        self.columns.get(column).map(|c| c.logic)
    }

    pub fn scalar_count(&self, column: &str) -> usize {
        self.columns.get(column).map_or(0, |c| c.scalar_count)
    }

    pub fn range_count(&self, column: &str) -> usize {
        self.columns.get(column).map_or(0, |c| c.range_count)
    }

    pub fn total_scalar_count(&self) -> usize {
        self.columns.values().map(|c| c.scalar_count).sum()
    }

    pub fn total_range_count(&self) -> usize {
        self.columns.values().map(|c| c.range_count).sum()
    }

    /// Returns true if `column` is unconstrained or still has candidates.
    pub fn has_candidates(&self, column: &str) -> bool {
        self.columns
            .get(column)
            .is_none_or(ColumnValues::has_candidates)
    }

    /// Returns true if no column is constrained.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Display for ShardingValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table)?;
        if self.columns.is_empty() {
            return f.write_str(": unconstrained");
        }
        for (name, column) in &self.columns {
            write!(f, "\n  {name} {}: {{", column.logic)?;
            let mut first = true;
            for scalar in &column.scalars {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{scalar}")?;
                first = false;
            }
            for range in &column.ranges {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{range}")?;
                first = false;
            }
            f.write_str("}")?;
        }
        Ok(())
    }
}
