//! Per-table accumulation of sharding candidates.
//!
//! A [`ShardingValuesBuilder`] folds predicates into, for every column, a set
//! of discrete scalars plus a sorted list of pairwise disjoint ranges. The
//! candidate set of a column is the union of both. The representation is
//! kept minimal: a scalar inside one of the column's ranges is dropped, and
//! overlapping or adjacent ranges are merged.
//!
//! The first contribution to a column is always taken verbatim, whatever
//! its logic: a column nobody has constrained yet has nothing to intersect
//! with.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, RoutingError};
use crate::scope::BinaryLogic;
use crate::range::Range;
use crate::scalar::{Scalar, ScalarKind};
use crate::value_ref::ResolvedValue;
use crate::values::{ColumnValues, ShardingValues};

/// Accumulated candidates for one column.
#[derive(Debug, Clone, Default)]
struct ColumnAccumulator {
    kind: Option<ScalarKind>,
    scalars: BTreeSet<Scalar>,
    /// Sorted by lower bound, pairwise disjoint and non-adjacent.
    ranges: Vec<Range>,
    scalar_count: usize,
    range_count: usize,
    logic: BinaryLogic,
}

impl ColumnAccumulator {
    fn new(logic: BinaryLogic) -> Self {
        Self {
            logic,
            ..Self::default()
        }
    }

    fn check_kind(&self, column: &str, kind: ScalarKind) -> Result<()> {
        match self.kind {
            Some(expected) if expected != kind => Err(RoutingError::ColumnKindMismatch {
                column: column.to_string(),
                expected,
                actual: kind,
            }),
            _ => Ok(()),
        }
    }

    fn adopt_kind(&mut self, kind: Option<ScalarKind>) {
        if self.kind.is_none() {
            self.kind = kind;
        }
    }

    fn covers(&self, value: &Scalar) -> Result<bool> {
        for range in &self.ranges {
            if range.contains_value(value)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn or_values(&mut self, values: &[Scalar]) -> Result<()> {
        for value in values {
            if !self.covers(value)? {
                self.scalars.insert(value.clone());
            }
        }
        Ok(())
    }

    fn or_range(&mut self, range: Range) -> Result<()> {
        let mut covered = Vec::new();
        for scalar in &self.scalars {
            if range.contains_value(scalar)? {
                covered.push(scalar.clone());
            }
        }
        for scalar in &covered {
            self.scalars.remove(scalar);
        }

        let mut merged = range;
        loop {
            let mut absorbed = None;
            for (index, existing) in self.ranges.iter().enumerate() {
                if let Some(union) = existing.union(&merged)? {
                    absorbed = Some((index, union));
                    break;
                }
            }
            match absorbed {
                Some((index, union)) => {
                    self.ranges.remove(index);
                    merged = union;
                }
                None => break,
            }
        }

        insert_sorted(&mut self.ranges, merged)
    }

    fn and_values(&mut self, values: &[Scalar]) -> Result<()> {
        let mut next = BTreeSet::new();

        // Values inside a current range survive regardless of the scalar set,
        // and no range survives an AND with a finite set.
        if !self.ranges.is_empty() {
            for value in values {
                if self.covers(value)? {
                    next.insert(value.clone());
                }
            }
            self.ranges.clear();
        }

        for value in values {
            if self.scalars.contains(value) {
                next.insert(value.clone());
            }
        }

        self.scalars = next;
        Ok(())
    }

    fn and_range(&mut self, range: &Range) -> Result<()> {
        let mut kept = BTreeSet::new();
        for scalar in &self.scalars {
            if range.contains_value(scalar)? {
                kept.insert(scalar.clone());
            }
        }
        self.scalars = kept;

        let mut next = Vec::with_capacity(self.ranges.len());
        for existing in &self.ranges {
            if let Some(overlap) = existing.intersect(range)? {
                next.push(overlap);
            }
        }
        self.ranges = next;
        Ok(())
    }

    /// Intersects this column's candidates with `other`'s.
    fn and_column(&mut self, other: &ColumnAccumulator) -> Result<()> {
        let mut scalars = BTreeSet::new();
        for scalar in &self.scalars {
            if other.scalars.contains(scalar) || other.covers(scalar)? {
                scalars.insert(scalar.clone());
            }
        }
        for scalar in &other.scalars {
            if self.covers(scalar)? {
                scalars.insert(scalar.clone());
            }
        }

        let mut ranges = Vec::new();
        for mine in &self.ranges {
            for theirs in &other.ranges {
                if let Some(overlap) = mine.intersect(theirs)? {
                    insert_sorted(&mut ranges, overlap)?;
                }
            }
        }

        self.scalars = scalars;
        self.ranges = ranges;

        let mut covered = Vec::new();
        for scalar in &self.scalars {
            if self.covers(scalar)? {
                covered.push(scalar.clone());
            }
        }
        for scalar in &covered {
            self.scalars.remove(scalar);
        }
        Ok(())
    }

    fn or_column(&mut self, other: &ColumnAccumulator) -> Result<()> {
        for range in &other.ranges {
            self.or_range(range.clone())?;
        }
        let scalars: Vec<Scalar> = other.scalars.iter().cloned().collect();
        self.or_values(&scalars)
    }

    fn snapshot(&self) -> ColumnValues {
        ColumnValues {
            scalars: self.scalars.iter().cloned().collect(),
            ranges: self.ranges.clone(),
            scalar_count: self.scalar_count,
            range_count: self.range_count,
            logic: self.logic,
        }
    }
}

fn insert_sorted(ranges: &mut Vec<Range>, range: Range) -> Result<()> {
    let mut position = ranges.len();
    for (index, existing) in ranges.iter().enumerate() {
        if existing.cmp_by_lower(&range)?.is_gt() {
            position = index;
            break;
        }
    }
    ranges.insert(position, range);
    Ok(())
}

fn values_kind(column: &str, values: &[Scalar]) -> Result<Option<ScalarKind>> {
    let Some(first) = values.first() else {
        return Ok(None);
    };
    let kind = first.kind();
    if let Some(other) = values.iter().find(|v| v.kind() != kind) {
        return Err(RoutingError::ColumnKindMismatch {
            column: column.to_string(),
            expected: kind,
            actual: other.kind(),
        });
    }
    Ok(Some(kind))
}

/// Folds predicates on one table into per-column candidate sets.
#[derive(Debug, Clone)]
pub struct ShardingValuesBuilder {
    table: String,
    columns: BTreeMap<String, ColumnAccumulator>,
}

impl ShardingValuesBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: BTreeMap::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns true if no column has been constrained.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Validates the kind and returns the column plus whether it is new.
    fn column_for(
        &mut self,
        column: &str,
        kind: Option<ScalarKind>,
        logic: BinaryLogic,
    ) -> Result<(&mut ColumnAccumulator, bool)> {
        if let (Some(existing), Some(kind)) = (self.columns.get(column), kind) {
            existing.check_kind(column, kind)?;
        }
        let fresh = !self.columns.contains_key(column);
        let accumulator = self
            .columns
            .entry(column.to_string())
            .or_insert_with(|| ColumnAccumulator::new(logic));
        accumulator.adopt_kind(kind);
        accumulator.logic = logic;
        Ok((accumulator, fresh))
    }

    /// Adds `values` as alternatives for `column`.
    pub fn or_value(&mut self, column: &str, values: &[Scalar]) -> Result<()> {
        let kind = values_kind(column, values)?;
        let (accumulator, _) = self.column_for(column, kind, BinaryLogic::Or)?;
        accumulator.scalar_count += values.len();
        accumulator.or_values(values)
    }

    /// Adds `range` as an alternative for `column`.
    pub fn or_range(&mut self, column: &str, range: Range) -> Result<()> {
        let (accumulator, _) = self.column_for(column, range.kind(), BinaryLogic::Or)?;
        accumulator.range_count += 1;
        accumulator.or_range(range)
    }

    /// Restricts `column` to the given set of values.
    ///
    /// An empty `values` slice restricts an existing column to nothing; on a
    /// new column it records that no value is possible.
    pub fn and_value(&mut self, column: &str, values: &[Scalar]) -> Result<()> {
        let kind = values_kind(column, values)?;
        let (accumulator, fresh) = self.column_for(column, kind, BinaryLogic::And)?;
        accumulator.scalar_count += values.len();
        if fresh {
            accumulator.scalars = values.iter().cloned().collect();
            Ok(())
        } else {
            accumulator.and_values(values)
        }
    }

    /// Restricts `column` to `range`.
    pub fn and_range(&mut self, column: &str, range: Range) -> Result<()> {
        let (accumulator, fresh) = self.column_for(column, range.kind(), BinaryLogic::And)?;
        accumulator.range_count += 1;
        if fresh {
            accumulator.ranges.push(range);
            Ok(())
        } else {
            accumulator.and_range(&range)
        }
    }

    /// Combines one predicate's resolved alternatives with `column` under `logic`.
    ///
    /// The alternatives are OR-ed among themselves (the members of an `IN`
    /// list) and the result is combined with the column's current state.
    pub fn push(&mut self, column: &str, logic: BinaryLogic, values: Vec<ResolvedValue>) -> Result<()> {
        let mut scalars = Vec::new();
        let mut ranges = Vec::new();
        for value in values {
            match value {
                ResolvedValue::Scalar(scalar) => scalars.push(scalar),
                ResolvedValue::Range(range) => ranges.push(range),
            }
        }

        match logic {
            BinaryLogic::Or => {
                if !scalars.is_empty() {
                    self.or_value(column, &scalars)?;
                }
                for range in ranges {
                    self.or_range(column, range)?;
                }
                Ok(())
            }
            BinaryLogic::And if ranges.is_empty() => self.and_value(column, &scalars),
            BinaryLogic::And if scalars.is_empty() && ranges.len() == 1 => {
                let range = ranges.remove(0);
                self.and_range(column, range)
            }
            BinaryLogic::And => {
                let mut alternatives = ShardingValuesBuilder::new(self.table.clone());
                alternatives.or_value(column, &scalars)?;
                for range in ranges {
                    alternatives.or_range(column, range)?;
                }
                self.merge(&alternatives, BinaryLogic::And)
            }
        }
    }

    /// Folds `other` into this builder column by column.
    ///
    /// A column that only `other` constrains is copied over as an OR,
    /// whatever `logic` is: intersecting with a column this builder never
    /// constrained would erase every candidate.
    pub fn merge(&mut self, other: &ShardingValuesBuilder, logic: BinaryLogic) -> Result<()> {
        for (column, theirs) in &other.columns {
            match self.columns.get_mut(column) {
                None => {
                    let mut copied = theirs.clone();
                    copied.logic = BinaryLogic::Or;
                    self.columns.insert(column.clone(), copied);
                }
                Some(mine) => {
                    if let Some(kind) = theirs.kind {
                        mine.check_kind(column, kind)?;
                    }
                    mine.adopt_kind(theirs.kind);
                    match logic {
                        BinaryLogic::And => mine.and_column(theirs)?,
                        BinaryLogic::Or => mine.or_column(theirs)?,
                    }
                    mine.scalar_count += theirs.scalar_count;
                    mine.range_count += theirs.range_count;
                    mine.logic = logic;
                }
            }
        }
        Ok(())
    }

    /// Snapshots the current state. Does not modify the builder.
    pub fn build(&self) -> ShardingValues {
        let columns = self
            .columns
            .iter()
            .map(|(name, accumulator)| (name.clone(), accumulator.snapshot()))
            .collect();
        ShardingValues::new(self.table.clone(), columns)
    }
}
