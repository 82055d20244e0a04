//! The deferred-evaluation redo log.
//!
//! A condition walker records a [`ValueRedoLog`] once per statement shape
//! through a [`RedoLogBuilder`]. The finished log is immutable and can be
//! replayed concurrently from many threads, each replay with its own bind
//! variables and its own [`ScopeStack`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace, warn};

use crate::bind::{BindVariables, ParamId};
use crate::error::{Result, RoutingError};
use crate::scope::{BinaryLogic, ScopeStack};
use crate::value_ref::ValueReference;
use crate::values::ShardingValues;

/// One recorded walker event.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    /// A recognized comparison on a sharding column.
    ///
    /// `values` are the alternatives of a single predicate, as in an
    /// `IN (...)` list.
    PushValue {
        table: String,
        column: String,
        logic: BinaryLogic,
        values: Vec<ValueReference>,
    },
    BeginGroup,
    EndGroup,
    BeginLogic(BinaryLogic),
    EndLogic,
}

/// Records walker events, tracking balance as it goes.
#[derive(Debug, Default)]
pub struct RedoLogBuilder {
    entries: Vec<LogEntry>,
    groups: usize,
    logics: Vec<BinaryLogic>,
}

impl RedoLogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The logic pushed values are recorded under: the innermost open
    /// `BeginLogic`, or AND.
    pub fn current_logic(&self) -> BinaryLogic {
        self.logics.last().copied().unwrap_or_default()
    }

    /// Records a predicate under the current logic.
    pub fn push_value(
        &mut self,
        table: impl Into<String>,
        column: impl Into<String>,
        values: Vec<ValueReference>,
    ) {
        let logic = self.current_logic();
        self.entries.push(LogEntry::PushValue {
            table: table.into(),
            column: column.into(),
            logic,
            values,
        });
    }

    pub fn begin_group(&mut self) {
        self.groups += 1;
        self.entries.push(LogEntry::BeginGroup);
    }

    pub fn end_group(&mut self) -> Result<()> {
        if self.groups == 0 {
            return Err(RoutingError::UnbalancedGroup);
        }
        self.groups -= 1;
        self.entries.push(LogEntry::EndGroup);
        Ok(())
    }

    pub fn begin_logic(&mut self, logic: BinaryLogic) {
        self.logics.push(logic);
        self.entries.push(LogEntry::BeginLogic(logic));
    }

    pub fn end_logic(&mut self) -> Result<()> {
        if self.logics.pop().is_none() {
            return Err(RoutingError::UnbalancedLogic);
        }
        self.entries.push(LogEntry::EndLogic);
        Ok(())
    }

    /// Number of entries recorded so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finishes recording. Fails if a group or logic frame is still open.
    pub fn build(self) -> Result<ValueRedoLog> {
        if self.groups != 0 || !self.logics.is_empty() {
            return Err(RoutingError::UnclosedScopes {
                groups: self.groups,
                logics: self.logics.len(),
            });
        }
        Ok(ValueRedoLog {
            entries: self.entries,
        })
    }
}

/// An immutable, replayable record of a statement's sharding predicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueRedoLog {
    entries: Vec<LogEntry>,
}

impl ValueRedoLog {
    /// Wraps entries recorded elsewhere.
    ///
    /// Balance is not checked here; a malformed log fails at replay with a
    /// structural error.
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if no entry depends on a bind variable.
    pub fn is_const(&self) -> bool {
        self.references().all(ValueReference::is_const)
    }

    /// Every bind parameter referenced, deduplicated and sorted.
    pub fn params(&self) -> BTreeSet<ParamId> {
        self.references()
            .flat_map(ValueReference::params)
            .cloned()
            .collect()
    }

    /// Tables with at least one recorded predicate.
    pub fn tables(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::PushValue { table, .. } => Some(table.as_str()),
                _ => None,
            })
            .collect()
    }

    fn references(&self) -> impl Iterator<Item = &ValueReference> {
        self.entries.iter().flat_map(|entry| match entry {
            LogEntry::PushValue { values, .. } => values.as_slice(),
            _ => &[][..],
        })
    }

    /// Replays the log against `binds`.
    ///
    /// Returns the candidates of every table with a recorded predicate.
    /// Tables whose predicates were all merged away still appear, with no
    /// constrained columns.
    pub fn redo(&self, binds: &BindVariables) -> Result<BTreeMap<String, ShardingValues>> {
        let mut stack = ScopeStack::new();

        for (position, entry) in self.entries.iter().enumerate() {
            let step = match entry {
                LogEntry::PushValue {
                    table,
                    column,
                    logic,
                    values,
                } => {
                    let mut resolved = Vec::with_capacity(values.len());
                    for reference in values {
                        if let Some(value) = reference.resolve(binds)? {
                            resolved.push(value);
                        }
                    }
                    trace!(
                        position,
                        table = %table,
                        column = %column,
                        logic = %logic,
                        values = resolved.len(),
                        "replaying value push"
                    );
                    stack.push(table, column, *logic, resolved)
                }
                LogEntry::BeginGroup => {
                    stack.begin_group();
                    Ok(())
                }
                LogEntry::EndGroup => stack.end_group(),
                LogEntry::BeginLogic(logic) => {
                    stack.begin_logic(*logic);
                    Ok(())
                }
                LogEntry::EndLogic => stack.end_logic(),
            };

            if let Err(error) = step {
                if error.is_structural() {
                    warn!(position, error = %error, "redo log is out of sync with its walker");
                }
                return Err(error);
            }
        }

        let root = stack.finish().inspect_err(|error| {
            warn!(error = %error, "redo log is out of sync with its walker");
        })?;

        let result: BTreeMap<String, ShardingValues> = root
            .builders()
            .iter()
            .map(|(table, builder)| (table.clone(), builder.build()))
            .collect();

        debug!(
            entries = self.entries.len(),
            tables = result.len(),
            "redo finished"
        );
        Ok(result)
    }
}
