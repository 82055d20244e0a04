//! Nested accumulation scopes mirroring parenthesis nesting.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::builder::ShardingValuesBuilder;
use crate::error::{Result, RoutingError};
use crate::value_ref::ResolvedValue;

/// How a predicate combines with what a column already holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BinaryLogic {
    #[default]
    And,
    Or,
}

impl Display for BinaryLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryLogic::And => f.write_str("AND"),
            BinaryLogic::Or => f.write_str("OR"),
        }
    }
}

/// One nesting level: a builder per table, plus the logic used to merge
/// the level into its parent when it closes.
#[derive(Debug, Clone)]
pub struct ValueScope {
    logic: BinaryLogic,
    builders: BTreeMap<String, ShardingValuesBuilder>,
}

impl ValueScope {
    pub fn new(logic: BinaryLogic) -> Self {
        Self {
            logic,
            builders: BTreeMap::new(),
        }
    }

    pub fn logic(&self) -> BinaryLogic {
        self.logic
    }

    /// Returns the builder for `table`, creating it on first use.
    pub fn builder_mut(&mut self, table: &str) -> &mut ShardingValuesBuilder {
        self.builders
            .entry(table.to_string())
            .or_insert_with(|| ShardingValuesBuilder::new(table))
    }

    pub fn builders(&self) -> &BTreeMap<String, ShardingValuesBuilder> {
        &self.builders
    }

    fn merge_into(self, parent: &mut ValueScope) -> Result<()> {
        for (table, builder) in self.builders {
            match parent.builders.get_mut(&table) {
                Some(existing) => existing.merge(&builder, self.logic)?,
                None => {
                    let mut fresh = ShardingValuesBuilder::new(table.clone());
                    fresh.merge(&builder, self.logic)?;
                    parent.builders.insert(table, fresh);
                }
            }
        }
        Ok(())
    }
}

/// The scope and logic stacks of one replay.
///
/// Each replay owns its stack; nothing here is shared between executions.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<ValueScope>,
    logics: Vec<BinaryLogic>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// Starts with the implicit outermost AND scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![ValueScope::new(BinaryLogic::And)],
            logics: Vec::new(),
        }
    }

    /// Logic of the innermost `BeginLogic`, or AND outside any.
    pub fn current_logic(&self) -> BinaryLogic {
        self.logics.last().copied().unwrap_or_default()
    }

    /// Number of open scopes, including the root.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn begin_group(&mut self) {
        let logic = self.current_logic();
        self.scopes.push(ValueScope::new(logic));
    }

    /// Closes the innermost group, merging it into its parent under the
    /// logic it was opened with.
    pub fn end_group(&mut self) -> Result<()> {
        if self.scopes.len() <= 1 {
            return Err(RoutingError::UnbalancedGroup);
        }
        let Some(closed) = self.scopes.pop() else {
            return Err(RoutingError::UnbalancedGroup);
        };
        let parent = self.top_mut()?;
        closed.merge_into(parent)
    }

    pub fn begin_logic(&mut self, logic: BinaryLogic) {
        self.logics.push(logic);
    }

    pub fn end_logic(&mut self) -> Result<()> {
        self.logics
            .pop()
            .map(|_| ())
            .ok_or(RoutingError::UnbalancedLogic)
    }

    /// Folds one predicate into the innermost scope.
    pub fn push(
        &mut self,
        table: &str,
        column: &str,
        logic: BinaryLogic,
        values: Vec<ResolvedValue>,
    ) -> Result<()> {
        self.top_mut()?.builder_mut(table).push(column, logic, values)
    }

    /// Returns the root scope once every group and logic frame has closed.
    pub fn finish(mut self) -> Result<ValueScope> {
        if self.scopes.len() != 1 || !self.logics.is_empty() {
            return Err(RoutingError::UnclosedScopes {
                groups: self.scopes.len().saturating_sub(1),
                logics: self.logics.len(),
            });
        }
        self.scopes.pop().ok_or(RoutingError::UnbalancedGroup)
    }

    fn top_mut(&mut self) -> Result<&mut ValueScope> {
        self.scopes.last_mut().ok_or(RoutingError::UnbalancedGroup)
    }
}
