//! Walks a parsed statement and records its sharding predicates.
//!
//! Recognized predicates on sharding columns:
//! - `col = v`, `col < v`, `col <= v`, `col > v`, `col >= v` (either operand order)
//! - `col BETWEEN lo AND hi`
//! - `col IN (v, ...)`
//!
//! where every `v` is a literal or a placeholder. Anything else, including
//! `NOT`, `LIKE`, functions and column-to-column comparisons, records
//! nothing and leaves its columns unconstrained.
//!
//! Every AND/OR node is bracketed by `BeginLogic`/`EndLogic`, and every
//! child of such a node that is itself an AND/OR gets its own group. Under
//! an OR, a table is only constrained if every branch constrains it: a
//! branch that says nothing about a table matches all of its rows.

use std::collections::{BTreeSet, HashMap};

use shardline_routing::{
    BinaryLogic, BoundRef, ParamId, Range, RedoLogBuilder, Scalar, ScalarKind, ValueRedoLog,
    ValueReference,
};
use sqlparser::ast::{
    BinaryOperator, Expr, FromTable, Insert, JoinConstraint, JoinOperator, ObjectName, Query,
    SetExpr, Statement, TableFactor, TableWithJoins, UnaryOperator, Value as SqlValue,
    ValueWithSpan,
};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer};
use tracing::{debug, trace};

use crate::error::{ExplainError, Result};
use crate::schema::ShardingSchema;

/// Default for [`ExplainOptions::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Walker limits and policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplainOptions {
    /// Deepest condition nesting accepted.
    pub max_depth: usize,
    /// Whether a `NULL` bound to a placeholder inside `IN (...)` is skipped
    /// instead of rejected.
    pub nullable_in_list: bool,
}

impl Default for ExplainOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            nullable_in_list: true,
        }
    }
}

/// The statement shapes the walker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Delete,
}

/// Result of explaining one statement.
#[derive(Debug, Clone)]
pub struct Explanation {
    pub kind: StatementKind,
    /// The recorded predicates.
    pub log: ValueRedoLog,
    /// Sharded tables the statement touches, in order of appearance.
    pub tables: Vec<String>,
    /// Number of positional `?` placeholders in the statement text.
    pub positional_params: usize,
}

/// Explains SQL statements against a sharding schema.
#[derive(Debug, Clone)]
pub struct Explainer {
    schema: ShardingSchema,
    options: ExplainOptions,
}

impl Explainer {
    pub fn new(schema: ShardingSchema, options: ExplainOptions) -> Self {
        Self { schema, options }
    }

    pub fn schema(&self) -> &ShardingSchema {
        &self.schema
    }

    pub fn options(&self) -> ExplainOptions {
        self.options
    }

    /// Parses `sql` with the MySQL dialect and records its predicates.
    pub fn explain(&self, sql: &str) -> Result<Explanation> {
        let dialect = MySqlDialect {};

        let tokens = Tokenizer::new(&dialect, sql)
            .tokenize_with_location()
            .map_err(|e| ExplainError::Parse(e.to_string()))?;
        let positional: HashMap<(u64, u64), usize> = tokens
            .iter()
            .filter(|t| matches!(&t.token, Token::Placeholder(p) if p == "?"))
            .enumerate()
            .map(|(index, t)| ((t.span.start.line, t.span.start.column), index))
            .collect();

        let statements =
            Parser::parse_sql(&dialect, sql).map_err(|e| ExplainError::Parse(e.to_string()))?;
        if statements.len() != 1 {
            return Err(ExplainError::StatementCount(statements.len()));
        }

        let mut walker = Walker {
            schema: &self.schema,
            options: self.options,
            scope: Vec::new(),
            positional: &positional,
            log: RedoLogBuilder::new(),
        };
        let kind = walker.statement(&statements[0])?;
        let tables = walker.sharded_tables();
        let log = walker.log.build()?;

        debug!(
            ?kind,
            tables = ?tables,
            entries = log.len(),
            params = positional.len(),
            "explained statement"
        );

        Ok(Explanation {
            kind,
            log,
            tables,
            positional_params: positional.len(),
        })
    }
}

/// One table reference of the statement being walked.
#[derive(Debug)]
struct ScopeEntry {
    table: String,
    alias: Option<String>,
}

/// A sharding column a predicate constrains.
#[derive(Debug)]
struct Target {
    table: String,
    column: String,
    kind: ScalarKind,
}

/// A literal or placeholder operand.
#[derive(Debug)]
enum Operand {
    Null,
    Const(Scalar),
    Param(ParamId),
}

impl Operand {
    fn scalar_ref(self, kind: ScalarKind, nullable: bool) -> Option<ValueReference> {
        match self {
            Operand::Null => None,
            Operand::Const(value) => Some(ValueReference::Const(value)),
            Operand::Param(param) if nullable => Some(ValueReference::nullable_arg(param, kind)),
            Operand::Param(param) => Some(ValueReference::scalar_arg(param, kind)),
        }
    }

    fn bound(self) -> Option<BoundRef> {
        match self {
            Operand::Null => None,
            Operand::Const(value) => Some(BoundRef::Const(value)),
            Operand::Param(param) => Some(BoundRef::Arg(param)),
        }
    }
}

struct Walker<'a> {
    schema: &'a ShardingSchema,
    options: ExplainOptions,
    scope: Vec<ScopeEntry>,
    positional: &'a HashMap<(u64, u64), usize>,
    log: RedoLogBuilder,
}

impl Walker<'_> {
    fn statement(&mut self, statement: &Statement) -> Result<StatementKind> {
        match statement {
            Statement::Query(query) => {
                self.query(query)?;
                Ok(StatementKind::Select)
            }
            Statement::Insert(insert) => {
                self.insert(insert)?;
                Ok(StatementKind::Insert)
            }
            Statement::Delete(delete) => {
                let tables = match &delete.from {
                    FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables) => {
                        tables
                    }
                };
                self.conditions(tables, delete.selection.as_ref())?;
                Ok(StatementKind::Delete)
            }
            other => Err(ExplainError::UnsupportedStatement(statement_name(other))),
        }
    }

    fn query(&mut self, query: &Query) -> Result<()> {
        match query.body.as_ref() {
            SetExpr::Select(select) => self.conditions(&select.from, select.selection.as_ref()),
            _ => Err(ExplainError::UnsupportedStatement(
                "only plain SELECT queries can be routed".to_string(),
            )),
        }
    }

    /// Records `FROM`/`JOIN ... ON` and `WHERE` conditions as one top-level AND.
    ///
    /// The ON clause of an outer join never removes rows of the side the
    /// join preserves, so it may only constrain the other side.
    fn conditions(&mut self, from: &[TableWithJoins], selection: Option<&Expr>) -> Result<()> {
        let mut conditions: Vec<(&Expr, Option<BTreeSet<String>>)> = Vec::new();
        for table in from {
            let mut left: BTreeSet<String> = self.enter(&table.relation).into_iter().collect();
            for join in &table.joins {
                let right: BTreeSet<String> = self.enter(&join.relation).into_iter().collect();
                if let Some((JoinConstraint::On(expr), preserved)) =
                    join_constraint(&join.join_operator)
                {
                    let allowed = match preserved {
                        Preserved::Neither => None,
                        Preserved::Left => Some(right.clone()),
                        Preserved::Right => Some(left.clone()),
                        Preserved::Both => Some(BTreeSet::new()),
                    };
                    conditions.push((expr, allowed));
                }
                left.extend(right);
            }
        }
        conditions.extend(selection.map(|expr| (expr, None)));

        if conditions.is_empty() {
            return Ok(());
        }

        self.log.begin_logic(BinaryLogic::And);
        for (condition, allowed) in conditions {
            self.child(condition, 0, allowed.as_ref())?;
        }
        self.log.end_logic()?;
        Ok(())
    }

    fn insert(&mut self, insert: &Insert) -> Result<()> {
        let table = object_leaf(&insert.table.to_string());
        self.scope.push(ScopeEntry {
            table: table.clone(),
            alias: None,
        });
        if !self.schema.is_sharded(&table) {
            return Ok(());
        }

        if insert.columns.is_empty() {
            return Err(ExplainError::MissingInsertColumns { table });
        }
        let columns: Vec<String> = insert
            .columns
            .iter()
            .map(|c| c.value.to_lowercase())
            .collect();
        let sharding: Vec<(usize, &str, ScalarKind)> = columns
            .iter()
            .enumerate()
            .filter_map(|(position, column)| {
                self.schema
                    .column_kind(&table, column)
                    .map(|kind| (position, column.as_str(), kind))
            })
            .collect();
        if sharding.is_empty() {
            return Ok(());
        }

        let Some(SetExpr::Values(values)) = insert.source.as_ref().map(|s| s.body.as_ref()) else {
            return Err(ExplainError::UnsupportedStatement(
                "only INSERT ... VALUES can be routed".to_string(),
            ));
        };

        self.log.begin_logic(BinaryLogic::Or);
        for row in &values.rows {
            if row.len() != columns.len() {
                return Err(ExplainError::InsertArity {
                    table,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }

            self.log.begin_group();
            self.log.begin_logic(BinaryLogic::And);
            for &(position, column, kind) in &sharding {
                let operand = self.operand(&row[position], kind)?.ok_or_else(|| {
                    ExplainError::UnroutableInsertValue {
                        table: table.clone(),
                        column: column.to_string(),
                    }
                })?;
                let Some(value) = operand.scalar_ref(kind, false) else {
                    return Err(ExplainError::NullShardingValue {
                        table: table.clone(),
                        column: column.to_string(),
                    });
                };
                self.log.push_value(table.as_str(), column, vec![value]);
            }
            self.log.end_logic()?;
            self.log.end_group()?;
        }
        self.log.end_logic()?;
        Ok(())
    }

    /// Brings a relation into scope and returns its table name.
    fn enter(&mut self, relation: &TableFactor) -> Option<String> {
        let TableFactor::Table { name, alias, .. } = relation else {
            return None;
        };
        let table = object_leaf(&object_name(name));
        self.scope.push(ScopeEntry {
            table: table.clone(),
            alias: alias.as_ref().map(|a| a.name.value.to_lowercase()),
        });
        Some(table)
    }

    /// Sharded tables in scope, deduplicated, in order of appearance.
    fn sharded_tables(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.scope
            .iter()
            .filter(|e| self.schema.is_sharded(&e.table) && seen.insert(e.table.clone()))
            .map(|e| e.table.clone())
            .collect()
    }

    fn check_depth(&self, depth: usize) -> Result<()> {
        if depth >= self.options.max_depth {
            return Err(ExplainError::DepthLimitExceeded {
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }

    /// Walks one operand of an AND/OR node, grouping it if it is compound.
    fn child(&mut self, expr: &Expr, depth: usize, allowed: Option<&BTreeSet<String>>) -> Result<()> {
        if is_compound(expr) {
            self.log.begin_group();
            self.walk(expr, depth, allowed)?;
            self.log.end_group()?;
            Ok(())
        } else {
            self.walk(expr, depth, allowed)
        }
    }

    fn walk(&mut self, expr: &Expr, depth: usize, allowed: Option<&BTreeSet<String>>) -> Result<()> {
        self.check_depth(depth)?;

        match expr {
            Expr::Nested(inner) => self.walk(inner, depth + 1, allowed),
            Expr::BinaryOp {
                left,
                op: op @ (BinaryOperator::And | BinaryOperator::Or),
                right,
            } => {
                let narrowed;
                let (logic, allowed) = if *op == BinaryOperator::Or {
                    let mut tables = self.constrained_tables(expr, depth)?;
                    if let Some(outer) = allowed {
                        tables.retain(|t| outer.contains(t));
                    }
                    narrowed = tables;
                    (BinaryLogic::Or, Some(&narrowed))
                } else {
                    (BinaryLogic::And, allowed)
                };

                self.log.begin_logic(logic);
                self.child(left, depth + 1, allowed)?;
                self.child(right, depth + 1, allowed)?;
                self.log.end_logic()?;
                Ok(())
            }
            _ => self.predicate(expr, allowed),
        }
    }

    /// Tables `expr` constrains: any branch of an AND, every branch of an OR.
    fn constrained_tables(&self, expr: &Expr, depth: usize) -> Result<BTreeSet<String>> {
        self.check_depth(depth)?;

        match expr {
            Expr::Nested(inner) => self.constrained_tables(inner, depth + 1),
            Expr::BinaryOp {
                left,
                op: BinaryOperator::And,
                right,
            } => {
                let mut tables = self.constrained_tables(left, depth + 1)?;
                tables.extend(self.constrained_tables(right, depth + 1)?);
                Ok(tables)
            }
            Expr::BinaryOp {
                left,
                op: BinaryOperator::Or,
                right,
            } => {
                let left = self.constrained_tables(left, depth + 1)?;
                let right = self.constrained_tables(right, depth + 1)?;
                Ok(left.intersection(&right).cloned().collect())
            }
            _ => Ok(self
                .predicate_target(expr)?
                .map(|target| target.table)
                .into_iter()
                .collect()),
        }
    }

    /// The sharding column a leaf predicate constrains, if it is recognized.
    fn predicate_target(&self, expr: &Expr) -> Result<Option<Target>> {
        match expr {
            Expr::BinaryOp { left, op, right } if comparison(op).is_some() => {
                if is_operand(right) {
                    self.resolve_column(left)
                } else if is_operand(left) {
                    self.resolve_column(right)
                } else {
                    Ok(None)
                }
            }
            Expr::Between {
                expr,
                negated: false,
                low,
                high,
            } if is_operand(low) && is_operand(high) => self.resolve_column(expr),
            Expr::InList {
                expr,
                list,
                negated: false,
            } if list.iter().all(is_operand) => self.resolve_column(expr),
            _ => Ok(None),
        }
    }

    fn predicate(&mut self, expr: &Expr, allowed: Option<&BTreeSet<String>>) -> Result<()> {
        let Some(target) = self.predicate_target(expr)? else {
            trace!(predicate = %expr, "predicate does not constrain a sharding column");
            return Ok(());
        };
        if allowed.is_some_and(|tables| !tables.contains(&target.table)) {
            trace!(predicate = %expr, table = %target.table, "predicate widened away by OR");
            return Ok(());
        }

        let kind = target.kind;
        let values = match expr {
            Expr::BinaryOp { left, op, right } => {
                let (op, value) = if is_operand(right) {
                    (comparison(op), right)
                } else {
                    (comparison(op).map(Comparison::flip), left)
                };
                let Some(op) = op else {
                    return Ok(());
                };
                match self.operand(value, kind)? {
                    None => return Ok(()),
                    Some(operand) => op.values(operand, kind),
                }
            }
            Expr::Between { low, high, .. } => {
                let low = self.operand(low, kind)?;
                let high = self.operand(high, kind)?;
                match (low.and_then(Operand::bound), high.and_then(Operand::bound)) {
                    (Some(low), Some(high)) => between(low, high, kind),
                    _ => Vec::new(),
                }
            }
            Expr::InList { list, .. } => {
                let mut values = Vec::with_capacity(list.len());
                for item in list {
                    if let Some(operand) = self.operand(item, kind)? {
                        values.extend(operand.scalar_ref(kind, self.options.nullable_in_list));
                    }
                }
                values
            }
            _ => return Ok(()),
        };

        self.log.push_value(target.table, target.column, values);
        Ok(())
    }

    /// Maps a column reference to a sharding column of a table in scope.
    fn resolve_column(&self, expr: &Expr) -> Result<Option<Target>> {
        let (qualifier, column) = match expr {
            Expr::Identifier(ident) => (None, ident.value.to_lowercase()),
            Expr::CompoundIdentifier(idents) if idents.len() >= 2 => (
                Some(idents[idents.len() - 2].value.to_lowercase()),
                idents[idents.len() - 1].value.to_lowercase(),
            ),
            _ => return Ok(None),
        };

        let table = match qualifier {
            Some(qualifier) => {
                let Some(entry) = self
                    .scope
                    .iter()
                    .find(|e| e.alias.as_deref() == Some(qualifier.as_str()))
                    .or_else(|| {
                        self.scope
                            .iter()
                            .find(|e| e.alias.is_none() && e.table == qualifier)
                    })
                else {
                    return Ok(None);
                };
                entry.table.clone()
            }
            None => {
                let owners: BTreeSet<&str> = self
                    .scope
                    .iter()
                    .filter(|e| self.schema.column_kind(&e.table, &column).is_some())
                    .map(|e| e.table.as_str())
                    .collect();
                let mut owners = owners.into_iter();
                match (owners.next(), owners.next()) {
                    (None, _) => return Ok(None),
                    (Some(table), None) => table.to_string(),
                    (Some(first), Some(second)) => {
                        let mut tables = vec![first, second];
                        tables.extend(owners);
                        return Err(ExplainError::AmbiguousColumn {
                            column,
                            tables: tables.join(", "),
                        });
                    }
                }
            }
        };

        // A table joined with itself has one constraint per instance; the
        // per-table result cannot express that.
        if self.scope.iter().filter(|e| e.table == table).count() > 1 {
            return Ok(None);
        }

        Ok(self.schema.column_kind(&table, &column).map(|kind| Target {
            table,
            column,
            kind,
        }))
    }

    /// Converts a literal or placeholder into an operand of `kind`.
    ///
    /// Returns `None` for anything else.
    fn operand(&self, expr: &Expr, kind: ScalarKind) -> Result<Option<Operand>> {
        match expr {
            Expr::Value(value) => self.value_operand(value, kind, ""),
            Expr::UnaryOp {
                op: op @ (UnaryOperator::Minus | UnaryOperator::Plus),
                expr,
            } => match expr.as_ref() {
                Expr::Value(value) if matches!(value.value, SqlValue::Number(..)) => {
                    let sign = if *op == UnaryOperator::Minus { "-" } else { "" };
                    self.value_operand(value, kind, sign)
                }
                _ => Ok(None),
            },
            Expr::Nested(inner) => self.operand(inner, kind),
            _ => Ok(None),
        }
    }

    fn value_operand(
        &self,
        value: &ValueWithSpan,
        kind: ScalarKind,
        sign: &str,
    ) -> Result<Option<Operand>> {
        let operand = match &value.value {
            SqlValue::Number(n, _) => Operand::Const(Scalar::parse_as(kind, &format!("{sign}{n}"))?),
            SqlValue::SingleQuotedString(s) | SqlValue::DoubleQuotedString(s) => {
                Operand::Const(Scalar::parse_as(kind, s)?)
            }
            SqlValue::Null => Operand::Null,
            SqlValue::Placeholder(p) => Operand::Param(self.param(p, value)?),
            _ => return Ok(None),
        };
        Ok(Some(operand))
    }

    fn param(&self, placeholder: &str, value: &ValueWithSpan) -> Result<ParamId> {
        let invalid = || ExplainError::InvalidPlaceholder(placeholder.to_string());

        if placeholder == "?" {
            let start = value.span.start;
            return self
                .positional
                .get(&(start.line, start.column))
                .map(|index| ParamId::Index(*index))
                .ok_or_else(invalid);
        }

        if let Some(digits) = placeholder
            .strip_prefix('?')
            .or_else(|| placeholder.strip_prefix('$'))
        {
            let number: usize = digits.parse().map_err(|_| invalid())?;
            // Numbered placeholders are 1-based.
            return number.checked_sub(1).map(ParamId::Index).ok_or_else(invalid);
        }

        match placeholder
            .strip_prefix(':')
            .or_else(|| placeholder.strip_prefix('@'))
        {
            Some(name) if !name.is_empty() => Ok(ParamId::Name(name.to_string())),
            _ => Err(invalid()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Comparison {
    Eq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl Comparison {
    /// The same comparison with its operands swapped.
    fn flip(self) -> Self {
        match self {
            Comparison::Eq => Comparison::Eq,
            Comparison::Lt => Comparison::Gt,
            Comparison::LtEq => Comparison::GtEq,
            Comparison::Gt => Comparison::Lt,
            Comparison::GtEq => Comparison::LtEq,
        }
    }

    fn values(self, operand: Operand, kind: ScalarKind) -> Vec<ValueReference> {
        if let Comparison::Eq = self {
            return operand.scalar_ref(kind, false).into_iter().collect();
        }
        let Some(bound) = operand.bound() else {
            return Vec::new();
        };
        let reference = match self {
            Comparison::Lt => ValueReference::range(None, Some(bound), false, false, kind),
            Comparison::LtEq => ValueReference::range(None, Some(bound), false, true, kind),
            Comparison::Gt => ValueReference::range(Some(bound), None, false, false, kind),
            Comparison::GtEq => ValueReference::range(Some(bound), None, true, false, kind),
            Comparison::Eq => return Vec::new(),
        };
        vec![reference]
    }
}

fn comparison(op: &BinaryOperator) -> Option<Comparison> {
    match op {
        BinaryOperator::Eq => Some(Comparison::Eq),
        BinaryOperator::Lt => Some(Comparison::Lt),
        BinaryOperator::LtEq => Some(Comparison::LtEq),
        BinaryOperator::Gt => Some(Comparison::Gt),
        BinaryOperator::GtEq => Some(Comparison::GtEq),
        _ => None,
    }
}

/// `BETWEEN` bounds. Literal bounds that leave no value match nothing.
fn between(low: BoundRef, high: BoundRef, kind: ScalarKind) -> Vec<ValueReference> {
    if let (BoundRef::Const(lo), BoundRef::Const(hi)) = (&low, &high)
        && Range::closed(lo.clone(), hi.clone()).is_err()
    {
        return Vec::new();
    }
    vec![ValueReference::range(Some(low), Some(high), true, true, kind)]
}

/// Returns true if `expr` has the shape of a literal or placeholder.
fn is_operand(expr: &Expr) -> bool {
    match expr {
        Expr::Value(value) => matches!(
            value.value,
            SqlValue::Number(..)
                | SqlValue::SingleQuotedString(_)
                | SqlValue::DoubleQuotedString(_)
                | SqlValue::Null
                | SqlValue::Placeholder(_)
        ),
        Expr::UnaryOp {
            op: UnaryOperator::Minus | UnaryOperator::Plus,
            expr,
        } => matches!(expr.as_ref(), Expr::Value(v) if matches!(v.value, SqlValue::Number(..))),
        Expr::Nested(inner) => is_operand(inner),
        _ => false,
    }
}

/// Returns true for an AND/OR node, looking through parentheses.
fn is_compound(expr: &Expr) -> bool {
    match expr {
        Expr::Nested(inner) => is_compound(inner),
        Expr::BinaryOp {
            op: BinaryOperator::And | BinaryOperator::Or,
            ..
        } => true,
        _ => false,
    }
}

/// Which side of a join keeps every one of its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preserved {
    Neither,
    Left,
    Right,
    Both,
}

fn join_constraint(op: &JoinOperator) -> Option<(&JoinConstraint, Preserved)> {
    match op {
        JoinOperator::Join(constraint) | JoinOperator::Inner(constraint) => {
            Some((constraint, Preserved::Neither))
        }
        JoinOperator::Left(constraint) | JoinOperator::LeftOuter(constraint) => {
            Some((constraint, Preserved::Left))
        }
        JoinOperator::Right(constraint) | JoinOperator::RightOuter(constraint) => {
            Some((constraint, Preserved::Right))
        }
        JoinOperator::FullOuter(constraint) => Some((constraint, Preserved::Both)),
        _ => None,
    }
}

fn object_name(name: &ObjectName) -> String {
    name.to_string()
}

/// Last segment of a possibly qualified, possibly quoted table name, lowercased.
fn object_leaf(name: &str) -> String {
    name.rsplit('.')
        .next()
        .unwrap_or(name)
        .trim_matches(|c| c == '`' || c == '"')
        .to_lowercase()
}

fn statement_name(statement: &Statement) -> String {
    let text = statement.to_string();
    text.split_whitespace()
        .next()
        .unwrap_or("statement")
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_leaf_strips_qualifier_and_quotes() {
        assert_eq!(object_leaf("`shop`.`Orders`"), "orders");
        assert_eq!(object_leaf("orders"), "orders");
    }

    #[test]
    fn comparison_flip_mirrors_operands() {
        assert!(matches!(Comparison::Lt.flip(), Comparison::Gt));
        assert!(matches!(Comparison::GtEq.flip(), Comparison::LtEq));
        assert!(matches!(Comparison::Eq.flip(), Comparison::Eq));
    }

    #[test]
    fn literal_inverted_between_matches_nothing() {
        let values = between(
            BoundRef::Const(Scalar::Signed(10)),
            BoundRef::Const(Scalar::Signed(5)),
            ScalarKind::Signed,
        );
        assert!(values.is_empty());
    }
}
