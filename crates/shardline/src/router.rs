//! The router: configuration in, per-execution sharding values out.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use shardline_config::{ColumnKind, ConfigLoader, ShardlineConfig};
use shardline_explain::{ExplainOptions, Explainer, ShardingSchema, StatementKind};
use shardline_routing::{BindVariables, ParamId, ScalarKind, ShardingValues, ValueRedoLog};
use tracing::{debug, trace};

use crate::error::Result;

/// Routes SQL statements against a fixed sharding layout.
///
/// A router is immutable once built and can be shared between threads.
#[derive(Debug, Clone)]
pub struct ShardRouter {
    explainer: Explainer,
}

impl ShardRouter {
    /// Builds a router from an already loaded configuration.
    pub fn new(config: &ShardlineConfig) -> Result<Self> {
        config.validate()?;

        let mut schema = ShardingSchema::new();
        for table in &config.tables {
            for column in &table.columns {
                schema.add_column(table.name.trim(), column.name.trim(), scalar_kind(column.kind));
            }
        }
        let options = ExplainOptions {
            max_depth: config.router.max_condition_depth,
            nullable_in_list: config.router.nullable_in_list,
        };

        debug!(
            tables = config.tables.len(),
            max_depth = options.max_depth,
            nullable_in_list = options.nullable_in_list,
            "shard router configured"
        );
        Ok(Self {
            explainer: Explainer::new(schema, options),
        })
    }

    /// Loads layered configuration for `project_dir` and builds a router.
    pub fn from_project_dir(project_dir: impl AsRef<Path>) -> Result<Self> {
        let config = ConfigLoader::new().with_project_dir(project_dir).load()?;
        Self::new(&config)
    }

    pub fn schema(&self) -> &ShardingSchema {
        self.explainer.schema()
    }

    /// Explains `sql` once. The returned route is replayed per execution.
    pub fn prepare(&self, sql: &str) -> Result<PreparedRoute> {
        let explanation = self.explainer.explain(sql)?;
        Ok(PreparedRoute {
            kind: explanation.kind,
            tables: explanation.tables.into(),
            positional_params: explanation.positional_params,
            log: Arc::new(explanation.log),
        })
    }

    /// Explains and routes a statement executed once.
    pub fn route_once(
        &self,
        sql: &str,
        binds: &BindVariables,
    ) -> Result<BTreeMap<String, ShardingValues>> {
        self.prepare(sql)?.route(binds)
    }
}

/// An explained statement, cheap to clone and safe to share.
///
/// Every [`route`](Self::route) call replays the recorded predicates with
/// its own scope state; concurrent calls never observe each other.
#[derive(Debug, Clone)]
pub struct PreparedRoute {
    kind: StatementKind,
    tables: Arc<[String]>,
    positional_params: usize,
    log: Arc<ValueRedoLog>,
}

impl PreparedRoute {
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Sharded tables the statement touches.
    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// Number of `?` placeholders in the statement.
    pub fn positional_params(&self) -> usize {
        self.positional_params
    }

    pub fn log(&self) -> &ValueRedoLog {
        &self.log
    }

    /// Bind parameters the route depends on.
    pub fn params(&self) -> Vec<ParamId> {
        self.log.params().into_iter().collect()
    }

    /// Returns true if routing does not depend on bind values.
    pub fn is_const(&self) -> bool {
        self.log.is_const()
    }

    /// Computes the sharding values of one execution.
    ///
    /// Every sharded table of the statement appears in the result; a table
    /// no predicate constrains maps to [`ShardingValues::unconstrained`].
    pub fn route(&self, binds: &BindVariables) -> Result<BTreeMap<String, ShardingValues>> {
        let mut routed = self.log.redo(binds)?;
        for table in self.tables.iter() {
            if !routed.contains_key(table) {
                trace!(table = %table, "table is unconstrained");
                routed.insert(table.clone(), ShardingValues::unconstrained(table.as_str()));
            }
        }
        Ok(routed)
    }
}

fn scalar_kind(kind: ColumnKind) -> ScalarKind {
    match kind {
        ColumnKind::Signed => ScalarKind::Signed,
        ColumnKind::Unsigned => ScalarKind::Unsigned,
        ColumnKind::Float => ScalarKind::Float,
        ColumnKind::Text => ScalarKind::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync + Clone>() {}

    #[test]
    fn prepared_routes_are_shareable() {
        assert_send_sync::<PreparedRoute>();
        assert_send_sync::<ShardRouter>();
    }

    #[test]
    fn column_kinds_map_one_to_one() {
        assert_eq!(scalar_kind(ColumnKind::Signed), ScalarKind::Signed);
        assert_eq!(scalar_kind(ColumnKind::Unsigned), ScalarKind::Unsigned);
        assert_eq!(scalar_kind(ColumnKind::Float), ScalarKind::Float);
        assert_eq!(scalar_kind(ColumnKind::Text), ScalarKind::Text);
    }
}
