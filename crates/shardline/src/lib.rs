//! # shardline
//!
//! Shard routing for SQL statements. A statement is explained once into a
//! redo log of its sharding predicates; every execution replays that log
//! with its bind values to get the candidate values of each sharding column.
//!
//! ```text
//! shardline.toml ─► ShardRouter ─prepare(sql)─► PreparedRoute ─route(binds)─► ShardingValues
//!                   (schema)       explain once   Arc<ValueRedoLog>  per execution
//! ```
//!
//! # Quick Start
//!
//! ```
//! use shardline::{BindVariables, ColumnKind, Scalar, ShardRouter, ShardlineConfig, TableConfig};
//!
//! let config = ShardlineConfig::default()
//!     .with_table(TableConfig::new("orders").column("user_id", ColumnKind::Signed));
//! let router = ShardRouter::new(&config)?;
//!
//! let route = router.prepare("SELECT * FROM orders WHERE user_id IN (?, ?)")?;
//! let routed = route.route(&BindVariables::new().with(3_i64).with(1_i64))?;
//! assert_eq!(
//!     routed["orders"].scalar_values("user_id"),
//!     &[Scalar::Signed(1), Scalar::Signed(3)]
//! );
//! # Ok::<(), shardline::RouterError>(())
//! ```

mod error;
mod router;

pub use error::{Result, RouterError};
pub use router::{PreparedRoute, ShardRouter};

pub use shardline_config::{
    ColumnConfig, ColumnKind, ConfigLoader, RouterConfig, ShardlineConfig, TableConfig,
};
pub use shardline_explain::{ExplainError, ShardingSchema, StatementKind};
pub use shardline_routing::{
    BinaryLogic, BindVariables, ColumnValues, ParamId, Range, RoutingError, Scalar, ScalarKind,
    ShardingValues,
};
