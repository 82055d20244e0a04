//! # shardline-routing: sharding value algebra for `shardline`
//!
//! This crate turns the predicates of a SQL statement into the per-column
//! candidate values a sharding strategy needs, and does so in two phases so
//! a prepared statement is analysed once and routed cheaply per execution.
//!
//! ```text
//!   explain (once per statement shape)          route (per execution)
//!   ----------------------------------          ---------------------
//!   condition walker                            BindVariables
//!        |  push_value / begin_group /               |
//!        |  end_group / begin_logic / end_logic      v
//!        v                                     ValueRedoLog::redo
//!   RedoLogBuilder --build--> ValueRedoLog  ---->    |  ScopeStack of ValueScopes
//!                                                    |  ShardingValuesBuilder per table
//!                                                    v
//!                                     BTreeMap<table, ShardingValues>
//! ```
//!
//! ## Candidate representation
//!
//! Every constrained column holds a sorted set of discrete [`Scalar`]s plus a
//! sorted list of disjoint [`Range`]s. The candidates are the union of both.
//! AND narrows the candidates, OR widens them, and both keep the
//! representation minimal: scalars covered by a range are dropped and
//! overlapping or adjacent ranges are merged.
//!
//! A column no predicate mentions is absent from [`ShardingValues`] and is
//! unconstrained. A column present with no candidates cannot match any row.
//!
//! ## Usage
//!
//! ```
//! use shardline_routing::{
//!     BindVariables, BinaryLogic, RedoLogBuilder, Scalar, ScalarKind, ValueReference,
//! };
//!
//! // WHERE user_id = ? OR user_id IN (7, 9)
//! let mut log = RedoLogBuilder::new();
//! log.begin_logic(BinaryLogic::Or);
//! log.push_value("orders", "user_id", vec![ValueReference::scalar_arg(0, ScalarKind::Signed)]);
//! log.push_value(
//!     "orders",
//!     "user_id",
//!     vec![
//!         ValueReference::Const(Scalar::Signed(7)),
//!         ValueReference::Const(Scalar::Signed(9)),
//!     ],
//! );
//! log.end_logic()?;
//! let log = log.build()?;
//!
//! let routed = log.redo(&BindVariables::new().with(3_i64))?;
//! let orders = &routed["orders"];
//! assert_eq!(
//!     orders.scalar_values("user_id"),
//!     &[Scalar::Signed(3), Scalar::Signed(7), Scalar::Signed(9)]
//! );
//! assert_eq!(orders.logic("user_id"), Some(BinaryLogic::Or));
//! # Ok::<(), shardline_routing::RoutingError>(())
//! ```

mod bind;
mod builder;
mod error;
mod range;
mod redo;
mod scalar;
mod scope;
mod value_ref;
mod values;


pub use bind::{BindVariables, ParamId};
pub use builder::ShardingValuesBuilder;
pub use error::{ErrorCategory, Result, RoutingError};
pub use range::Range;
pub use redo::{LogEntry, RedoLogBuilder, ValueRedoLog};
pub use scalar::{Scalar, ScalarKind};
pub use scope::{BinaryLogic, ScopeStack, ValueScope};
pub use value_ref::{BoundRef, ResolvedValue, ValueReference};
pub use values::{ColumnValues, ShardingValues};
