//! # shardline-explain: condition walker for `shardline`
//!
//! Parses a statement with `sqlparser` (MySQL dialect) and records the
//! predicates on sharding columns into a [`ValueRedoLog`] that can be
//! replayed per execution.
//!
//! ## Supported statements
//!
//! - `SELECT` over one or more tables, with `WHERE` and
//!   `[INNER | LEFT | RIGHT | FULL] JOIN ... ON` conditions
//! - `INSERT ... VALUES`, where each row becomes one group and rows are OR-ed
//! - `DELETE ... WHERE`
//!
//! ## Placeholders
//!
//! - `?` is positional, numbered from 0 in textual order across the whole
//!   statement
//! - `$n` and `?n` are positional with index `n - 1`
//! - `:name` and `@name` are named
//!
//! ## Usage
//!
//! ```
//! use shardline_explain::{ExplainOptions, Explainer, ShardingSchema};
//! use shardline_routing::{BindVariables, ScalarKind, Scalar};
//!
//! let schema = ShardingSchema::new().column("orders", "user_id", ScalarKind::Signed);
//! let explainer = Explainer::new(schema, ExplainOptions::default());
//!
//! let explained = explainer.explain("SELECT * FROM orders WHERE user_id IN (?, 42)")?;
//! let routed = explained.log.redo(&BindVariables::new().with(7_i64))?;
//! assert_eq!(
//!     routed["orders"].scalar_values("user_id"),
//!     &[Scalar::Signed(7), Scalar::Signed(42)]
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`ValueRedoLog`]: shardline_routing::ValueRedoLog

mod error;
mod schema;
mod walker;


pub use error::{ExplainError, Result};
pub use schema::ShardingSchema;
pub use walker::{DEFAULT_MAX_DEPTH, ExplainOptions, Explainer, Explanation, StatementKind};
