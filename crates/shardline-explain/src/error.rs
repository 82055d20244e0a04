//! Error types for the explain walker.

use shardline_routing::RoutingError;
use thiserror::Error;

/// Result type for explain operations.
pub type Result<T, E = ExplainError> = std::result::Result<T, E>;

/// Errors raised while turning a statement into a redo log.
#[derive(Debug, Error)]
pub enum ExplainError {
    /// SQL could not be tokenized or parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The input held zero or several statements.
    #[error("expected exactly 1 statement, got {0}")]
    StatementCount(usize),

    /// The statement type cannot be routed.
    #[error("unsupported statement: {0}")]
    UnsupportedStatement(String),

    /// The condition tree nests deeper than the configured limit.
    #[error("condition nesting exceeds maximum depth of {limit}")]
    DepthLimitExceeded { limit: usize },

    /// An unqualified column is a sharding column of several tables.
    #[error("column {column} is ambiguous between tables {tables}")]
    AmbiguousColumn { column: String, tables: String },

    /// A placeholder has an unrecognized form.
    #[error("invalid placeholder: {0}")]
    InvalidPlaceholder(String),

    /// `INSERT` into a sharded table without a column list.
    #[error("INSERT into sharded table {table} must name its columns")]
    MissingInsertColumns { table: String },

    /// A `VALUES` row has the wrong number of values.
    #[error("INSERT into {table} lists {expected} columns but a row has {actual} values")]
    InsertArity {
        table: String,
        expected: usize,
        actual: usize,
    },

    /// A sharding column is inserted with something other than a literal or placeholder.
    #[error("INSERT into {table} sets sharding column {column} to an expression")]
    UnroutableInsertValue { table: String, column: String },

    /// A sharding column is inserted as a literal `NULL`.
    #[error("INSERT into {table} sets sharding column {column} to NULL")]
    NullShardingValue { table: String, column: String },

    /// A literal does not fit its column, or the recording is unbalanced.
    #[error(transparent)]
    Routing(#[from] RoutingError),
}
