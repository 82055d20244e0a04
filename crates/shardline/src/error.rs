//! Error types for the router facade.

use shardline_config::ConfigError;
use shardline_explain::ExplainError;
use shardline_routing::RoutingError;
use thiserror::Error;

/// Result type for router operations.
pub type Result<T, E = RouterError> = std::result::Result<T, E>;

/// Errors returned by [`ShardRouter`](crate::ShardRouter) and
/// [`PreparedRoute`](crate::PreparedRoute).
#[derive(Debug, Error)]
pub enum RouterError {
    /// The configuration is inconsistent.
    #[error("invalid router configuration: {0}")]
    Config(#[from] ConfigError),

    /// Loading layered configuration failed.
    #[error(transparent)]
    Load(#[from] anyhow::Error),

    /// The statement cannot be explained.
    #[error("cannot explain statement: {0}")]
    Explain(#[from] ExplainError),

    /// Replaying the recorded predicates against bind values failed.
    #[error("cannot route statement: {0}")]
    Routing(#[from] RoutingError),
}

impl RouterError {
    /// Returns true if the error is the caller's fault (bad SQL, bad binds)
    /// rather than a router defect.
    pub fn is_user_error(&self) -> bool {
        match self {
            RouterError::Explain(ExplainError::Routing(e)) | RouterError::Routing(e) => {
                !e.is_structural()
            }
            RouterError::Explain(_) => true,
            RouterError::Config(_) | RouterError::Load(_) => false,
        }
    }
}
