//! Error types for the routing core.

use thiserror::Error;

use crate::bind::ParamId;
use crate::scalar::{Scalar, ScalarKind};

/// Result type for routing operations.
pub type Result<T, E = RoutingError> = std::result::Result<T, E>;

/// Coarse classification of a [`RoutingError`].
///
/// The surrounding execution layer uses this to decide whether a failure
/// becomes a user-visible SQL error or an internal server error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A range or literal could not be constructed.
    Construction,
    /// Operands of different scalar kinds met in one operation.
    Comparison,
    /// A bind variable was missing, NULL, or of the wrong kind.
    ///
    /// The prepared route stays valid; the caller may retry with corrected
    /// parameters.
    Data,
    /// The redo log and the walker that recorded it are out of sync.
    Structural,
}

/// Errors produced by the sharding value algebra and the redo log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    /// Range lower bound is greater than its upper bound.
    #[error("range lower bound {lower} is greater than upper bound {upper}")]
    InvertedRange { lower: Scalar, upper: Scalar },

    /// Range bounds are equal but at least one side is open.
    #[error("range bounds are both {value} but not both closed")]
    EmptyRange { value: Scalar },

    /// Range bounds carry different scalar kinds.
    #[error("range bounds have different kinds: lower is {lower}, upper is {upper}")]
    MismatchedBoundKinds { lower: ScalarKind, upper: ScalarKind },

    /// A SQL literal does not parse as the requested kind.
    #[error("invalid {kind} literal: {literal}")]
    InvalidLiteral { kind: ScalarKind, literal: String },

    /// Two operands of different kinds were compared.
    #[error("cannot compare {left} with {right}")]
    KindMismatch { left: ScalarKind, right: ScalarKind },

    /// A value of the wrong kind was pushed into a column.
    #[error("column {column} holds {expected} values, got {actual}")]
    ColumnKindMismatch {
        column: String,
        expected: ScalarKind,
        actual: ScalarKind,
    },

    /// A named bind variable was not supplied.
    #[error("bind variable {0} is missing")]
    MissingBindVariable(ParamId),

    /// A positional bind variable index is past the supplied values.
    #[error("bind variable index {index} is out of range ({len} positional values bound)")]
    ParamIndexOutOfRange { index: usize, len: usize },

    /// A bind variable is NULL where the reference requires a value.
    #[error("bind variable {0} is NULL where a value is required")]
    NullNotAllowed(ParamId),

    /// A bind variable resolved to a value of the wrong kind.
    #[error("bind variable {param} expected {expected}, got {actual}")]
    BindKindMismatch {
        param: ParamId,
        expected: ScalarKind,
        actual: ScalarKind,
    },

    /// `EndGroup` with no open group.
    #[error("EndGroup without a matching BeginGroup")]
    UnbalancedGroup,

    /// `EndLogic` with no open logic frame.
    #[error("EndLogic without a matching BeginLogic")]
    UnbalancedLogic,

    /// The log ended while groups or logic frames were still open.
    #[error("redo log ended with {groups} open groups and {logics} open logic frames")]
    UnclosedScopes { groups: usize, logics: usize },
}

impl RoutingError {
    /// Returns which part of the error taxonomy this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            RoutingError::InvertedRange { .. }
            | RoutingError::EmptyRange { .. }
            | RoutingError::MismatchedBoundKinds { .. }
            | RoutingError::InvalidLiteral { .. } => ErrorCategory::Construction,
            RoutingError::KindMismatch { .. } | RoutingError::ColumnKindMismatch { .. } => {
                ErrorCategory::Comparison
            }
            RoutingError::MissingBindVariable(_)
            | RoutingError::ParamIndexOutOfRange { .. }
            | RoutingError::NullNotAllowed(_)
            | RoutingError::BindKindMismatch { .. } => ErrorCategory::Data,
            RoutingError::UnbalancedGroup
            | RoutingError::UnbalancedLogic
            | RoutingError::UnclosedScopes { .. } => ErrorCategory::Structural,
        }
    }

    /// Returns true if this error means the redo log itself is malformed.
    pub fn is_structural(&self) -> bool {
        self.category() == ErrorCategory::Structural
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_follow_taxonomy() {
        assert_eq!(
            RoutingError::MissingBindVariable(ParamId::Name("uid".into())).category(),
            ErrorCategory::Data
        );
        assert_eq!(
            RoutingError::KindMismatch {
                left: ScalarKind::Signed,
                right: ScalarKind::Text,
            }
            .category(),
            ErrorCategory::Comparison
        );
        assert!(RoutingError::UnbalancedGroup.is_structural());
        assert!(!RoutingError::NullNotAllowed(ParamId::Index(0)).is_structural());
    }

    #[test]
    fn messages_name_the_parameter() {
        let err = RoutingError::NullNotAllowed(ParamId::Name("tenant".into()));
        assert_eq!(
            err.to_string(),
            "bind variable :tenant is NULL where a value is required"
        );
    }
}
