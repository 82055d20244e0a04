//! Deferred values recorded at explain time and resolved per execution.

use crate::bind::{BindVariables, ParamId};
use crate::error::{Result, RoutingError};
use crate::range::Range;
use crate::scalar::{Scalar, ScalarKind};

/// One bound of a [`ValueReference::RangeArg`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoundRef {
    /// A literal known at explain time.
    Const(Scalar),
    /// A bind parameter.
    Arg(ParamId),
}

impl BoundRef {
    fn param(&self) -> Option<&ParamId> {
        match self {
            BoundRef::Const(_) => None,
            BoundRef::Arg(param) => Some(param),
        }
    }

    fn resolve(&self, kind: ScalarKind, binds: &BindVariables) -> Result<Scalar> {
        match self {
            BoundRef::Const(value) => {
                if value.kind() != kind {
                    return Err(RoutingError::KindMismatch {
                        left: kind,
                        right: value.kind(),
                    });
                }
                Ok(value.clone())
            }
            BoundRef::Arg(param) => {
                let value = binds
                    .get(param)?
                    .ok_or_else(|| RoutingError::NullNotAllowed(param.clone()))?;
                check_bind_kind(param, kind, value)?;
                Ok(value.clone().normalized())
            }
        }
    }
}

/// A value that may depend on bind parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueReference {
    /// A literal scalar.
    Const(Scalar),
    /// A single bind parameter compared for equality.
    ScalarArg {
        param: ParamId,
        kind: ScalarKind,
        /// When true a `NULL` binding contributes no value instead of failing.
        nullable: bool,
    },
    /// A range whose bounds may be bind parameters.
    RangeArg {
        lower: Option<BoundRef>,
        upper: Option<BoundRef>,
        lower_closed: bool,
        upper_closed: bool,
        kind: ScalarKind,
    },
}

/// A [`ValueReference`] after bind parameters were substituted.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    Scalar(Scalar),
    Range(Range),
}

impl ValueReference {
    /// A non-nullable scalar parameter.
    pub fn scalar_arg(param: impl Into<ParamId>, kind: ScalarKind) -> Self {
        ValueReference::ScalarArg {
            param: param.into(),
            kind,
            nullable: false,
        }
    }

    /// A scalar parameter that may be bound to `NULL`.
    pub fn nullable_arg(param: impl Into<ParamId>, kind: ScalarKind) -> Self {
        ValueReference::ScalarArg {
            param: param.into(),
            kind,
            nullable: true,
        }
    }

    /// A range reference.
    pub fn range(
        lower: Option<BoundRef>,
        upper: Option<BoundRef>,
        lower_closed: bool,
        upper_closed: bool,
        kind: ScalarKind,
    ) -> Self {
        ValueReference::RangeArg {
            lower,
            upper,
            lower_closed,
            upper_closed,
            kind,
        }
    }

    /// Returns true if this reference resolves without bind variables.
    pub fn is_const(&self) -> bool {
        self.params().next().is_none()
    }

    /// The bind parameters this reference depends on.
    pub fn params(&self) -> impl Iterator<Item = &ParamId> {
        let (first, second) = match self {
            ValueReference::Const(_) => (None, None),
            ValueReference::ScalarArg { param, .. } => (Some(param), None),
            ValueReference::RangeArg { lower, upper, .. } => (
                lower.as_ref().and_then(BoundRef::param),
                upper.as_ref().and_then(BoundRef::param),
            ),
        };
        first.into_iter().chain(second)
    }

    /// Substitutes bind parameters.
    ///
    /// Returns `Ok(None)` only for a nullable scalar parameter bound to
    /// `NULL`, which matches nothing.
    pub fn resolve(&self, binds: &BindVariables) -> Result<Option<ResolvedValue>> {
        match self {
            ValueReference::Const(value) => Ok(Some(ResolvedValue::Scalar(value.clone()))),
            ValueReference::ScalarArg {
                param,
                kind,
                nullable,
            } => match binds.get(param)? {
                Some(value) => {
                    check_bind_kind(param, *kind, value)?;
                    Ok(Some(ResolvedValue::Scalar(value.clone().normalized())))
                }
                None if *nullable => Ok(None),
                None => Err(RoutingError::NullNotAllowed(param.clone())),
            },
            ValueReference::RangeArg {
                lower,
                upper,
                lower_closed,
                upper_closed,
                kind,
            } => {
                let lower = lower
                    .as_ref()
                    .map(|b| b.resolve(*kind, binds))
                    .transpose()?;
                let upper = upper
                    .as_ref()
                    .map(|b| b.resolve(*kind, binds))
                    .transpose()?;
                let range = if lower.is_none() && upper.is_none() {
                    Range::unbounded(*kind)
                } else {
                    Range::new(lower, upper, *lower_closed, *upper_closed)?
                };
                Ok(Some(ResolvedValue::Range(range)))
            }
        }
    }
}

fn check_bind_kind(param: &ParamId, expected: ScalarKind, value: &Scalar) -> Result<()> {
    if value.kind() == expected {
        Ok(())
    } else {
        Err(RoutingError::BindKindMismatch {
            param: param.clone(),
            expected,
            actual: value.kind(),
        })
    }
}
