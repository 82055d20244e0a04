//! Typed scalar values compared during routing.

use std::cmp::Ordering;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};

/// The ordered domain a [`Scalar`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// 64-bit signed integer.
    Signed,
    /// 64-bit unsigned integer.
    Unsigned,
    /// 64-bit floating point.
    Float,
    /// UTF-8 string, ordered bytewise.
    Text,
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Signed => "signed",
            ScalarKind::Unsigned => "unsigned",
            ScalarKind::Float => "float",
            ScalarKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// A single comparable value taken from a predicate or a bind variable.
///
/// Values of different kinds never compare equal and [`Scalar::compare`]
/// refuses to order them. The `Ord` impl exists so scalars can live in
/// ordered sets: it sorts by kind first, and floats use a total order
/// (NaN < -Inf < ... < +Inf) in which `-0.0` equals `0.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Scalar {
    /// Signed integer.
    Signed(i64),
    /// Unsigned integer.
    Unsigned(u64),
    /// Floating point.
    Float(f64),
    /// String.
    Text(String),
}

impl Scalar {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Signed(_) => ScalarKind::Signed,
            Scalar::Unsigned(_) => ScalarKind::Unsigned,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::Text(_) => ScalarKind::Text,
        }
    }

    /// Compares two values of the same kind.
    ///
    /// Fails with [`RoutingError::KindMismatch`] when the kinds differ.
    pub fn compare(&self, other: &Scalar) -> Result<Ordering> {
        match (self, other) {
            (Scalar::Signed(a), Scalar::Signed(b)) => Ok(a.cmp(b)),
            (Scalar::Unsigned(a), Scalar::Unsigned(b)) => Ok(a.cmp(b)),
            (Scalar::Float(a), Scalar::Float(b)) => Ok(canonical(*a).total_cmp(&canonical(*b))),
            (Scalar::Text(a), Scalar::Text(b)) => Ok(a.cmp(b)),
            _ => Err(RoutingError::KindMismatch {
                left: self.kind(),
                right: other.kind(),
            }),
        }
    }

    /// Parses a SQL literal as a value of `kind`.
    ///
    /// This is how literals take on the declared kind of the column they are
    /// compared with: `'42'` against an unsigned column becomes
    /// `Unsigned(42)`, while `-1` against the same column is rejected.
    pub fn parse_as(kind: ScalarKind, literal: &str) -> Result<Scalar> {
        let invalid = || RoutingError::InvalidLiteral {
            kind,
            literal: literal.to_string(),
        };

        match kind {
            ScalarKind::Signed => literal.trim().parse().map(Scalar::Signed).map_err(|_| invalid()),
            ScalarKind::Unsigned => literal
                .trim()
                .parse()
                .map(Scalar::Unsigned)
                .map_err(|_| invalid()),
            ScalarKind::Float => literal
                .trim()
                .parse()
                .map(|v| Scalar::Float(canonical(v)))
                .map_err(|_| invalid()),
            ScalarKind::Text => Ok(Scalar::Text(literal.to_string())),
        }
    }

    /// Returns the value as an i64, if it is `Signed`.
    pub fn as_signed(&self) -> Option<i64> {
        match self {
            Scalar::Signed(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a u64, if it is `Unsigned`.
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            Scalar::Unsigned(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as an f64, if it is `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a string slice, if it is `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value with `-0.0` replaced by `0.0`.
    #[must_use]
    pub fn normalized(self) -> Scalar {
        match self {
            Scalar::Float(v) => Scalar::Float(canonical(v)),
            other => other,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Scalar::Signed(_) => 0,
            Scalar::Unsigned(_) => 1,
            Scalar::Float(_) => 2,
            Scalar::Text(_) => 3,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Signed(a), Scalar::Signed(b)) => a == b,
            (Scalar::Unsigned(a), Scalar::Unsigned(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => canonical(*a).to_bits() == canonical(*b).to_bits(),
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

impl std::hash::Hash for Scalar {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Scalar::Signed(v) => v.hash(state),
            Scalar::Unsigned(v) => v.hash(state),
            Scalar::Float(v) => canonical(*v).to_bits().hash(state),
            Scalar::Text(v) => v.hash(state),
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
            .unwrap_or_else(|_| self.kind_rank().cmp(&other.kind_rank()))
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Signed(v) => write!(f, "{v}"),
            Scalar::Unsigned(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::Text(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Signed(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Signed(i64::from(v))
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar::Unsigned(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(canonical(v))
    }
}

/// SQL compares `-0.0` equal to `0.0`; the sign of zero is dropped.
fn canonical(v: f64) -> f64 {
    if v.to_bits() == (-0.0_f64).to_bits() {
        0.0
    } else {
        v
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}
