//! Bind variables supplied per statement execution.

use std::collections::HashMap;
use std::fmt::{self, Display};

use crate::error::{Result, RoutingError};
use crate::scalar::Scalar;

/// Identifies one bind parameter of a prepared statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamId {
    /// Positional parameter, 0-based in order of appearance.
    Index(usize),
    /// Named parameter, without its sigil.
    Name(String),
}

impl Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamId::Index(i) => write!(f, "#{i}"),
            ParamId::Name(name) => write!(f, ":{name}"),
        }
    }
}

impl From<usize> for ParamId {
    fn from(index: usize) -> Self {
        ParamId::Index(index)
    }
}

impl From<&str> for ParamId {
    fn from(name: &str) -> Self {
        ParamId::Name(name.to_string())
    }
}

/// Concrete parameter values for one execution.
///
/// `None` entries are SQL `NULL`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindVariables {
    positional: Vec<Option<Scalar>>,
    named: HashMap<String, Option<Scalar>>,
}

impl BindVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional value.
    #[must_use]
    pub fn with(mut self, value: impl Into<Scalar>) -> Self {
        self.positional.push(Some(value.into()));
        self
    }

    /// Appends a positional `NULL`.
    #[must_use]
    pub fn with_null(mut self) -> Self {
        self.positional.push(None);
        self
    }

    /// Binds a named value.
    #[must_use]
    pub fn with_named(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.named.insert(name.into(), Some(value.into()));
        self
    }

    /// Binds a named `NULL`.
    #[must_use]
    pub fn with_named_null(mut self, name: impl Into<String>) -> Self {
        self.named.insert(name.into(), None);
        self
    }

    /// Number of positional values.
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    /// Looks up a parameter. `Ok(None)` means it is bound to `NULL`.
    pub fn get(&self, param: &ParamId) -> Result<Option<&Scalar>> {
        match param {
            ParamId::Index(index) => self
                .positional
                .get(*index)
                .map(Option::as_ref)
                .ok_or(RoutingError::ParamIndexOutOfRange {
                    index: *index,
                    len: self.positional.len(),
                }),
            ParamId::Name(name) => self
                .named
                .get(name)
                .map(Option::as_ref)
                .ok_or_else(|| RoutingError::MissingBindVariable(param.clone())),
        }
    }
}

impl From<Vec<Scalar>> for BindVariables {
    fn from(values: Vec<Scalar>) -> Self {
        Self {
            positional: values.into_iter().map(Some).collect(),
            named: HashMap::new(),
        }
    }
}

impl From<Vec<Option<Scalar>>> for BindVariables {
    fn from(positional: Vec<Option<Scalar>>) -> Self {
        Self {
            positional,
            named: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_lookup() {
        let binds = BindVariables::new().with(7_i64).with_null();
        assert_eq!(binds.get(&ParamId::Index(0)).unwrap(), Some(&Scalar::Signed(7)));
        assert_eq!(binds.get(&ParamId::Index(1)).unwrap(), None);
        assert_eq!(
            binds.get(&ParamId::Index(2)).unwrap_err(),
            RoutingError::ParamIndexOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    fn named_lookup() {
        let binds = BindVariables::new()
            .with_named("region", "eu")
            .with_named_null("shard_hint");
        assert_eq!(
            binds.get(&"region".into()).unwrap(),
            Some(&Scalar::from("eu"))
        );
        assert_eq!(binds.get(&"shard_hint".into()).unwrap(), None);
        assert_eq!(
            binds.get(&"tenant".into()).unwrap_err(),
            RoutingError::MissingBindVariable(ParamId::Name("tenant".into()))
        );
    }
}
