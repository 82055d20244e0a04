//! Intervals over a single scalar domain.
//!
//! A [`Range`] has an independently optional lower and upper bound, each
//! open or closed. Ranges are immutable: every set operation returns a new
//! value, and every operation that compares bounds fails instead of
//! guessing when the operands have different kinds.
//!
//! Boundary rules at a shared value `v`:
//! - `[a, v]` and `[v, b]` intersect (both contain `v`).
//! - `[a, v)` and `[v, b]` do not intersect, but their union is `[a, b]`.
//! - `[a, v)` and `(v, b]` neither intersect nor unite (`v` is missing).

use std::cmp::Ordering;
use std::fmt::{self, Display};

use serde::Serialize;

use crate::error::{Result, RoutingError};
use crate::scalar::{Scalar, ScalarKind};

/// An interval of scalars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Range {
    lower: Option<Scalar>,
    upper: Option<Scalar>,
    lower_closed: bool,
    upper_closed: bool,
    kind: Option<ScalarKind>,
}

/// One side of a range, borrowed for comparison.
#[derive(Clone, Copy)]
struct Bound<'a> {
    value: Option<&'a Scalar>,
    closed: bool,
}

/// Orders lower bounds: absent is least, and at equal values closed sorts first.
fn cmp_lower(a: Bound<'_>, b: Bound<'_>) -> Result<Ordering> {
    match (a.value, b.value) {
        (None, None) => Ok(Ordering::Equal),
        (None, Some(_)) => Ok(Ordering::Less),
        (Some(_), None) => Ok(Ordering::Greater),
        (Some(x), Some(y)) => Ok(x.compare(y)?.then_with(|| b.closed.cmp(&a.closed))),
    }
}

/// Orders upper bounds: absent is greatest, and at equal values open sorts first.
fn cmp_upper(a: Bound<'_>, b: Bound<'_>) -> Result<Ordering> {
    match (a.value, b.value) {
        (None, None) => Ok(Ordering::Equal),
        (None, Some(_)) => Ok(Ordering::Greater),
        (Some(_), None) => Ok(Ordering::Less),
        (Some(x), Some(y)) => Ok(x.compare(y)?.then_with(|| a.closed.cmp(&b.closed))),
    }
}

impl Range {
    /// Creates a range, validating its bounds.
    ///
    /// An absent bound is unbounded on that side and is always reported as
    /// open. Fails if the bounds have different kinds, if `lower > upper`,
    /// or if the bounds are equal and not both closed.
    pub fn new(
        lower: Option<Scalar>,
        upper: Option<Scalar>,
        lower_closed: bool,
        upper_closed: bool,
    ) -> Result<Self> {
        Self::with_kind(lower, upper, lower_closed, upper_closed, None)
    }

    fn with_kind(
        lower: Option<Scalar>,
        upper: Option<Scalar>,
        lower_closed: bool,
        upper_closed: bool,
        fallback_kind: Option<ScalarKind>,
    ) -> Result<Self> {
        let kind = match (&lower, &upper) {
            (Some(l), Some(u)) => {
                if l.kind() != u.kind() {
                    return Err(RoutingError::MismatchedBoundKinds {
                        lower: l.kind(),
                        upper: u.kind(),
                    });
                }
                match l.compare(u)? {
                    Ordering::Greater => {
                        return Err(RoutingError::InvertedRange {
                            lower: l.clone(),
                            upper: u.clone(),
                        });
                    }
                    Ordering::Equal if !(lower_closed && upper_closed) => {
                        return Err(RoutingError::EmptyRange { value: l.clone() });
                    }
                    _ => Some(l.kind()),
                }
            }
            (Some(l), None) => Some(l.kind()),
            (None, Some(u)) => Some(u.kind()),
            (None, None) => fallback_kind,
        };

        Ok(Self {
            lower_closed: lower_closed && lower.is_some(),
            upper_closed: upper_closed && upper.is_some(),
            lower,
            upper,
            kind,
        })
    }

    /// `[lower, upper]`
    pub fn closed(lower: impl Into<Scalar>, upper: impl Into<Scalar>) -> Result<Self> {
        Self::new(Some(lower.into()), Some(upper.into()), true, true)
    }

    /// `(lower, upper)`
    pub fn open(lower: impl Into<Scalar>, upper: impl Into<Scalar>) -> Result<Self> {
        Self::new(Some(lower.into()), Some(upper.into()), false, false)
    }

    /// `[value, value]`
    pub fn point(value: impl Into<Scalar>) -> Self {
        let value = value.into();
        Self {
            kind: Some(value.kind()),
            lower: Some(value.clone()),
            upper: Some(value),
            lower_closed: true,
            upper_closed: true,
        }
    }

    /// `[value, +∞)`
    pub fn at_least(value: impl Into<Scalar>) -> Self {
        Self::half_open_above(value.into(), true)
    }

    /// `(value, +∞)`
    pub fn greater_than(value: impl Into<Scalar>) -> Self {
        Self::half_open_above(value.into(), false)
    }

    /// `(-∞, value]`
    pub fn at_most(value: impl Into<Scalar>) -> Self {
        Self::half_open_below(value.into(), true)
    }

    /// `(-∞, value)`
    pub fn less_than(value: impl Into<Scalar>) -> Self {
        Self::half_open_below(value.into(), false)
    }

    /// `(-∞, +∞)` over `kind`.
    pub fn unbounded(kind: ScalarKind) -> Self {
        Self {
            lower: None,
            upper: None,
            lower_closed: false,
            upper_closed: false,
            kind: Some(kind),
        }
    }

    fn half_open_above(value: Scalar, closed: bool) -> Self {
        Self {
            kind: Some(value.kind()),
            lower: Some(value),
            upper: None,
            lower_closed: closed,
            upper_closed: false,
        }
    }

    fn half_open_below(value: Scalar, closed: bool) -> Self {
        Self {
            kind: Some(value.kind()),
            lower: None,
            upper: Some(value),
            lower_closed: false,
            upper_closed: closed,
        }
    }

    pub fn lower(&self) -> Option<&Scalar> {
        self.lower.as_ref()
    }

    pub fn upper(&self) -> Option<&Scalar> {
        self.upper.as_ref()
    }

    pub fn is_lower_closed(&self) -> bool {
        self.lower_closed
    }

    pub fn is_upper_closed(&self) -> bool {
        self.upper_closed
    }

    /// The kind of the bounds, or `None` for a range built without any bound.
    pub fn kind(&self) -> Option<ScalarKind> {
        self.kind
    }

    fn lower_bound(&self) -> Bound<'_> {
        Bound {
            value: self.lower.as_ref(),
            closed: self.lower_closed,
        }
    }

    fn upper_bound(&self) -> Bound<'_> {
        Bound {
            value: self.upper.as_ref(),
            closed: self.upper_closed,
        }
    }

    fn check_kind(&self, kind: ScalarKind) -> Result<()> {
        match self.kind {
            Some(own) if own != kind => Err(RoutingError::KindMismatch {
                left: own,
                right: kind,
            }),
            _ => Ok(()),
        }
    }

    fn check_compatible(&self, other: &Range) -> Result<()> {
        match other.kind {
            Some(kind) => self.check_kind(kind),
            None => Ok(()),
        }
    }

    /// Returns true if `value` lies inside this range.
    pub fn contains_value(&self, value: &Scalar) -> Result<bool> {
        self.check_kind(value.kind())?;

        if let Some(lower) = &self.lower {
            match value.compare(lower)? {
                Ordering::Less => return Ok(false),
                Ordering::Equal if !self.lower_closed => return Ok(false),
                _ => {}
            }
        }

        if let Some(upper) = &self.upper {
            match value.compare(upper)? {
                Ordering::Greater => return Ok(false),
                Ordering::Equal if !self.upper_closed => return Ok(false),
                _ => {}
            }
        }

        Ok(true)
    }

    /// Returns true if `other` is a subset of this range.
    pub fn contains(&self, other: &Range) -> Result<bool> {
        self.check_compatible(other)?;
        let lower_ok = cmp_lower(self.lower_bound(), other.lower_bound())? != Ordering::Greater;
        let upper_ok = cmp_upper(other.upper_bound(), self.upper_bound())? != Ordering::Greater;
        Ok(lower_ok && upper_ok)
    }

    /// Returns the two ranges ordered by lower bound.
    fn ordered<'a>(&'a self, other: &'a Range) -> Result<(&'a Range, &'a Range)> {
        if cmp_lower(self.lower_bound(), other.lower_bound())? == Ordering::Greater {
            Ok((other, self))
        } else {
            Ok((self, other))
        }
    }

    /// Returns true if the two ranges share at least one value.
    pub fn has_intersection(&self, other: &Range) -> Result<bool> {
        self.check_compatible(other)?;
        let (first, second) = self.ordered(other)?;
        match (&first.upper, &second.lower) {
            (None, _) | (_, None) => Ok(true),
            (Some(upper), Some(lower)) => Ok(match upper.compare(lower)? {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => first.upper_closed && second.lower_closed,
            }),
        }
    }

    /// Returns true if the ranges touch at one value held by exactly one side.
    fn is_adjacent(&self, other: &Range) -> Result<bool> {
        let (first, second) = self.ordered(other)?;
        match (&first.upper, &second.lower) {
            (Some(upper), Some(lower)) => Ok(upper.compare(lower)? == Ordering::Equal
                && first.upper_closed != second.lower_closed),
            _ => Ok(false),
        }
    }

    /// Returns the overlap of the two ranges, or `None` if they are disjoint.
    pub fn intersect(&self, other: &Range) -> Result<Option<Range>> {
        if !self.has_intersection(other)? {
            return Ok(None);
        }

        let lower = if cmp_lower(self.lower_bound(), other.lower_bound())? == Ordering::Less {
            other.lower_bound()
        } else {
            self.lower_bound()
        };
        let upper = if cmp_upper(self.upper_bound(), other.upper_bound())? == Ordering::Greater {
            other.upper_bound()
        } else {
            self.upper_bound()
        };

        Self::from_bounds(lower, upper, self.kind.or(other.kind)).map(Some)
    }

    /// Returns the single range covering both, or `None` if their union has a gap.
    pub fn union(&self, other: &Range) -> Result<Option<Range>> {
        if !self.has_intersection(other)? && !self.is_adjacent(other)? {
            return Ok(None);
        }

        let lower = if cmp_lower(self.lower_bound(), other.lower_bound())? == Ordering::Greater {
            other.lower_bound()
        } else {
            self.lower_bound()
        };
        let upper = if cmp_upper(self.upper_bound(), other.upper_bound())? == Ordering::Less {
            other.upper_bound()
        } else {
            self.upper_bound()
        };

        Self::from_bounds(lower, upper, self.kind.or(other.kind)).map(Some)
    }

    fn from_bounds(lower: Bound<'_>, upper: Bound<'_>, kind: Option<ScalarKind>) -> Result<Range> {
        Self::with_kind(
            lower.value.cloned(),
            upper.value.cloned(),
            lower.closed,
            upper.closed,
            kind,
        )
    }

    /// Orders ranges by lower bound, for keeping range lists sorted.
    pub(crate) fn cmp_by_lower(&self, other: &Range) -> Result<Ordering> {
        cmp_lower(self.lower_bound(), other.lower_bound())
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.lower {
            Some(v) if self.lower_closed => write!(f, "[{v}")?,
            Some(v) => write!(f, "({v}")?,
            None => f.write_str("(-∞")?,
        }
        f.write_str(", ")?;
        match &self.upper {
            Some(v) if self.upper_closed => write!(f, "{v}]"),
            Some(v) => write!(f, "{v})"),
            None => f.write_str("+∞)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn closed(l: i64, u: i64) -> Range {
        Range::closed(l, u).unwrap()
    }

    fn open(l: i64, u: i64) -> Range {
        Range::open(l, u).unwrap()
    }

    fn half_open(l: i64, u: i64) -> Range {
        Range::new(Some(l.into()), Some(u.into()), true, false).unwrap()
    }

    #[test]
    fn construction_rejects_inverted_bounds() {
        let err = Range::closed(10, 5).unwrap_err();
        assert_eq!(
            err,
            RoutingError::InvertedRange {
                lower: Scalar::Signed(10),
                upper: Scalar::Signed(5),
            }
        );
    }

    #[test]
    fn construction_rejects_empty_open_range() {
        assert!(matches!(
            Range::new(Some(5.into()), Some(5.into()), true, false),
            Err(RoutingError::EmptyRange { .. })
        ));
        assert_eq!(Range::closed(5, 5).unwrap(), Range::point(5));
    }

    #[test]
    fn construction_rejects_mixed_kinds() {
        let err = Range::closed(1_i64, "z").unwrap_err();
        assert_eq!(
            err,
            RoutingError::MismatchedBoundKinds {
                lower: ScalarKind::Signed,
                upper: ScalarKind::Text,
            }
        );
    }

    #[test]
    fn absent_bound_is_reported_open() {
        let r = Range::new(None, Some(Scalar::Signed(3)), true, true).unwrap();
        assert!(!r.is_lower_closed());
        assert!(r.is_upper_closed());
        assert_eq!(r, Range::at_most(3));
    }

    #[test_case(closed(1, 5), 1 => true; "closed lower bound")]
    #[test_case(open(1, 5), 1 => false; "open lower bound")]
    #[test_case(open(1, 5), 5 => false; "open upper bound")]
    #[test_case(closed(1, 5), 6 => false; "above")]
    #[test_case(Range::less_than(0), -100 => true; "unbounded below")]
    #[test_case(Range::unbounded(ScalarKind::Signed), 42 => true; "unbounded")]
    fn contains_value(range: Range, value: i64) -> bool {
        range.contains_value(&Scalar::Signed(value)).unwrap()
    }

    #[test]
    fn contains_value_rejects_other_kind() {
        let err = closed(1, 5).contains_value(&Scalar::from("3")).unwrap_err();
        assert_eq!(
            err,
            RoutingError::KindMismatch {
                left: ScalarKind::Signed,
                right: ScalarKind::Text,
            }
        );
    }

    #[test_case(closed(1, 10), closed(1, 10) => true; "equal")]
    #[test_case(closed(1, 10), open(1, 10) => true; "closed holds open")]
    #[test_case(open(1, 10), closed(1, 10) => false; "open does not hold closed")]
    #[test_case(open(1, 10), open(1, 10) => true; "open holds open")]
    #[test_case(closed(1, 10), closed(2, 11) => false; "sticks out above")]
    #[test_case(Range::at_least(0), closed(5, 500) => true; "unbounded above")]
    #[test_case(closed(0, 5), Range::at_least(0) => false; "bounded holds unbounded")]
    fn contains_range(outer: Range, inner: Range) -> bool {
        outer.contains(&inner).unwrap()
    }

    #[test_case(closed(100, 200), closed(20, 30) => false; "disjoint")]
    #[test_case(closed(100, 200), closed(20, 150) => true; "overlap")]
    #[test_case(closed(1, 5), closed(5, 9) => true; "touching closed")]
    #[test_case(half_open(1, 5), closed(5, 9) => false; "touching half open")]
    #[test_case(open(1, 5), open(5, 9) => false; "touching open")]
    #[test_case(closed(100, 200), Range::at_most(20) => false; "unbounded below disjoint")]
    #[test_case(closed(100, 200), Range::less_than(150) => true; "unbounded below overlap")]
    #[test_case(Range::at_least(3), Range::at_most(3) => true; "half lines meet")]
    fn has_intersection(a: Range, b: Range) -> bool {
        let forward = a.has_intersection(&b).unwrap();
        assert_eq!(forward, b.has_intersection(&a).unwrap());
        forward
    }

    #[test_case(closed(100, 200), closed(20, 30) => None; "disjoint")]
    #[test_case(closed(100, 200), closed(20, 150) => Some(closed(100, 150)); "overlap")]
    #[test_case(closed(1, 5), closed(5, 9) => Some(Range::point(5)); "single point")]
    #[test_case(open(1, 10), closed(1, 10) => Some(open(1, 10)); "open wins at equal bounds")]
    #[test_case(Range::less_than(150), Range::at_least(100) => Some(half_open(100, 150)); "half lines")]
    fn intersect(a: Range, b: Range) -> Option<Range> {
        a.intersect(&b).unwrap()
    }

    #[test_case(closed(100, 200), closed(20, 150) => Some(closed(20, 200)); "overlap")]
    #[test_case(closed(100, 200), closed(20, 30) => None; "gap")]
    #[test_case(half_open(1, 5), closed(5, 9) => Some(closed(1, 9)); "adjacent")]
    #[test_case(open(1, 5), open(5, 9) => None; "point missing")]
    #[test_case(open(1, 10), closed(1, 10) => Some(closed(1, 10)); "closed wins at equal bounds")]
    #[test_case(closed(100, 200), Range::at_most(150) => Some(Range::at_most(200)); "unbounded below")]
    fn union(a: Range, b: Range) -> Option<Range> {
        a.union(&b).unwrap()
    }

    #[test]
    fn self_intersection_is_identity() {
        for r in [closed(1, 2), open(-5, 5), Range::at_least(9), Range::less_than(0)] {
            assert_eq!(r.intersect(&r).unwrap(), Some(r.clone()));
        }
    }

    #[test]
    fn intersect_keeps_kind_of_unbounded_input() {
        let bare = Range::new(None, None, false, false).unwrap();
        assert_eq!(bare.kind(), None);
        let r = bare.intersect(&Range::unbounded(ScalarKind::Text)).unwrap().unwrap();
        assert_eq!(r.kind(), Some(ScalarKind::Text));
    }

    #[test]
    fn set_operations_reject_mixed_kinds() {
        let ints = closed(1, 5);
        let text = Range::closed("a", "m").unwrap();
        assert!(ints.has_intersection(&text).is_err());
        assert!(ints.intersect(&text).is_err());
        assert!(ints.union(&text).is_err());
        assert!(ints.contains(&text).is_err());
    }

    #[test]
    fn text_ranges_compare_bytewise() {
        let r = Range::new(Some("apple".into()), Some("banana".into()), true, false).unwrap();
        assert!(r.contains_value(&Scalar::from("avocado")).unwrap());
        assert!(!r.contains_value(&Scalar::from("banana")).unwrap());
    }

    #[test]
    fn display_uses_interval_notation() {
        assert_eq!(closed(10, 100).to_string(), "[10, 100]");
        assert_eq!(Range::less_than(5).to_string(), "(-∞, 5)");
        assert_eq!(Range::greater_than(5).to_string(), "(5, +∞)");
    }
}
