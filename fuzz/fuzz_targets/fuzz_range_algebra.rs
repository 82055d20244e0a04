#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shardline_routing::{Range, Scalar};

/// Fuzzer-friendly range over signed integers.
#[derive(Debug, Clone, Copy, Arbitrary)]
struct FuzzRange {
    lower: Option<i8>,
    upper: Option<i8>,
    lower_closed: bool,
    upper_closed: bool,
}

impl FuzzRange {
    fn build(self) -> Option<Range> {
        Range::new(
            self.lower.map(|v| Scalar::Signed(i64::from(v))),
            self.upper.map(|v| Scalar::Signed(i64::from(v))),
            self.lower_closed,
            self.upper_closed,
        )
        .ok()
    }
}

fuzz_target!(|input: (FuzzRange, FuzzRange, i8)| {
    let (a, b, needle) = input;
    let (Some(a), Some(b)) = (a.build(), b.build()) else {
        return;
    };
    let needle = Scalar::Signed(i64::from(needle));

    let intersection = a.intersect(&b).expect("same kind");
    assert_eq!(intersection.is_some(), a.has_intersection(&b).expect("same kind"));
    assert_eq!(intersection, b.intersect(&a).expect("same kind"));

    let in_both = a.contains_value(&needle).expect("same kind")
        && b.contains_value(&needle).expect("same kind");
    let in_intersection = intersection
        .as_ref()
        .is_some_and(|r| r.contains_value(&needle).expect("same kind"));
    assert_eq!(in_both, in_intersection);

    if let Some(union) = a.union(&b).expect("same kind") {
        assert!(union.contains(&a).expect("same kind"));
        assert!(union.contains(&b).expect("same kind"));
    }
});
