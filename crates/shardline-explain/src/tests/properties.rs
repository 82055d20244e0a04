//! Literal conditions checked against direct evaluation.

use proptest::prelude::*;
use shardline_routing::{Range, Scalar};

use super::select_orders;

fn in_list(values: &[i64]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

proptest! {
    #[test]
    fn in_list_yields_sorted_distinct_values(values in prop::collection::vec(-50i64..50, 1..12)) {
        let routed = select_orders(&format!("user_id IN ({})", in_list(&values)));

        let mut expected: Vec<Scalar> = values.iter().copied().map(Scalar::Signed).collect();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(routed.scalar_values("user_id"), expected.as_slice());
    }

    #[test]
    fn and_of_betweens_is_their_intersection(
        a in -50i64..50, b in -50i64..50, c in -50i64..50, d in -50i64..50,
    ) {
        let (a, b) = (a.min(b), a.max(b));
        let (c, d) = (c.min(d), c.max(d));
        let routed = select_orders(&format!(
            "user_id BETWEEN {a} AND {b} AND user_id BETWEEN {c} AND {d}"
        ));

        let expected = Range::closed(a, b)
            .unwrap()
            .intersect(&Range::closed(c, d).unwrap())
            .unwrap();
        match expected {
            Some(range) => prop_assert_eq!(routed.range_values("user_id"), &[range][..]),
            None => prop_assert!(!routed.has_candidates("user_id")),
        }
    }

    #[test]
    fn in_list_and_equality_keep_only_the_shared_value(
        values in prop::collection::vec(-20i64..20, 1..8),
        needle in -20i64..20,
    ) {
        let routed = select_orders(&format!(
            "user_id IN ({}) AND user_id = {needle}",
            in_list(&values)
        ));

        if values.contains(&needle) {
            prop_assert_eq!(routed.scalar_values("user_id"), &[Scalar::Signed(needle)][..]);
        } else {
            prop_assert!(!routed.has_candidates("user_id"));
        }
    }
}
