//! Predicate recognition and condition composition.

use shardline_routing::{BindVariables, ParamId, Range, RoutingError, Scalar};
use test_case::test_case;

use super::{explainer, route, schema, select_orders};
use crate::error::ExplainError;
use crate::walker::{ExplainOptions, Explainer};

fn ints(values: &[i64]) -> Vec<Scalar> {
    values.iter().copied().map(Scalar::Signed).collect()
}

#[test_case("user_id = 5" => (ints(&[5]), vec![]); "equality")]
#[test_case("5 = user_id" => (ints(&[5]), vec![]); "reversed equality")]
#[test_case("user_id = -4" => (ints(&[-4]), vec![]); "negative literal")]
#[test_case("user_id = '12'" => (ints(&[12]), vec![]); "quoted literal takes column kind")]
#[test_case("user_id > 5" => (vec![], vec![Range::greater_than(5)]); "greater than")]
#[test_case("10 >= user_id" => (vec![], vec![Range::at_most(10)]); "reversed at most")]
#[test_case("user_id BETWEEN 1 AND 9" => (vec![], vec![Range::closed(1, 9).unwrap()]); "between")]
#[test_case("user_id IN (3, 1, 2)" => (ints(&[1, 2, 3]), vec![]); "in list")]
#[test_case("user_id > 1 AND user_id < 10" => (vec![], vec![Range::open(1, 10).unwrap()]); "and of ranges")]
#[test_case("(user_id = 1 OR user_id = 2) AND user_id = 2" => (ints(&[2]), vec![]); "or group inside and")]
#[test_case("user_id = 1 OR user_id > 100" => (ints(&[1]), vec![Range::greater_than(100)]); "or of scalar and range")]
#[test_case("user_id IN (1, 2) AND (user_id = 2 OR user_id = 3)" => (ints(&[2]), vec![]); "in list narrowed by group")]
#[test_case("region = 'eu' AND user_id = 1" => (ints(&[1]), vec![]); "other sharding column")]
#[test_case("total > 3 AND user_id = 1" => (ints(&[1]), vec![]); "unsharded column under and")]
fn user_id_candidates(condition: &str) -> (Vec<Scalar>, Vec<Range>) {
    let values = select_orders(condition);
    (
        values.scalar_values("user_id").to_vec(),
        values.range_values("user_id").to_vec(),
    )
}

#[test_case("user_id = 1 OR total > 5"; "or with unsharded branch")]
#[test_case("NOT user_id = 1"; "negation")]
#[test_case("user_id <> 1"; "inequality")]
#[test_case("user_id NOT IN (1, 2)"; "negated in list")]
#[test_case("user_id NOT BETWEEN 1 AND 2"; "negated between")]
#[test_case("user_id = total + 1"; "expression operand")]
#[test_case("user_id IN (1, total)"; "in list with expression")]
#[test_case("region LIKE 'e%' AND total = 1"; "like")]
#[test_case("region = 'eu' OR total = 2"; "or with one sharded branch")]
fn user_id_unconstrained(condition: &str) {
    assert!(select_orders(condition).column("user_id").is_none());
}

#[test]
fn or_keeps_tables_every_branch_constrains() {
    let values = select_orders("(user_id = 1 AND region = 'eu') OR (user_id = 2 AND total = 0)");
    assert_eq!(values.scalar_values("user_id"), ints(&[1, 2]).as_slice());
    assert_eq!(values.logic("user_id"), Some(shardline_routing::BinaryLogic::Or));
}

#[test]
fn literal_null_matches_nothing() {
    let values = select_orders("user_id = NULL");
    assert!(values.column("user_id").is_some());
    assert!(!values.has_candidates("user_id"));

    let values = select_orders("user_id = NULL OR user_id = 3");
    assert_eq!(values.scalar_values("user_id"), ints(&[3]).as_slice());
}

#[test]
fn inverted_literal_between_matches_nothing() {
    let values = select_orders("user_id BETWEEN 9 AND 1");
    assert!(!values.has_candidates("user_id"));
}

#[test]
fn positional_placeholders_count_the_whole_statement() {
    let explained = explainer()
        .explain("SELECT ? AS tag FROM orders WHERE user_id = ? AND region IN (?, 'eu')")
        .unwrap();
    assert_eq!(explained.positional_params, 3);
    assert_eq!(
        explained.log.params().into_iter().collect::<Vec<_>>(),
        vec![ParamId::Index(1), ParamId::Index(2)]
    );

    let binds = BindVariables::new().with("x").with(9_i64).with("us");
    let routed = explained.log.redo(&binds).unwrap();
    assert_eq!(routed["orders"].scalar_values("user_id"), ints(&[9]).as_slice());
    assert_eq!(
        routed["orders"].scalar_values("region"),
        &[Scalar::from("eu"), Scalar::from("us")]
    );
}

#[test]
fn range_placeholders_resolve_per_execution() {
    let explained = explainer()
        .explain("SELECT * FROM orders WHERE user_id BETWEEN ? AND ?")
        .unwrap();

    let first = explained
        .log
        .redo(&BindVariables::new().with(1_i64).with(5_i64))
        .unwrap();
    let second = explained
        .log
        .redo(&BindVariables::new().with(50_i64).with(60_i64))
        .unwrap();
    assert_eq!(
        first["orders"].range_values("user_id"),
        &[Range::closed(1, 5).unwrap()]
    );
    assert_eq!(
        second["orders"].range_values("user_id"),
        &[Range::closed(50, 60).unwrap()]
    );

    let err = explained
        .log
        .redo(&BindVariables::new().with(6_i64).with(5_i64))
        .unwrap_err();
    assert!(matches!(err, RoutingError::InvertedRange { .. }));
}

#[test]
fn null_in_list_follows_options() {
    let sql = "SELECT * FROM orders WHERE user_id IN (?, ?)";
    let binds = BindVariables::new().with(1_i64).with_null();

    let routed = route(sql, &binds);
    assert_eq!(routed["orders"].scalar_values("user_id"), ints(&[1]).as_slice());

    let strict = Explainer::new(
        schema(),
        ExplainOptions {
            nullable_in_list: false,
            ..ExplainOptions::default()
        },
    );
    let err = strict.explain(sql).unwrap().log.redo(&binds).unwrap_err();
    assert_eq!(err, RoutingError::NullNotAllowed(ParamId::Index(1)));
}

#[test]
fn equality_placeholder_rejects_null() {
    let explained = explainer()
        .explain("SELECT * FROM orders WHERE user_id = ?")
        .unwrap();
    let err = explained
        .log
        .redo(&BindVariables::new().with_null())
        .unwrap_err();
    assert_eq!(err, RoutingError::NullNotAllowed(ParamId::Index(0)));
}

#[test]
fn invalid_literal_fails_explain() {
    let err = explainer()
        .explain("SELECT * FROM orders WHERE user_id = 'abc'")
        .unwrap_err();
    assert!(matches!(
        err,
        ExplainError::Routing(RoutingError::InvalidLiteral { .. })
    ));
}

#[test]
fn depth_limit_is_enforced() {
    let shallow = Explainer::new(
        schema(),
        ExplainOptions {
            max_depth: 2,
            ..ExplainOptions::default()
        },
    );
    let err = shallow
        .explain("SELECT * FROM orders WHERE user_id = 1 AND (user_id = 2 OR (user_id = 3 AND region = 'eu'))")
        .unwrap_err();
    assert!(matches!(err, ExplainError::DepthLimitExceeded { limit: 2 }));

    assert!(shallow
        .explain("SELECT * FROM orders WHERE user_id = 1 AND region = 'eu'")
        .is_ok());
}
