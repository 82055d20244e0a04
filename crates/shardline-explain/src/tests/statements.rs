//! Statement shapes, table scoping and log structure.

use shardline_routing::{BinaryLogic, BindVariables, LogEntry, Scalar, ValueReference};

use super::{explainer, route};
use crate::error::ExplainError;
use crate::walker::StatementKind;

fn ints(values: &[i64]) -> Vec<Scalar> {
    values.iter().copied().map(Scalar::Signed).collect()
}

fn push(column: &str, logic: BinaryLogic, value: Scalar) -> LogEntry {
    LogEntry::PushValue {
        table: "orders".into(),
        column: column.into(),
        logic,
        values: vec![ValueReference::Const(value)],
    }
}

#[test]
fn log_mirrors_condition_tree() {
    let explained = explainer()
        .explain("SELECT * FROM orders WHERE user_id = 1 OR (user_id = 2 AND region = 'eu')")
        .unwrap();

    assert_eq!(explained.kind, StatementKind::Select);
    assert_eq!(
        explained.log.entries(),
        &[
            LogEntry::BeginLogic(BinaryLogic::And),
            LogEntry::BeginGroup,
            LogEntry::BeginLogic(BinaryLogic::Or),
            push("user_id", BinaryLogic::Or, Scalar::Signed(1)),
            LogEntry::BeginGroup,
            LogEntry::BeginLogic(BinaryLogic::And),
            push("user_id", BinaryLogic::And, Scalar::Signed(2)),
            push("region", BinaryLogic::And, Scalar::from("eu")),
            LogEntry::EndLogic,
            LogEntry::EndGroup,
            LogEntry::EndLogic,
            LogEntry::EndGroup,
            LogEntry::EndLogic,
        ]
    );

    let routed = explained.log.redo(&BindVariables::new()).unwrap();
    let orders = &routed["orders"];
    assert_eq!(orders.scalar_values("user_id"), ints(&[1, 2]).as_slice());
    assert_eq!(orders.logic("user_id"), Some(BinaryLogic::Or));
    assert_eq!(orders.scalar_values("region"), &[Scalar::from("eu")]);
}

#[test]
fn join_conditions_constrain_each_table() {
    let sql = "SELECT * FROM orders o INNER JOIN users u ON o.user_id = u.id AND u.id = 5 \
               WHERE o.user_id IN (5, 6)";
    let explained = explainer().explain(sql).unwrap();
    assert_eq!(explained.tables, vec!["orders", "users"]);

    let routed = explained.log.redo(&BindVariables::new()).unwrap();
    assert_eq!(routed["orders"].scalar_values("user_id"), ints(&[5, 6]).as_slice());
    assert_eq!(routed["users"].scalar_values("id"), ints(&[5]).as_slice());
}

#[test]
fn left_join_on_constrains_only_the_joined_table() {
    let sql = "SELECT * FROM orders o LEFT JOIN users u ON o.user_id = u.id AND o.user_id = 5 \
               AND u.id = 7";
    let routed = route(sql, &BindVariables::new());
    assert!(routed.get("orders").is_none_or(|orders| orders.column("user_id").is_none()));
    assert_eq!(routed["users"].scalar_values("id"), ints(&[7]).as_slice());

    let routed = route(
        "SELECT * FROM orders o LEFT JOIN users u ON o.user_id = 5 WHERE o.user_id = 9",
        &BindVariables::new(),
    );
    assert_eq!(routed["orders"].scalar_values("user_id"), ints(&[9]).as_slice());
}

#[test]
fn right_join_on_constrains_only_the_left_side() {
    let sql = "SELECT * FROM orders o RIGHT JOIN users u ON o.user_id = u.id AND o.user_id = 5 \
               AND u.id = 7";
    let routed = route(sql, &BindVariables::new());
    assert_eq!(routed["orders"].scalar_values("user_id"), ints(&[5]).as_slice());
    assert!(routed.get("users").is_none_or(|users| users.column("id").is_none()));
}

#[test]
fn full_join_on_records_nothing() {
    let explained = explainer()
        .explain(
            "SELECT * FROM orders o FULL OUTER JOIN users u ON o.user_id = 5 AND (u.id = 7 OR u.id = 8)",
        )
        .unwrap();
    assert_eq!(explained.tables, vec!["orders", "users"]);
    assert!(explained.log.tables().is_empty());

    let routed = route(
        "SELECT * FROM orders o FULL OUTER JOIN users u ON o.user_id = u.id WHERE u.id = 2",
        &BindVariables::new(),
    );
    assert_eq!(routed["users"].scalar_values("id"), ints(&[2]).as_slice());
    assert!(routed.get("orders").is_none_or(|orders| orders.column("user_id").is_none()));
}

#[test]
fn table_name_qualifies_columns() {
    let routed = route(
        "SELECT * FROM orders, users WHERE orders.user_id = 3 AND users.id = 4",
        &BindVariables::new(),
    );
    assert_eq!(routed["orders"].scalar_values("user_id"), ints(&[3]).as_slice());
    assert_eq!(routed["users"].scalar_values("id"), ints(&[4]).as_slice());
}

#[test]
fn self_join_is_left_unconstrained() {
    let explained = explainer()
        .explain(
            "SELECT * FROM orders a INNER JOIN orders b ON a.region = b.region \
             WHERE a.user_id = 1",
        )
        .unwrap();
    assert_eq!(explained.tables, vec!["orders"]);
    assert!(explained.log.tables().is_empty());
}

#[test]
fn ambiguous_unqualified_column_is_rejected() {
    let err = explainer()
        .explain(
            "SELECT * FROM orders INNER JOIN customers ON orders.region = customers.region \
             WHERE user_id = 1",
        )
        .unwrap_err();
    assert!(matches!(err, ExplainError::AmbiguousColumn { ref column, .. } if column == "user_id"));
}

#[test]
fn unsharded_tables_record_nothing() {
    let explained = explainer()
        .explain("SELECT * FROM audit WHERE id = 1")
        .unwrap();
    assert!(explained.tables.is_empty());
    assert!(explained.log.tables().is_empty());
    assert!(explained.log.is_const());
}

#[test]
fn insert_rows_are_ored() {
    let explained = explainer()
        .explain(
            "INSERT INTO orders (user_id, region, total) VALUES (?, 'eu', 10), (7, ?, 20)",
        )
        .unwrap();
    assert_eq!(explained.kind, StatementKind::Insert);
    assert_eq!(explained.tables, vec!["orders"]);

    let routed = explained
        .log
        .redo(&BindVariables::new().with(3_i64).with("us"))
        .unwrap();
    let orders = &routed["orders"];
    assert_eq!(orders.scalar_values("user_id"), ints(&[3, 7]).as_slice());
    assert_eq!(
        orders.scalar_values("region"),
        &[Scalar::from("eu"), Scalar::from("us")]
    );
    assert_eq!(orders.logic("user_id"), Some(BinaryLogic::Or));
}

#[test]
fn insert_into_unsharded_table_records_nothing() {
    let explained = explainer()
        .explain("INSERT INTO audit (id, note) VALUES (1, 'x')")
        .unwrap();
    assert!(explained.log.is_empty());
    assert!(explained.tables.is_empty());
}

#[test]
fn insert_errors() {
    let err = explainer()
        .explain("INSERT INTO orders VALUES (1, 'eu')")
        .unwrap_err();
    assert!(matches!(err, ExplainError::MissingInsertColumns { .. }));

    let err = explainer()
        .explain("INSERT INTO orders (user_id, total) VALUES (1, 2), (3)")
        .unwrap_err();
    assert!(matches!(
        err,
        ExplainError::InsertArity {
            expected: 2,
            actual: 1,
            ..
        }
    ));

    let err = explainer()
        .explain("INSERT INTO orders (user_id) VALUES (NOW())")
        .unwrap_err();
    assert!(matches!(err, ExplainError::UnroutableInsertValue { .. }));

    let err = explainer()
        .explain("INSERT INTO orders (user_id) VALUES (NULL)")
        .unwrap_err();
    assert!(matches!(err, ExplainError::NullShardingValue { .. }));
}

#[test]
fn delete_where_is_routed() {
    let explained = explainer()
        .explain("DELETE FROM orders WHERE user_id = ?")
        .unwrap();
    assert_eq!(explained.kind, StatementKind::Delete);

    let routed = explained.log.redo(&BindVariables::new().with(4_i64)).unwrap();
    assert_eq!(routed["orders"].scalar_values("user_id"), ints(&[4]).as_slice());
}

#[test]
fn unsupported_input() {
    assert!(matches!(
        explainer().explain("SELECT 1; SELECT 2").unwrap_err(),
        ExplainError::StatementCount(2)
    ));
    assert!(matches!(
        explainer()
            .explain("SELECT * FROM orders UNION SELECT * FROM orders")
            .unwrap_err(),
        ExplainError::UnsupportedStatement(_)
    ));
    assert!(matches!(
        explainer().explain("DROP TABLE orders").unwrap_err(),
        ExplainError::UnsupportedStatement(_)
    ));
    assert!(matches!(
        explainer().explain("SELEC * FROM").unwrap_err(),
        ExplainError::Parse(_)
    ));
}
