use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use sqlweave::config::Config;
use sqlweave::prelude::*;

#[test]
fn test_query_from_json() {
    let json = r#"{
        "table": {"Name": "users"},
        "criteria": [
            {"Value": {"column": {"Name": "id"}, "rule": "=", "value": {"Value": {"Int": 5}}}},
            {"IsNull": {"column": {"Name": "deleted_at"}, "is_null": true, "append_rule": "or"}}
        ],
        "limit": {"Value": {"Int": 1}}
    }"#;
    let query: Query = serde_json::from_str(json).expect("valid query tree");

    let statements = sqlweave::compile(&query, Dialect::Common).unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].sql,
        "SELECT *\nFROM \"users\"\nWHERE \"id\" = ? OR \"deleted_at\" IS NULL\nLIMIT ?"
    );
    assert_eq!(
        statements[0].bindings.values(),
        vec![Value::Int(5), Value::Int(1)]
    );
}

#[test]
fn test_unknown_append_rule_is_rejected() {
    let json = r#"{"Raw": {"statement": {"sql": "1 = 1"}, "append_rule": "XOR"}}"#;
    let err = serde_json::from_str::<Criterion>(json).unwrap_err();
    assert!(err.to_string().contains("Unknown criterion append rule"));
}

#[test]
fn test_json_round_trip_keeps_tree() {
    let since = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let query = Query::from_table("events")
        .alias("e")
        .select_as(Aggregate::count("*"), "n")
        .join(Join::new(JoinType::Left, "users").alias("u").on_columns("u.id", "e.user_id"))
        .filter(Criterion::value("e.created_at", ">=", since))
        .or_filter(Criterion::group(vec![
            Criterion::is_in("e.kind", ["a", "b"]),
            Criterion::between("e.score", 1.5, 9.0).negate(),
        ]))
        .order(Order::explicit("e.kind", ["b", "a"], true))
        .order_random()
        .offset(10);

    let json = serde_json::to_string(&query).unwrap();
    let back: Query = serde_json::from_str(&json).unwrap();
    assert_eq!(back, query);
}

#[test]
fn test_compile_convenience_per_dialect() {
    let query = Query::from_table("t")
        .insert_row([("a", 1)])
        .insert_row([("b", 2)]);

    let common = sqlweave::compile(&query, Dialect::Common).unwrap();
    assert_eq!(common.len(), 1);
    assert_eq!(
        common[0].sql,
        "INSERT INTO \"t\" (\"a\", \"b\")\nVALUES (?, DEFAULT), (DEFAULT, ?)"
    );

    let sqlite = sqlweave::compile(&query, Dialect::Sqlite).unwrap();
    assert_eq!(sqlite.len(), 2);
    for statement in &sqlite {
        assert_eq!(statement.placeholder_count(), statement.bindings.len());
    }
}

#[test]
fn test_rewrite_then_compile() {
    let query = Query::from_table("users")
        .select("id")
        .filter(Criterion::exists(
            Query::from_table("orders").filter(Criterion::columns("user_id", "=", "users.id")),
        ))
        .finish();

    let config = Config::default()
        .with_dialect(Dialect::MySql)
        .with_table_prefix("shop_")
        .with_explicit_tables(true);
    let rewritten = config.apply(&query);
    assert!(!Arc::ptr_eq(&rewritten, &query));

    let statements = sqlweave::compile(&rewritten, config.dialect).unwrap();
    assert_eq!(
        statements[0].sql,
        "SELECT `shop_users`.`id`\nFROM `shop_users`\nWHERE EXISTS (SELECT *\nFROM `shop_orders`\nWHERE `shop_orders`.`user_id` = `shop_users`.`id`)"
    );

    // the original tree still compiles to the unprefixed SQL
    let original = MySqlGrammar.compile(&query).unwrap();
    assert_eq!(
        original.sql,
        "SELECT `id`\nFROM `users`\nWHERE EXISTS (SELECT *\nFROM `orders`\nWHERE `user_id` = `users`.`id`)"
    );
}

#[test]
fn test_errors_surface_from_compile() {
    let query = Query::from_table("users").alias("u").delete();
    let err = sqlweave::compile(&query, Dialect::Sqlite).unwrap_err();
    assert!(matches!(err, SqlWeaveError::InvalidQuery(_)));
    assert!(sqlweave::compile(&query, Dialect::MySql).is_ok());
}
