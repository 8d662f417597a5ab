//! Criterion renderings and the AND/OR fold.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::{assert_bindings_match, values};
use crate::ast::*;
use crate::error::SqlWeaveError;
use crate::grammar::criteria::compile_criteria;
use crate::grammar::{CommonGrammar, Dialect, Grammar};

fn where_sql(criteria: Vec<Criterion>) -> (String, Vec<Value>) {
    let criteria: Vec<Arc<Criterion>> = criteria.into_iter().map(Arc::new).collect();
    let mut bindings = Bindings::new();
    let sql = compile_criteria(&CommonGrammar, &criteria, &mut bindings).unwrap();
    (sql, bindings.values())
}

#[test]
fn test_or_chain_is_parenthesized_before_and() {
    let (sql, _) = where_sql(vec![
        Criterion::value("a", "=", 1),
        Criterion::value("b", "=", 2).or(),
        Criterion::value("c", "=", 3),
    ]);
    assert_eq!(sql, "(\"a\" = ? OR \"b\" = ?) AND \"c\" = ?");
}

#[test]
fn test_fold_tracks_previous_rule() {
    let (sql, bindings) = where_sql(vec![
        Criterion::value("a", "=", 1),
        Criterion::value("b", "=", 2).or(),
        Criterion::value("c", "=", 3),
        Criterion::value("d", "=", 4).or(),
        Criterion::value("e", "=", 5),
    ]);
    assert_eq!(
        sql,
        "((\"a\" = ? OR \"b\" = ?) AND \"c\" = ? OR \"d\" = ?) AND \"e\" = ?"
    );
    assert_eq!(bindings, (1..=5).map(Value::from).collect::<Vec<_>>());
}

#[test]
fn test_and_chain_is_flat() {
    let (sql, _) = where_sql(vec![
        Criterion::value("a", "=", 1),
        Criterion::value("b", "=", 2),
        Criterion::value("c", "=", 3).or(),
    ]);
    assert_eq!(sql, "\"a\" = ? AND \"b\" = ? OR \"c\" = ?");
}

#[test]
fn test_empty_groups_are_skipped() {
    let (sql, _) = where_sql(vec![
        Criterion::group(vec![]),
        Criterion::value("a", "=", 1).or(),
        Criterion::group(vec![Criterion::group(vec![])]),
        Criterion::value("b", "=", 2),
    ]);
    // the seed keeps its own OR rule, so the next AND still wraps it
    assert_eq!(sql, "(\"a\" = ?) AND \"b\" = ?");

    let (sql, bindings) = where_sql(vec![Criterion::group(vec![])]);
    assert_eq!(sql, "");
    assert!(bindings.is_empty());
}

#[test]
fn test_group_and_not_group() {
    let (sql, _) = where_sql(vec![
        Criterion::value("kind", "=", "post"),
        Criterion::group(vec![
            Criterion::value("a", "=", 1),
            Criterion::value("b", "=", 2).or(),
        ])
        .negate(),
    ]);
    assert_eq!(sql, "\"kind\" = ? AND NOT (\"a\" = ? OR \"b\" = ?)");
}

#[test]
fn test_between() {
    let (sql, bindings) = where_sql(vec![
        Criterion::between("age", 18, 65),
        Criterion::between("score", 0, 10).negate(),
    ]);
    assert_eq!(
        sql,
        "(\"age\" BETWEEN ? AND ?) AND (\"score\" NOT BETWEEN ? AND ?)"
    );
    assert_eq!(bindings.len(), 4);
}

#[test]
fn test_in_list_and_select() {
    let (sql, bindings) = where_sql(vec![Criterion::is_in("id", [1, 2, 3])]);
    assert_eq!(sql, "\"id\" IN (?, ?, ?)");
    assert_eq!(bindings, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

    let banned = Statement::new(
        "SELECT user_id FROM banned WHERE level > ?",
        [Value::Int(2)].into_iter().collect(),
    );
    let (sql, bindings) = where_sql(vec![Criterion::in_select("id", banned).negate()]);
    assert_eq!(sql, "\"id\" NOT IN (SELECT user_id FROM banned WHERE level > ?)");
    assert_eq!(bindings, vec![Value::Int(2)]);
}

#[test]
fn test_empty_in_collapses_in_every_dialect() {
    for dialect in Dialect::ALL {
        let grammar = dialect.grammar();

        let query =
            Query::from_table("t").filter(Criterion::is_in("id", Vec::<i64>::new()));
        let stmt = grammar.compile(&query).unwrap();
        assert!(stmt.sql.ends_with("\nWHERE ?"), "{}: {}", dialect, stmt.sql);
        assert_eq!(values(&stmt), vec![Value::Int(0)]);

        let query = Query::from_table("t")
            .filter(Criterion::is_in("id", Vec::<i64>::new()).negate());
        let stmt = grammar.compile(&query).unwrap();
        assert!(stmt.sql.ends_with("\nWHERE ?"), "{}: {}", dialect, stmt.sql);
        assert_eq!(values(&stmt), vec![Value::Int(1)]);
    }
}

#[test]
fn test_exists() {
    let orders = Query::from_table("orders")
        .select("id")
        .filter(Criterion::columns("orders.user_id", "=", "users.id"));
    let (sql, _) = where_sql(vec![
        Criterion::exists(orders.clone()),
        Criterion::exists(orders).negate().or(),
    ]);
    let sub = "(SELECT \"id\"\nFROM \"orders\"\nWHERE \"orders\".\"user_id\" = \"users\".\"id\")";
    assert_eq!(sql, format!("EXISTS {} OR NOT EXISTS {}", sub, sub));
}

#[test]
fn test_is_null() {
    let (sql, bindings) = where_sql(vec![
        Criterion::is_null("deleted_at"),
        Criterion::is_not_null("email"),
    ]);
    assert_eq!(sql, "\"deleted_at\" IS NULL AND \"email\" IS NOT NULL");
    assert!(bindings.is_empty());
}

#[test]
fn test_raw_criterion_is_inlined() {
    let (sql, bindings) = where_sql(vec![
        Criterion::raw("score > ? + ?", [Value::Int(1), Value::Int(2)]),
        Criterion::value("id", "<>", 3),
    ]);
    assert_eq!(sql, "score > ? + ? AND \"id\" <> ?");
    assert_eq!(bindings, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_like_with_text_adds_escape() {
    let (sql, bindings) = where_sql(vec![
        Criterion::value("name", "like", "a\\_%"),
        Criterion::value("title", "not like", "%x%"),
        Criterion::value("code", "LIKE", 10),
    ]);
    assert_eq!(
        sql,
        "\"name\" LIKE ? ESCAPE ? AND \"title\" NOT LIKE ? ESCAPE ? AND \"code\" LIKE ?"
    );
    assert_eq!(
        bindings,
        vec![
            Value::from("a\\_%"),
            Value::from("\\"),
            Value::from("%x%"),
            Value::from("\\"),
            Value::Int(10),
        ]
    );
}

#[test]
fn test_unsafe_rule_is_rejected() {
    let query = Query::from_table("t").filter(Criterion::value("a", "= 1; DROP", 1));
    let err = CommonGrammar.compile(&query).unwrap_err();
    assert!(matches!(err, SqlWeaveError::InvalidQuery(_)));
}

#[test]
fn test_binding_count_matches_placeholders() {
    let query = Query::from_table("users")
        .alias("u")
        .select_as(
            Query::from_table("orders")
                .aggregate("COUNT", "*", None)
                .filter(Criterion::columns("orders.user_id", "=", "u.id")),
            "orders",
        )
        .join(
            Join::new(JoinType::Inner, "profiles")
                .alias("p")
                .on_columns("p.user_id", "u.id"),
        )
        .filter(Criterion::value("u.name", "like", "A%"))
        .or_filter(Criterion::is_in("u.id", [1, 2]))
        .filter(Criterion::between("u.age", 20, 30))
        .order(Order::explicit("u.role", ["admin", "staff"], true))
        .offset(5)
        .limit(10);

    for dialect in Dialect::ALL {
        let stmt = dialect.grammar().compile(&query).unwrap();
        assert_bindings_match(&stmt);
    }
}
