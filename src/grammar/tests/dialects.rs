//! MySQL and SQLite divergences from the common grammar.

use pretty_assertions::assert_eq;

use super::values;
use crate::ast::*;
use crate::error::SqlWeaveError;
use crate::grammar::{CommonGrammar, Dialect, Grammar, MySqlGrammar, SqliteGrammar};

#[test]
fn test_users_scenario_per_dialect() {
    let query = Query::from_table("users").where_eq("id", 5).limit(1);
    let expected = [
        (Dialect::Common, "SELECT *\nFROM \"users\"\nWHERE \"id\" = ?\nLIMIT ?"),
        (Dialect::MySql, "SELECT *\nFROM `users`\nWHERE `id` = ?\nLIMIT ?"),
        (Dialect::Sqlite, "SELECT *\nFROM \"users\"\nWHERE \"id\" = ?\nLIMIT ?"),
    ];
    for (dialect, sql) in expected {
        let stmt = dialect.grammar().compile(&query).unwrap();
        assert_eq!(stmt.sql, sql);
        assert_eq!(values(&stmt), vec![Value::Int(5), Value::Int(1)]);
    }
}

#[test]
fn test_random_order_token() {
    let query = Query::from_table("t").order_random();
    assert_eq!(
        CommonGrammar.compile(&query).unwrap().sql,
        "SELECT *\nFROM \"t\"\nORDER BY RANDOM()"
    );
    assert_eq!(
        MySqlGrammar.compile(&query).unwrap().sql,
        "SELECT *\nFROM `t`\nORDER BY RAND()"
    );
    assert_eq!(
        SqliteGrammar.compile(&query).unwrap().sql,
        "SELECT *\nFROM \"t\"\nORDER BY RANDOM()"
    );
}

#[test]
fn test_mysql_explicit_order_uses_field() {
    let listed_first =
        Query::from_table("tickets").order(Order::explicit("status", ["new", "open"], false));
    let stmt = MySqlGrammar.compile(&listed_first).unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT *\nFROM `tickets`\nORDER BY FIELD(`status`, ?, ?) DESC"
    );
    assert_eq!(values(&stmt), vec![Value::from("open"), Value::from("new")]);

    let others_first =
        Query::from_table("tickets").order(Order::explicit("status", ["new", "open"], true));
    let stmt = MySqlGrammar.compile(&others_first).unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT *\nFROM `tickets`\nORDER BY FIELD(`status`, ?, ?) ASC"
    );
    assert_eq!(values(&stmt), vec![Value::from("new"), Value::from("open")]);
}

#[test]
fn test_sqlite_explicit_order_uses_case() {
    let query =
        Query::from_table("tickets").order(Order::explicit("status", ["new", "open"], false));
    assert_eq!(
        SqliteGrammar.compile(&query).unwrap(),
        CommonGrammar.compile(&query).unwrap()
    );
}

#[test]
fn test_limit_before_offset() {
    let query = Query::from_table("t").offset(20).limit(10);
    let stmt = MySqlGrammar.compile(&query).unwrap();
    assert_eq!(stmt.sql, "SELECT *\nFROM `t`\nLIMIT ?\nOFFSET ?");
    assert_eq!(values(&stmt), vec![Value::Int(10), Value::Int(20)]);

    let stmt = SqliteGrammar.compile(&query).unwrap();
    assert_eq!(stmt.sql, "SELECT *\nFROM \"t\"\nLIMIT ?\nOFFSET ?");
}

#[test]
fn test_offset_without_limit() {
    let query = Query::from_table("t").offset(20);
    assert_eq!(
        CommonGrammar.compile(&query).unwrap().sql,
        "SELECT *\nFROM \"t\"\nOFFSET ?"
    );
    assert_eq!(
        MySqlGrammar.compile(&query).unwrap().sql,
        "SELECT *\nFROM `t`\nLIMIT 18446744073709551615\nOFFSET ?"
    );
    let stmt = SqliteGrammar.compile(&query).unwrap();
    assert_eq!(stmt.sql, "SELECT *\nFROM \"t\"\nLIMIT -1\nOFFSET ?");
    assert_eq!(values(&stmt), vec![Value::Int(20)]);
}

#[test]
fn test_sqlite_rejects_aliased_update_and_delete() {
    let update = Query::from_table("users").alias("u").set("name", "x");
    assert_eq!(
        CommonGrammar.compile(&update).unwrap().sql,
        "UPDATE \"users\" AS \"u\"\nSET \"name\" = ?"
    );
    assert_eq!(
        MySqlGrammar.compile(&update).unwrap().sql,
        "UPDATE `users` AS `u`\nSET `name` = ?"
    );
    let err = SqliteGrammar.compile(&update).unwrap_err();
    assert!(matches!(err, SqlWeaveError::InvalidQuery(_)));

    let delete = Query::from_table("users").alias("u").delete();
    assert_eq!(
        CommonGrammar.compile(&delete).unwrap().sql,
        "DELETE FROM \"users\" AS \"u\""
    );
    assert!(matches!(
        SqliteGrammar.compile(&delete),
        Err(SqlWeaveError::InvalidQuery(_))
    ));

    let plain = Query::from_table("users").delete().where_eq("id", 1);
    assert_eq!(
        SqliteGrammar.compile(&plain).unwrap().sql,
        "DELETE FROM \"users\"\nWHERE \"id\" = ?"
    );
}

#[test]
fn test_sqlite_allows_aliased_select() {
    let query = Query::from_table("users").alias("u").select("u.id");
    assert_eq!(
        SqliteGrammar.compile(&query).unwrap().sql,
        "SELECT \"u\".\"id\"\nFROM \"users\" AS \"u\""
    );
}
