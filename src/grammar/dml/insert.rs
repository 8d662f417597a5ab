//! INSERT SQL generation.

use std::sync::Arc;

use crate::ast::{Bindings, Insert, InsertFromSelect, Query, Row, Statement};
use crate::error::{SqlWeaveError, SqlWeaveResult};
use crate::grammar::Grammar;
use crate::grammar::dml::check_unique_columns;
use crate::grammar::slots::{compile_table, compile_value};

/// Generate INSERT SQL as a single statement.
///
/// Rows are written as one `VALUES (...), (...)` list over the union of their
/// columns, in first-appearance order. A row without a value for one of the
/// columns gets `DEFAULT` there. No rows produce no statement.
pub fn build_insert<G: Grammar + ?Sized>(g: &G, query: &Query) -> SqlWeaveResult<Vec<Statement>> {
    match query.insert.as_deref() {
        None => Err(SqlWeaveError::invalid_query("The query has no inserted values")),
        Some(Insert::Select(source)) => Ok(vec![build_insert_select(g, query, source)?]),
        Some(Insert::Rows(rows)) if rows.is_empty() => Ok(Vec::new()),
        Some(Insert::Rows(rows)) => Ok(vec![build_rows(g, query, rows)?]),
    }
}

/// Generate one INSERT statement per row, each with the row's own column list.
pub fn build_insert_per_row<G: Grammar + ?Sized>(
    g: &G,
    query: &Query,
) -> SqlWeaveResult<Vec<Statement>> {
    match query.insert.as_deref() {
        Some(Insert::Rows(rows)) => rows
            .iter()
            .map(|row| build_rows(g, query, std::slice::from_ref(row)))
            .collect(),
        _ => build_insert(g, query),
    }
}

/// `INSERT INTO "t" ("a", "b")\nVALUES (?, ?), (?, DEFAULT)`
fn build_rows<G: Grammar + ?Sized>(
    g: &G,
    query: &Query,
    rows: &[Arc<Row>],
) -> SqlWeaveResult<Statement> {
    let mut bindings = Bindings::new();
    let target = insert_target(g, query, &mut bindings)?;

    let columns = column_union(rows);
    if columns.is_empty() {
        return Err(SqlWeaveError::invalid_query("The inserted rows have no columns"));
    }

    let mut tuples = Vec::with_capacity(rows.len());
    for row in rows {
        check_unique_columns(row)?;
        let mut values = Vec::with_capacity(columns.len());
        for column in &columns {
            match row.iter().find(|(c, _)| c == column) {
                Some((_, value)) => values.push(compile_value(g, value, &mut bindings)?),
                None => values.push("DEFAULT".to_string()),
            }
        }
        tuples.push(format!("({})", values.join(", ")));
    }

    let sql = format!(
        "{} ({})\nVALUES {}",
        target,
        quote_columns(g, &columns),
        tuples.join(", ")
    );
    Ok(Statement::new(sql, bindings))
}

/// `INSERT INTO "t" [("a", "b")]\nSELECT ...`
fn build_insert_select<G: Grammar + ?Sized>(
    g: &G,
    query: &Query,
    source: &InsertFromSelect,
) -> SqlWeaveResult<Statement> {
    let mut bindings = Bindings::new();
    let mut sql = insert_target(g, query, &mut bindings)?;
    if let Some(columns) = &source.columns {
        sql.push_str(&format!(" ({})", quote_columns(g, columns)));
    }

    let select = g.compile_select(&source.select).map_err(|e| e.in_subquery())?;
    bindings.merge(&select.bindings);
    sql.push('\n');
    sql.push_str(&select.sql);

    Ok(Statement::new(sql, bindings))
}

fn insert_target<G: Grammar + ?Sized>(
    g: &G,
    query: &Query,
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    let table = query
        .table
        .as_ref()
        .ok_or_else(|| SqlWeaveError::invalid_query("The target table is not set"))?;
    Ok(format!("INSERT INTO {}", compile_table(g, table, bindings)?))
}

fn column_union(rows: &[Arc<Row>]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for (column, _) in row.iter() {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
    }
    columns
}

fn quote_columns<G: Grammar + ?Sized>(g: &G, columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| g.quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ")
}
