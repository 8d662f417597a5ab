//! SELECT SQL generation.

use crate::ast::{Bindings, Query, Selectable, Statement};
use crate::error::{SqlWeaveError, SqlWeaveResult};
use crate::grammar::Grammar;
use crate::grammar::criteria::compile_criteria;
use crate::grammar::dml::tail_parts;
use crate::grammar::slots::{compile_aggregate, compile_column, compile_table_with_alias};

/// Generate SELECT SQL.
///
/// Parts, one per line: SELECT, FROM, JOIN..., WHERE, ORDER BY, then the
/// dialect's OFFSET / LIMIT.
pub fn build_select<G: Grammar + ?Sized>(g: &G, query: &Query) -> SqlWeaveResult<Statement> {
    let mut bindings = Bindings::new();
    let mut parts = vec![
        select_part(g, query, &mut bindings)?,
        from_part(g, query, &mut bindings)?,
    ];
    parts.extend(join_parts(g, query, &mut bindings)?);
    tail_parts(g, query, &mut bindings, &mut parts)?;

    Ok(Statement::new(parts.join("\n"), bindings))
}

fn select_part<G: Grammar + ?Sized>(
    g: &G,
    query: &Query,
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    if query.select.is_empty() {
        return Ok("SELECT *".to_string());
    }

    let mut columns = Vec::with_capacity(query.select.len());
    for item in &query.select {
        let mut sql = match &item.value {
            Selectable::Column(column) => compile_column(g, column, bindings)?,
            Selectable::Aggregate(aggregate) => compile_aggregate(g, aggregate, bindings)?,
        };
        if let Some(alias) = &item.alias {
            sql.push_str(" AS ");
            sql.push_str(&g.quote_name(alias));
        }
        columns.push(sql);
    }
    Ok(format!("SELECT {}", columns.join(", ")))
}

fn from_part<G: Grammar + ?Sized>(
    g: &G,
    query: &Query,
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    let table = query
        .table
        .as_ref()
        .ok_or_else(|| SqlWeaveError::invalid_query("The FROM table is not set"))?;
    let table = compile_table_with_alias(g, table, query.table_alias.as_deref(), bindings)?;
    Ok(format!("FROM {}", table))
}

/// One `<TYPE> JOIN table [AS alias] [ON criteria]` line per join.
fn join_parts<G: Grammar + ?Sized>(
    g: &G,
    query: &Query,
    bindings: &mut Bindings,
) -> SqlWeaveResult<Vec<String>> {
    let mut parts = Vec::with_capacity(query.joins.len());
    for join in &query.joins {
        let table = compile_table_with_alias(g, &join.table, join.alias.as_deref(), bindings)?;
        let mut sql = format!("{} JOIN {}", join.kind.as_str(), table);
        let on = compile_criteria(g, &join.criteria, bindings)?;
        if !on.is_empty() {
            sql.push_str(" ON ");
            sql.push_str(&on);
        }
        parts.push(sql);
    }
    Ok(parts)
}
