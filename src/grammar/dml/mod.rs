//! Statement builders and the parts they share.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use crate::ast::{Bindings, Query, Row};
use crate::error::{SqlWeaveError, SqlWeaveResult};
use crate::grammar::Grammar;
use crate::grammar::criteria::compile_criteria;
use crate::grammar::order::compile_orders;
use crate::grammar::slots::{compile_table_with_alias, compile_value};

/// Fail on a column written twice by one row or one UPDATE.
pub(crate) fn check_unique_columns(row: &Row) -> SqlWeaveResult<()> {
    for (i, (column, _)) in row.iter().enumerate() {
        if row[..i].iter().any(|(c, _)| c == column) {
            return Err(SqlWeaveError::invalid_query(format!(
                "The column {} is assigned more than once",
                column
            )));
        }
    }
    Ok(())
}

/// `WHERE ...`, omitted when the criteria compile to nothing.
pub(crate) fn where_part<G: Grammar + ?Sized>(
    g: &G,
    query: &Query,
    bindings: &mut Bindings,
) -> SqlWeaveResult<Option<String>> {
    let criteria = compile_criteria(g, &query.criteria, bindings)?;
    Ok((!criteria.is_empty()).then(|| format!("WHERE {}", criteria)))
}

/// `ORDER BY ...`, omitted when no order item compiles to anything.
pub(crate) fn order_part<G: Grammar + ?Sized>(
    g: &G,
    query: &Query,
    bindings: &mut Bindings,
) -> SqlWeaveResult<Option<String>> {
    let orders = compile_orders(g, &query.order, bindings)?;
    Ok((!orders.is_empty()).then(|| format!("ORDER BY {}", orders)))
}

/// `<keyword> "table" [AS "alias"]` for UPDATE / DELETE targets.
pub(crate) fn target_part<G: Grammar + ?Sized>(
    g: &G,
    keyword: &str,
    query: &Query,
    bindings: &mut Bindings,
    missing: &str,
) -> SqlWeaveResult<String> {
    let table = query
        .table
        .as_ref()
        .ok_or_else(|| SqlWeaveError::invalid_query(missing))?;
    let table = compile_table_with_alias(g, table, query.table_alias.as_deref(), bindings)?;
    Ok(format!("{} {}", keyword, table))
}

/// `OFFSET ?` then `LIMIT ?`, each omitted when unset.
pub fn offset_then_limit<G: Grammar + ?Sized>(
    g: &G,
    query: &Query,
    bindings: &mut Bindings,
) -> SqlWeaveResult<Vec<String>> {
    let mut parts = Vec::new();
    if let Some(offset) = &query.offset {
        parts.push(format!("OFFSET {}", compile_value(g, offset, bindings)?));
    }
    if let Some(limit) = &query.limit {
        parts.push(format!("LIMIT {}", compile_value(g, limit, bindings)?));
    }
    Ok(parts)
}

/// `LIMIT ?` then `OFFSET ?`. An offset without a limit gets `unbounded` as
/// its limit, for dialects that only accept OFFSET after LIMIT.
pub fn limit_then_offset<G: Grammar + ?Sized>(
    g: &G,
    query: &Query,
    bindings: &mut Bindings,
    unbounded: &str,
) -> SqlWeaveResult<Vec<String>> {
    let mut parts = Vec::new();
    match &query.limit {
        Some(limit) => parts.push(format!("LIMIT {}", compile_value(g, limit, bindings)?)),
        None if query.offset.is_some() => parts.push(format!("LIMIT {}", unbounded)),
        None => {}
    }
    if let Some(offset) = &query.offset {
        parts.push(format!("OFFSET {}", compile_value(g, offset, bindings)?));
    }
    Ok(parts)
}

/// Append the WHERE, ORDER BY, OFFSET and LIMIT parts shared by every statement but INSERT.
pub(crate) fn tail_parts<G: Grammar + ?Sized>(
    g: &G,
    query: &Query,
    bindings: &mut Bindings,
    parts: &mut Vec<String>,
) -> SqlWeaveResult<()> {
    parts.extend(where_part(g, query, bindings)?);
    parts.extend(order_part(g, query, bindings)?);
    parts.extend(g.compile_offset_limit(query, bindings)?);
    Ok(())
}
