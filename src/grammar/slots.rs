//! Compilation of the polymorphic slots: columns, values, tables, sub-queries.

use crate::ast::{
    Aggregate, Bindings, Column, Expression, Operand, Query, Statement, SubQuery, Table,
};
use crate::error::SqlWeaveResult;
use crate::grammar::Grammar;

/// A column slot: a quoted identifier, or a parenthesized sub-query / expression.
pub fn compile_column<G: Grammar + ?Sized>(
    g: &G,
    column: &Column,
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    match column {
        Column::Name(name) => Ok(g.quote_identifier(name)),
        Column::Query(query) => compile_subquery(g, query, bindings),
        Column::Expr(expr) => Ok(compile_expression(expr, bindings)),
    }
}

/// A value slot: a scalar becomes `?`, anything else is parenthesized.
pub fn compile_value<G: Grammar + ?Sized>(
    g: &G,
    value: &Operand,
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    match value {
        Operand::Value(value) => {
            bindings.push(value.clone());
            Ok("?".to_string())
        }
        Operand::Query(query) => compile_subquery(g, query, bindings),
        Operand::Expr(expr) => Ok(compile_expression(expr, bindings)),
    }
}

pub fn compile_table<G: Grammar + ?Sized>(
    g: &G,
    table: &Table,
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    match table {
        Table::Name(name) => Ok(g.quote_identifier(name)),
        Table::Query(query) => compile_subquery(g, query, bindings),
        Table::Raw(statement) => Ok(compile_statement(statement, bindings)),
    }
}

/// `table [AS "alias"]`
pub fn compile_table_with_alias<G: Grammar + ?Sized>(
    g: &G,
    table: &Table,
    alias: Option<&str>,
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    let mut sql = compile_table(g, table, bindings)?;
    if let Some(alias) = alias {
        sql.push_str(" AS ");
        sql.push_str(&g.quote_name(alias));
    }
    Ok(sql)
}

pub fn compile_select_source<G: Grammar + ?Sized>(
    g: &G,
    subquery: &SubQuery,
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    match subquery {
        SubQuery::Query(query) => compile_subquery(g, query, bindings),
        SubQuery::Raw(statement) => Ok(compile_statement(statement, bindings)),
    }
}

/// `(SELECT ...)`; failures inside are reported as sub-query errors.
pub fn compile_subquery<G: Grammar + ?Sized>(
    g: &G,
    query: &Query,
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    let statement = g.compile_select(query).map_err(|e| e.in_subquery())?;
    Ok(compile_statement(&statement, bindings))
}

/// `FUNC(column)`
pub fn compile_aggregate<G: Grammar + ?Sized>(
    g: &G,
    aggregate: &Aggregate,
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    let column = compile_column(g, &aggregate.column, bindings)?;
    Ok(format!("{}({})", aggregate.function, column))
}

/// `(sql)` with the statement bindings appended.
pub fn compile_statement(statement: &Statement, bindings: &mut Bindings) -> String {
    bindings.merge(&statement.bindings);
    format!("({})", statement.sql)
}

pub fn compile_expression(expr: &Expression, bindings: &mut Bindings) -> String {
    compile_statement(&expr.to_statement(), bindings)
}

/// Emit an expression's SQL without parentheses.
pub fn inline_statement(statement: &Statement, bindings: &mut Bindings) -> String {
    bindings.merge(&statement.bindings);
    statement.sql.clone()
}
