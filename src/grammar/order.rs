//! ORDER BY compilation.

use std::sync::Arc;

use crate::ast::{Bindings, Column, Operand, Order};
use crate::error::SqlWeaveResult;
use crate::grammar::Grammar;
use crate::grammar::slots::{compile_column, compile_value};

/// Comma-joined order items; items that compile to nothing are dropped.
pub fn compile_orders<G: Grammar + ?Sized>(
    g: &G,
    orders: &[Arc<Order>],
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    let mut parts = Vec::with_capacity(orders.len());
    for order in orders {
        let part = compile_order(g, order, bindings)?;
        if !part.is_empty() {
            parts.push(part);
        }
    }
    Ok(parts.join(", "))
}

pub fn compile_order<G: Grammar + ?Sized>(
    g: &G,
    order: &Order,
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    match order {
        Order::Column { column, descending } => {
            let column = compile_column(g, column, bindings)?;
            Ok(format!("{} {}", column, if *descending { "DESC" } else { "ASC" }))
        }
        // `IS NOT NULL` is false for NULL rows, which sort before true ones
        Order::Nulls {
            column,
            nulls_first,
        } => {
            let column = compile_column(g, column, bindings)?;
            Ok(format!(
                "{} IS {}NULL",
                column,
                if *nulls_first { "NOT " } else { "" }
            ))
        }
        Order::Explicit {
            column,
            values,
            others_first,
        } => {
            if values.is_empty() {
                return Ok(String::new());
            }
            g.compile_explicit_order(column, values, *others_first, bindings)
        }
        Order::Random => Ok(g.random_order().to_string()),
    }
}

/// `CASE col WHEN v0 THEN 0 WHEN v1 THEN 1 ... ELSE n END`
///
/// Ranks are bound, the ELSE rank is `-1` when unlisted rows go first and
/// the list length otherwise.
pub fn explicit_order_case<G: Grammar + ?Sized>(
    g: &G,
    column: &Column,
    values: &[Operand],
    others_first: bool,
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    let mut sql = format!("CASE {}", compile_column(g, column, bindings)?);
    for (rank, value) in values.iter().enumerate() {
        let value = compile_value(g, value, bindings)?;
        bindings.push(rank);
        sql.push_str(&format!(" WHEN {} THEN ?", value));
    }
    bindings.push(if others_first { -1 } else { values.len() as i64 });
    sql.push_str(" ELSE ? END");
    Ok(sql)
}
