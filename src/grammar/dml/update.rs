//! UPDATE SQL generation.

use crate::ast::{Bindings, Query, Statement};
use crate::error::{SqlWeaveError, SqlWeaveResult};
use crate::grammar::Grammar;
use crate::grammar::dml::{check_unique_columns, tail_parts, target_part};
use crate::grammar::slots::compile_value;

/// Generate UPDATE SQL.
pub fn build_update<G: Grammar + ?Sized>(g: &G, query: &Query) -> SqlWeaveResult<Statement> {
    let mut bindings = Bindings::new();
    let target = target_part(g, "UPDATE", query, &mut bindings, "The updated table is not set")?;

    if query.update.is_empty() {
        return Err(SqlWeaveError::invalid_query("The updated values are not set"));
    }
    check_unique_columns(&query.update)?;

    let mut assignments = Vec::with_capacity(query.update.len());
    for (column, value) in query.update.iter() {
        assignments.push(format!(
            "{} = {}",
            g.quote_identifier(column),
            compile_value(g, value, &mut bindings)?
        ));
    }

    let mut parts = vec![target, format!("SET {}", assignments.join(", "))];
    tail_parts(g, query, &mut bindings, &mut parts)?;

    Ok(Statement::new(parts.join("\n"), bindings))
}
