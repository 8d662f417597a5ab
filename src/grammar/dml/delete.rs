//! DELETE SQL generation.

use crate::ast::{Bindings, Query, Statement};
use crate::error::SqlWeaveResult;
use crate::grammar::Grammar;
use crate::grammar::dml::{tail_parts, target_part};

/// Generate DELETE SQL.
pub fn build_delete<G: Grammar + ?Sized>(g: &G, query: &Query) -> SqlWeaveResult<Statement> {
    let mut bindings = Bindings::new();
    let mut parts = vec![target_part(
        g,
        "DELETE FROM",
        query,
        &mut bindings,
        "The target table is not set",
    )?];
    tail_parts(g, query, &mut bindings, &mut parts)?;

    Ok(Statement::new(parts.join("\n"), bindings))
}
