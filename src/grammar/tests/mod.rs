//! Grammar test modules.
//!
//! Tests are organized by category:
//! - `core`: SELECT / UPDATE / DELETE shape, quoting, sub-queries, ordering
//! - `criteria`: criterion renderings and the AND/OR fold
//! - `insert`: row and insert-from-select statements
//! - `dialects`: MySQL and SQLite divergences

mod criteria;
mod dialects;

use crate::ast::{Statement, Value};

/// Every positional placeholder has exactly one binding.
fn assert_bindings_match(statement: &Statement) {
    assert_eq!(
        statement.placeholder_count(),
        statement.bindings.len(),
        "placeholder / binding mismatch in {}",
        statement.sql
    );
}

fn values(statement: &Statement) -> Vec<Value> {
    statement.bindings.values()
}
