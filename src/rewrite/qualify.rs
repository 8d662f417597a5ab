//! Explicit table qualification of columns.

use std::sync::Arc;

use crate::ast::Query;
use crate::rewrite::{PostProcessor, RewriteRules, Rewriter};

/// Qualifies unqualified columns with the alias or table name of the nearest
/// enclosing query (`id` -> `users.id`).
///
/// Already qualified columns and a bare `*` pass through, as do the target
/// columns of INSERT and UPDATE. Columns of a query that reads from an
/// unaliased sub-query have no name to take and are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitTables;

impl ExplicitTables {
    pub fn new() -> Self {
        Self
    }
}

impl RewriteRules for ExplicitTables {
    /// Name the columns of the current query are qualified with.
    type Context = Option<String>;

    fn root_context(&self) -> Option<String> {
        None
    }

    fn enter_query(&self, query: &Query, _parent: &Option<String>) -> Option<String> {
        query.reference_name().map(str::to_string)
    }

    fn column_name(&self, name: &str, table: &Option<String>) -> Option<String> {
        if name == "*" || name.contains('.') {
            return None;
        }
        table.as_ref().map(|table| format!("{}.{}", table, name))
    }
}

impl PostProcessor for ExplicitTables {
    fn process(&self, query: &Arc<Query>) -> Arc<Query> {
        Rewriter::new(self).rewrite(query)
    }
}
