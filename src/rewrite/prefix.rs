//! Table prefixing.

use std::collections::HashSet;
use std::sync::Arc;

use crate::ast::{Query, Table};
use crate::rewrite::{PostProcessor, RewriteRules, Rewriter};

/// Prepends a prefix to every table name and to the table part of qualified
/// columns (`users.id` -> `app_users.id`).
///
/// A qualified column is only rewritten when its table part names a table
/// that is in scope without an alias: the FROM or JOIN tables of the query it
/// appears in or of any enclosing query. Columns qualified by an alias are
/// left as they are. An unscoped prefixer rewrites every qualified column.
#[derive(Debug, Clone)]
pub struct TablePrefixer {
    prefix: String,
    scoped: bool,
}

/// Unaliased table names in scope; `None` means no restriction.
pub type TableScope = Option<HashSet<String>>;

impl TablePrefixer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            scoped: true,
        }
    }

    /// Prefix the table part of every qualified column, in scope or not.
    pub fn unscoped(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            scoped: false,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `db.users` -> `db.app_users`
    pub fn prefix_table(&self, name: &str) -> String {
        match name.rsplit_once('.') {
            Some((database, table)) => format!("{}.{}{}", database, self.prefix, table),
            None => format!("{}{}", self.prefix, name),
        }
    }

    fn prefix_column(&self, name: &str, scope: &TableScope) -> Option<String> {
        if self.prefix.is_empty() {
            return None;
        }
        let (table, column) = name.rsplit_once('.')?;
        match scope {
            Some(tables) if !tables.contains(table) => None,
            _ => Some(format!("{}.{}", self.prefix_table(table), column)),
        }
    }
}

fn unaliased_name(table: &Table, alias: Option<&String>) -> Option<String> {
    match alias {
        Some(_) => None,
        None => table.name().map(str::to_string),
    }
}

impl RewriteRules for TablePrefixer {
    type Context = TableScope;

    fn root_context(&self) -> TableScope {
        self.scoped.then(HashSet::new)
    }

    fn enter_query(&self, query: &Query, parent: &TableScope) -> TableScope {
        let mut scope = parent.clone()?;
        if let Some(table) = &query.table {
            scope.extend(unaliased_name(table, query.table_alias.as_ref()));
        }
        for join in &query.joins {
            scope.extend(unaliased_name(&join.table, join.alias.as_ref()));
        }
        Some(scope)
    }

    fn table_name(&self, name: &str, _scope: &TableScope) -> Option<String> {
        (!self.prefix.is_empty()).then(|| self.prefix_table(name))
    }

    fn column_name(&self, name: &str, scope: &TableScope) -> Option<String> {
        self.prefix_column(name, scope)
    }

    fn target_column(&self, name: &str, scope: &TableScope) -> Option<String> {
        self.prefix_column(name, scope)
    }
}

impl PostProcessor for TablePrefixer {
    fn process(&self, query: &Arc<Query>) -> Arc<Query> {
        Rewriter::new(self).rewrite(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_table_last_segment() {
        let prefixer = TablePrefixer::new("app_");
        assert_eq!(prefixer.prefix_table("users"), "app_users");
        assert_eq!(prefixer.prefix_table("main.users"), "main.app_users");
    }

    #[test]
    fn test_column_scope() {
        let prefixer = TablePrefixer::new("app_");
        let scope: TableScope = Some(["users".to_string()].into_iter().collect());
        assert_eq!(
            prefixer.column_name("users.id", &scope),
            Some("app_users.id".to_string())
        );
        assert_eq!(prefixer.column_name("u.id", &scope), None);
        assert_eq!(prefixer.column_name("id", &scope), None);
        assert_eq!(
            prefixer.column_name("u.id", &None),
            Some("app_u.id".to_string())
        );
    }
}
