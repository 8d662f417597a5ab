use crate::ast::{Bindings, Query, Statement};
use crate::error::{SqlWeaveError, SqlWeaveResult};
use crate::grammar::Grammar;
use crate::grammar::dml::{delete, insert, limit_then_offset, update};

/// SQLite grammar.
///
/// SQLite takes neither an alias on the UPDATE / DELETE target nor `DEFAULT`
/// inside a VALUES list, so multi-row inserts become one statement per row.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteGrammar;

impl SqliteGrammar {
    pub fn new() -> Self {
        Self
    }
}

fn reject_target_alias(query: &Query, statement: &str) -> SqlWeaveResult<()> {
    match &query.table_alias {
        Some(alias) => Err(SqlWeaveError::invalid_query(format!(
            "SQLite does not allow an alias (`{}`) on the {} target table",
            alias, statement
        ))),
        None => Ok(()),
    }
}

impl Grammar for SqliteGrammar {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn compile_offset_limit(
        &self,
        query: &Query,
        bindings: &mut Bindings,
    ) -> SqlWeaveResult<Vec<String>> {
        limit_then_offset(self, query, bindings, "-1")
    }

    fn compile_insert(&self, query: &Query) -> SqlWeaveResult<Vec<Statement>> {
        insert::build_insert_per_row(self, query)
    }

    fn compile_update(&self, query: &Query) -> SqlWeaveResult<Statement> {
        reject_target_alias(query, "UPDATE")?;
        update::build_update(self, query)
    }

    fn compile_delete(&self, query: &Query) -> SqlWeaveResult<Statement> {
        reject_target_alias(query, "DELETE")?;
        delete::build_delete(self, query)
    }
}
