//! SQL grammar: compiles a [`Query`] into a [`Statement`] for one dialect.
//!
//! Every identifier is quoted and every caller value becomes a `?` placeholder
//! with its value appended to the statement bindings, in textual order.
//!
//! ```
//! use sqlweave::prelude::*;
//!
//! let query = Query::from_table("users").where_eq("id", 5).limit(1);
//! let statement = CommonGrammar.compile(&query).unwrap();
//! assert_eq!(statement.sql, "SELECT *\nFROM \"users\"\nWHERE \"id\" = ?\nLIMIT ?");
//! assert_eq!(statement.bindings.values(), vec![Value::Int(5), Value::Int(1)]);
//! ```

pub mod criteria;
pub mod dialect;
pub mod dml;
pub mod order;
pub mod slots;
pub mod sql;

#[cfg(test)]
mod tests;

use tracing::debug;

use crate::ast::{Bindings, Column, Operand, Query, Statement};
use crate::error::{SqlWeaveError, SqlWeaveResult};

pub use dialect::Dialect;
pub use sql::common::CommonGrammar;
pub use sql::mysql::MySqlGrammar;
pub use sql::sqlite::SqliteGrammar;

/// Dialect-specific SQL compilation.
///
/// Every method has a dialect-neutral default; a dialect overrides only the
/// fragments where its syntax or rules differ.
pub trait Grammar {
    /// Dialect name, used in logs.
    fn name(&self) -> &'static str;

    /// Identifier quote character.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Quote a single name segment, doubling embedded quote characters.
    fn quote_name(&self, name: &str) -> String {
        let q = self.quote_char();
        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(q);
        for ch in name.chars() {
            if ch == q {
                quoted.push(q);
            }
            quoted.push(ch);
        }
        quoted.push(q);
        quoted
    }

    /// Quote a possibly dotted identifier (`db.table.column`) segment by segment.
    /// A `*` segment stays bare.
    fn quote_identifier(&self, name: &str) -> String {
        name.split('.')
            .map(|part| {
                if part == "*" {
                    part.to_string()
                } else {
                    self.quote_name(part)
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Expression used for random ordering.
    fn random_order(&self) -> &'static str {
        "RANDOM()"
    }

    /// Order rows by a ranked list of values.
    fn compile_explicit_order(
        &self,
        column: &Column,
        values: &[Operand],
        others_first: bool,
        bindings: &mut Bindings,
    ) -> SqlWeaveResult<String> {
        order::explicit_order_case(self, column, values, others_first, bindings)
    }

    /// OFFSET and LIMIT parts, in the order the dialect expects.
    ///
    /// The default emits `OFFSET ?` before `LIMIT ?`. MySQL and SQLite only
    /// accept LIMIT first and need an explicit unbounded LIMIT for an offset
    /// without a limit, so their output differs from the common dialect here.
    fn compile_offset_limit(
        &self,
        query: &Query,
        bindings: &mut Bindings,
    ) -> SqlWeaveResult<Vec<String>> {
        dml::offset_then_limit(self, query, bindings)
    }

    /// Compile the query according to its kind: insert, update, delete or select.
    fn compile(&self, query: &Query) -> SqlWeaveResult<Statement> {
        let statement = if query.is_insert() {
            let mut statements = self.compile_insert(query)?;
            if statements.len() != 1 {
                return Err(SqlWeaveError::invalid_query(format!(
                    "The insert query compiles to {} statements in the {} dialect, use compile_insert",
                    statements.len(),
                    self.name()
                )));
            }
            statements.remove(0)
        } else if query.is_update() {
            self.compile_update(query)?
        } else if query.delete {
            self.compile_delete(query)?
        } else {
            self.compile_select(query)?
        };

        debug!(
            dialect = self.name(),
            placeholders = statement.placeholder_count(),
            bindings = statement.bindings.len(),
            "compiled statement"
        );
        Ok(statement)
    }

    fn compile_select(&self, query: &Query) -> SqlWeaveResult<Statement> {
        dml::select::build_select(self, query)
    }

    /// Compile INSERT. Some dialects produce one statement per row.
    fn compile_insert(&self, query: &Query) -> SqlWeaveResult<Vec<Statement>> {
        dml::insert::build_insert(self, query)
    }

    fn compile_update(&self, query: &Query) -> SqlWeaveResult<Statement> {
        dml::update::build_update(self, query)
    }

    fn compile_delete(&self, query: &Query) -> SqlWeaveResult<Statement> {
        dml::delete::build_delete(self, query)
    }
}
