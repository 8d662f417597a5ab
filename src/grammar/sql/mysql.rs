use crate::ast::{Bindings, Column, Operand, Query};
use crate::error::SqlWeaveResult;
use crate::grammar::Grammar;
use crate::grammar::criteria::compile_value_list;
use crate::grammar::dml::limit_then_offset;
use crate::grammar::slots::compile_column;

/// Largest row count MySQL accepts, used as the limit of an offset-only query.
const UNBOUNDED_LIMIT: &str = "18446744073709551615";

/// MySQL grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlGrammar;

impl MySqlGrammar {
    pub fn new() -> Self {
        Self
    }
}

impl Grammar for MySqlGrammar {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_char(&self) -> char {
        '`'
    }

    fn random_order(&self) -> &'static str {
        "RAND()"
    }

    /// `FIELD()` returns the 1-based position of the value in the list and 0
    /// for unlisted values.
    ///
    /// Listed values first: the list is reversed and sorted descending, so the
    /// first value gets the highest position and unlisted rows (0) come last.
    /// Unlisted first: the list is kept and sorted ascending.
    fn compile_explicit_order(
        &self,
        column: &Column,
        values: &[Operand],
        others_first: bool,
        bindings: &mut Bindings,
    ) -> SqlWeaveResult<String> {
        let column = compile_column(self, column, bindings)?;
        if others_first {
            let list = compile_value_list(self, values, bindings)?;
            Ok(format!("FIELD({}, {}) ASC", column, list))
        } else {
            let reversed: Vec<Operand> = values.iter().rev().cloned().collect();
            let list = compile_value_list(self, &reversed, bindings)?;
            Ok(format!("FIELD({}, {}) DESC", column, list))
        }
    }

    fn compile_offset_limit(
        &self,
        query: &Query,
        bindings: &mut Bindings,
    ) -> SqlWeaveResult<Vec<String>> {
        limit_then_offset(self, query, bindings, UNBOUNDED_LIMIT)
    }
}
