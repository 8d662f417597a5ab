use crate::grammar::Grammar;

/// Dialect-neutral grammar: double-quoted identifiers, `RANDOM()`,
/// `CASE` explicit ordering and OFFSET before LIMIT.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonGrammar;

impl CommonGrammar {
    pub fn new() -> Self {
        Self
    }
}

impl Grammar for CommonGrammar {
    fn name(&self) -> &'static str {
        "common"
    }
}
