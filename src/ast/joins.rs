use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::{Criterion, JoinType, Table};

/// A join definition. `criteria` form the ON clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    #[serde(default)]
    pub kind: JoinType,
    pub table: Table,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub criteria: Vec<Arc<Criterion>>,
}

impl Join {
    pub fn new(kind: JoinType, table: impl Into<Table>) -> Self {
        Self {
            kind,
            table: table.into(),
            alias: None,
            criteria: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Add an `ON` criterion.
    pub fn on(mut self, criterion: Criterion) -> Self {
        self.criteria.push(Arc::new(criterion));
        self
    }

    /// Shortcut for `ON left = right`.
    pub fn on_columns(self, left: &str, right: &str) -> Self {
        self.on(Criterion::columns(left, "=", right))
    }
}
