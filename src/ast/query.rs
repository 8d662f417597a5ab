use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::{Criterion, Join, Operand, Order, SelectItem, Table};

/// Column name to value, in insertion order. Column names are unique within
/// a row; the builders keep the last value given for a repeated column.
pub type Row = Vec<(String, Operand)>;

/// `INSERT INTO t [(columns)] SELECT ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertFromSelect {
    /// `None` omits the column list
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    pub select: Arc<Query>,
}

/// What an INSERT writes. Rows and insert-from-select exclude each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Insert {
    Rows(Vec<Arc<Row>>),
    Select(Arc<InsertFromSelect>),
}

/// The root query node.
///
/// A query is assembled through the builder methods and then frozen with
/// [`Query::finish`]; compilation and rewriting only ever read it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Query {
    #[serde(default)]
    pub table: Option<Table>,
    #[serde(default)]
    pub table_alias: Option<String>,
    #[serde(default)]
    pub select: Vec<Arc<SelectItem>>,
    #[serde(default)]
    pub insert: Option<Arc<Insert>>,
    #[serde(default)]
    pub update: Arc<Row>,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub joins: Vec<Arc<Join>>,
    #[serde(default)]
    pub criteria: Vec<Arc<Criterion>>,
    #[serde(default)]
    pub order: Vec<Arc<Order>>,
    #[serde(default)]
    pub offset: Option<Operand>,
    #[serde(default)]
    pub limit: Option<Operand>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Freeze the query into a shared handle.
    pub fn finish(self) -> Arc<Query> {
        Arc::new(self)
    }

    /// Table name, when the target is a plain name.
    pub fn table_name(&self) -> Option<&str> {
        self.table.as_ref().and_then(Table::name)
    }

    /// The name columns of this query are qualified with: the alias, else the table name.
    pub fn reference_name(&self) -> Option<&str> {
        self.table_alias.as_deref().or_else(|| self.table_name())
    }

    pub fn is_insert(&self) -> bool {
        self.insert.is_some()
    }

    pub fn is_update(&self) -> bool {
        !self.update.is_empty()
    }
}
