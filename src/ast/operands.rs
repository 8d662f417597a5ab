//! Slots that may hold a plain name/scalar, a sub-query or a leaf expression.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ast::{Expression, Query, Statement, Value};

/// A column slot: identifier, sub-query or leaf expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Identifier, possibly dotted (`table.column`), quoted on compile
    Name(String),
    /// Sub-select, compiled in parentheses
    Query(Arc<Query>),
    /// Leaf expression, compiled in parentheses
    Expr(Expression),
}

impl Column {
    pub fn name(&self) -> Option<&str> {
        match self {
            Column::Name(name) => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Column::Name(name) => write!(f, "{}", name),
            Column::Query(_) => write!(f, "(SUBQUERY)"),
            Column::Expr(expr) => write!(f, "({})", expr.to_statement().sql),
        }
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Column::Name(name.to_string())
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Column::Name(name)
    }
}

impl From<Query> for Column {
    fn from(query: Query) -> Self {
        Column::Query(Arc::new(query))
    }
}

impl From<Arc<Query>> for Column {
    fn from(query: Arc<Query>) -> Self {
        Column::Query(query)
    }
}

impl From<Expression> for Column {
    fn from(expr: Expression) -> Self {
        Column::Expr(expr)
    }
}

/// A value slot: scalar (bound as `?`), sub-query or leaf expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Value(Value),
    Query(Arc<Query>),
    Expr(Expression),
}

impl Operand {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Operand::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Value(value) => write!(f, "{}", value),
            Operand::Query(_) => write!(f, "(SUBQUERY)"),
            Operand::Expr(expr) => write!(f, "({})", expr.to_statement().sql),
        }
    }
}

macro_rules! operand_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Operand::Value(Value::from(value))
                }
            }
        )*
    };
}

operand_from_scalar!(bool, i32, i64, usize, f64, &str, String, DateTime<Utc>);

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<Query> for Operand {
    fn from(query: Query) -> Self {
        Operand::Query(Arc::new(query))
    }
}

impl From<Arc<Query>> for Operand {
    fn from(query: Arc<Query>) -> Self {
        Operand::Query(query)
    }
}

impl From<Expression> for Operand {
    fn from(expr: Expression) -> Self {
        Operand::Expr(expr)
    }
}

/// The target table of a query or join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Table {
    Name(String),
    Query(Arc<Query>),
    Raw(Statement),
}

impl Table {
    pub fn name(&self) -> Option<&str> {
        match self {
            Table::Name(name) => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Table::Name(name) => write!(f, "{}", name),
            Table::Query(_) => write!(f, "(SUBQUERY)"),
            Table::Raw(statement) => write!(f, "({})", statement.sql),
        }
    }
}

impl From<&str> for Table {
    fn from(name: &str) -> Self {
        Table::Name(name.to_string())
    }
}

impl From<String> for Table {
    fn from(name: String) -> Self {
        Table::Name(name)
    }
}

impl From<Query> for Table {
    fn from(query: Query) -> Self {
        Table::Query(Arc::new(query))
    }
}

impl From<Arc<Query>> for Table {
    fn from(query: Arc<Query>) -> Self {
        Table::Query(query)
    }
}

impl From<Statement> for Table {
    fn from(statement: Statement) -> Self {
        Table::Raw(statement)
    }
}

/// An aggregate call such as `COUNT(*)` or `SUM("amount")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    /// Function name, emitted verbatim
    pub function: String,
    pub column: Column,
}

impl Aggregate {
    pub fn new(function: impl Into<String>, column: impl Into<Column>) -> Self {
        Self {
            function: function.into(),
            column: column.into(),
        }
    }

    pub fn count(column: impl Into<Column>) -> Self {
        Self::new("COUNT", column)
    }

    pub fn sum(column: impl Into<Column>) -> Self {
        Self::new("SUM", column)
    }

    pub fn avg(column: impl Into<Column>) -> Self {
        Self::new("AVG", column)
    }

    pub fn min(column: impl Into<Column>) -> Self {
        Self::new("MIN", column)
    }

    pub fn max(column: impl Into<Column>) -> Self {
        Self::new("MAX", column)
    }
}

/// Anything that may appear in the select list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selectable {
    Column(Column),
    Aggregate(Arc<Aggregate>),
}

macro_rules! selectable_from_column {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Selectable {
                fn from(column: $ty) -> Self {
                    Selectable::Column(Column::from(column))
                }
            }
        )*
    };
}

selectable_from_column!(&str, String, Query, Arc<Query>, Expression);

impl From<Column> for Selectable {
    fn from(column: Column) -> Self {
        Selectable::Column(column)
    }
}

impl From<Aggregate> for Selectable {
    fn from(aggregate: Aggregate) -> Self {
        Selectable::Aggregate(Arc::new(aggregate))
    }
}

/// One select list entry; `alias` renders as `AS "alias"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectItem {
    #[serde(default)]
    pub alias: Option<String>,
    pub value: Selectable,
}
