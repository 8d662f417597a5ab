use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::{AppendRule, Column, Operand, Query, Statement, Value};

/// A sub-select slot: a query or raw SQL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubQuery {
    Query(Arc<Query>),
    Raw(Statement),
}

impl From<Query> for SubQuery {
    fn from(query: Query) -> Self {
        SubQuery::Query(Arc::new(query))
    }
}

impl From<Arc<Query>> for SubQuery {
    fn from(query: Arc<Query>) -> Self {
        SubQuery::Query(query)
    }
}

impl From<Statement> for SubQuery {
    fn from(statement: Statement) -> Self {
        SubQuery::Raw(statement)
    }
}

/// The right side of `IN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InValues {
    List(Vec<Operand>),
    Select(SubQuery),
}

/// One boolean test of WHERE / ON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Criterion {
    /// `column RULE value`
    Value {
        column: Column,
        rule: String,
        value: Operand,
        #[serde(default)]
        append_rule: AppendRule,
    },
    /// `column RULE column`
    Columns {
        left: Column,
        rule: String,
        right: Column,
        #[serde(default)]
        append_rule: AppendRule,
    },
    /// `(column [NOT ]BETWEEN min AND max)`
    Between {
        column: Column,
        min: Operand,
        max: Operand,
        #[serde(default)]
        not: bool,
        #[serde(default)]
        append_rule: AppendRule,
    },
    /// `[NOT ](criteria...)`
    Group {
        criteria: Vec<Arc<Criterion>>,
        #[serde(default)]
        not: bool,
        #[serde(default)]
        append_rule: AppendRule,
    },
    /// `[NOT ]EXISTS (subquery)`
    Exists {
        subquery: SubQuery,
        #[serde(default)]
        not: bool,
        #[serde(default)]
        append_rule: AppendRule,
    },
    /// `column [NOT ]IN (...)`
    In {
        column: Column,
        values: InValues,
        #[serde(default)]
        not: bool,
        #[serde(default)]
        append_rule: AppendRule,
    },
    /// `column IS [NOT ]NULL`
    IsNull {
        column: Column,
        is_null: bool,
        #[serde(default)]
        append_rule: AppendRule,
    },
    /// Raw SQL with its own bindings
    Raw {
        statement: Statement,
        #[serde(default)]
        append_rule: AppendRule,
    },
}

impl Criterion {
    pub fn value(column: impl Into<Column>, rule: &str, value: impl Into<Operand>) -> Self {
        Criterion::Value {
            column: column.into(),
            rule: rule.trim().to_uppercase(),
            value: value.into(),
            append_rule: AppendRule::And,
        }
    }

    pub fn columns(left: impl Into<Column>, rule: &str, right: impl Into<Column>) -> Self {
        Criterion::Columns {
            left: left.into(),
            rule: rule.trim().to_uppercase(),
            right: right.into(),
            append_rule: AppendRule::And,
        }
    }

    pub fn between(
        column: impl Into<Column>,
        min: impl Into<Operand>,
        max: impl Into<Operand>,
    ) -> Self {
        Criterion::Between {
            column: column.into(),
            min: min.into(),
            max: max.into(),
            not: false,
            append_rule: AppendRule::And,
        }
    }

    pub fn group(criteria: Vec<Criterion>) -> Self {
        Criterion::Group {
            criteria: criteria.into_iter().map(Arc::new).collect(),
            not: false,
            append_rule: AppendRule::And,
        }
    }

    pub fn exists(subquery: impl Into<SubQuery>) -> Self {
        Criterion::Exists {
            subquery: subquery.into(),
            not: false,
            append_rule: AppendRule::And,
        }
    }

    pub fn is_in<V: Into<Operand>>(
        column: impl Into<Column>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Criterion::In {
            column: column.into(),
            values: InValues::List(values.into_iter().map(Into::into).collect()),
            not: false,
            append_rule: AppendRule::And,
        }
    }

    pub fn in_select(column: impl Into<Column>, subquery: impl Into<SubQuery>) -> Self {
        Criterion::In {
            column: column.into(),
            values: InValues::Select(subquery.into()),
            not: false,
            append_rule: AppendRule::And,
        }
    }

    pub fn is_null(column: impl Into<Column>) -> Self {
        Criterion::IsNull {
            column: column.into(),
            is_null: true,
            append_rule: AppendRule::And,
        }
    }

    pub fn is_not_null(column: impl Into<Column>) -> Self {
        Criterion::IsNull {
            column: column.into(),
            is_null: false,
            append_rule: AppendRule::And,
        }
    }

    pub fn raw(sql: impl Into<String>, bindings: impl IntoIterator<Item = Value>) -> Self {
        Criterion::Raw {
            statement: Statement::new(sql, bindings.into_iter().collect()),
            append_rule: AppendRule::And,
        }
    }

    /// Negate a criterion that has a `NOT` form (between, group, exists, in, null).
    /// Other variants are returned unchanged.
    pub fn negate(mut self) -> Self {
        match &mut self {
            Criterion::Between { not, .. }
            | Criterion::Group { not, .. }
            | Criterion::Exists { not, .. }
            | Criterion::In { not, .. } => *not = !*not,
            Criterion::IsNull { is_null, .. } => *is_null = !*is_null,
            Criterion::Value { .. } | Criterion::Columns { .. } | Criterion::Raw { .. } => {}
        }
        self
    }

    /// Join this criterion to the previous ones with OR.
    pub fn or(self) -> Self {
        self.with_append_rule(AppendRule::Or)
    }

    pub fn with_append_rule(mut self, rule: AppendRule) -> Self {
        *self.append_rule_mut() = rule;
        self
    }

    pub fn append_rule(&self) -> AppendRule {
        match self {
            Criterion::Value { append_rule, .. }
            | Criterion::Columns { append_rule, .. }
            | Criterion::Between { append_rule, .. }
            | Criterion::Group { append_rule, .. }
            | Criterion::Exists { append_rule, .. }
            | Criterion::In { append_rule, .. }
            | Criterion::IsNull { append_rule, .. }
            | Criterion::Raw { append_rule, .. } => *append_rule,
        }
    }

    fn append_rule_mut(&mut self) -> &mut AppendRule {
        match self {
            Criterion::Value { append_rule, .. }
            | Criterion::Columns { append_rule, .. }
            | Criterion::Between { append_rule, .. }
            | Criterion::Group { append_rule, .. }
            | Criterion::Exists { append_rule, .. }
            | Criterion::In { append_rule, .. }
            | Criterion::IsNull { append_rule, .. }
            | Criterion::Raw { append_rule, .. } => append_rule,
        }
    }
}
