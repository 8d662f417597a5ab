use serde::{Deserialize, Serialize};

use crate::ast::{Column, Operand};

/// One ORDER BY item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Order {
    /// `column ASC|DESC`
    Column {
        column: Column,
        #[serde(default)]
        descending: bool,
    },
    /// Orders by `column IS [NOT ]NULL` so NULL rows go first or last.
    ///
    /// Nulls-first sorts on `column IS NOT NULL`, nulls-last on
    /// `column IS NULL`. This relies on false sorting before true, which holds
    /// for the supported dialects but is not guaranteed by every database.
    Nulls { column: Column, nulls_first: bool },
    /// Listed values first, in list order; the rest before or after them
    Explicit {
        column: Column,
        values: Vec<Operand>,
        #[serde(default)]
        others_first: bool,
    },
    /// Dialect random function
    Random,
}

impl Order {
    pub fn asc(column: impl Into<Column>) -> Self {
        Order::Column {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<Column>) -> Self {
        Order::Column {
            column: column.into(),
            descending: true,
        }
    }

    pub fn nulls(column: impl Into<Column>, nulls_first: bool) -> Self {
        Order::Nulls {
            column: column.into(),
            nulls_first,
        }
    }

    pub fn explicit<V: Into<Operand>>(
        column: impl Into<Column>,
        values: impl IntoIterator<Item = V>,
        others_first: bool,
    ) -> Self {
        Order::Explicit {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            others_first,
        }
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::Column { column, descending } => {
                write!(f, "{} {}", column, if *descending { "DESC" } else { "ASC" })
            }
            Order::Nulls {
                column,
                nulls_first,
            } => write!(
                f,
                "{} NULLS {}",
                column,
                if *nulls_first { "FIRST" } else { "LAST" }
            ),
            Order::Explicit {
                column,
                values,
                others_first,
            } => {
                write!(f, "{} IN [", column)?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]{}", if *others_first { " OTHERS FIRST" } else { "" })
            }
            Order::Random => write!(f, "random"),
        }
    }
}
