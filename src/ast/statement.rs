use serde::{Deserialize, Serialize};

use crate::ast::{Bindings, Value};

/// SQL text plus the values for its placeholders.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Statement {
    pub sql: String,
    #[serde(default)]
    pub bindings: Bindings,
}

impl Statement {
    pub fn new(sql: impl Into<String>, bindings: Bindings) -> Self {
        Self {
            sql: sql.into(),
            bindings,
        }
    }

    /// Number of `?` placeholders outside of quoted literals and identifiers.
    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        let mut quote: Option<char> = None;
        for ch in self.sql.chars() {
            match quote {
                Some(q) if ch == q => quote = None,
                Some(_) => {}
                None => match ch {
                    '\'' | '"' | '`' => quote = Some(ch),
                    '?' => count += 1,
                    _ => {}
                },
            }
        }
        count
    }

    pub fn into_parts(self) -> (String, Bindings) {
        (self.sql, self.bindings)
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql)
    }
}

/// A leaf expression that carries its own SQL.
///
/// - `Raw`: literal SQL with bindings, emitted as is.
/// - `Value`: a single scalar rendered as `?`.
/// - `Column`: a bare identifier, emitted unescaped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Raw(Statement),
    Value(Value),
    Column(String),
}

impl Expression {
    pub fn raw(sql: impl Into<String>, bindings: impl IntoIterator<Item = Value>) -> Self {
        Expression::Raw(Statement::new(sql, bindings.into_iter().collect()))
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Expression::Value(value.into())
    }

    pub fn column(name: impl Into<String>) -> Self {
        Expression::Column(name.into())
    }

    pub fn to_statement(&self) -> Statement {
        match self {
            Expression::Raw(statement) => statement.clone(),
            Expression::Value(value) => {
                let mut bindings = Bindings::new();
                bindings.push(value.clone());
                Statement::new("?", bindings)
            }
            Expression::Column(name) => Statement::new(name.clone(), Bindings::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_statements() {
        let raw = Expression::raw("NOW() - INTERVAL ? DAY", [Value::Int(3)]).to_statement();
        assert_eq!(raw.sql, "NOW() - INTERVAL ? DAY");
        assert_eq!(raw.bindings.values(), vec![Value::Int(3)]);

        let value = Expression::value("abc").to_statement();
        assert_eq!(value.sql, "?");
        assert_eq!(value.bindings.values(), vec![Value::from("abc")]);

        let column = Expression::column("posts.id").to_statement();
        assert_eq!(column.sql, "posts.id");
        assert!(column.bindings.is_empty());
    }

    #[test]
    fn test_placeholder_count_skips_quoted() {
        let stmt = Statement::new("SELECT '?' FROM \"a?\" WHERE x = ? AND y = ?", Bindings::new());
        assert_eq!(stmt.placeholder_count(), 2);
    }

    #[test]
    fn test_named_bindings_are_not_placeholders() {
        let mut bindings = Bindings::new();
        bindings.push(1);
        bindings.push_named("since", "2024-01-01");
        let stmt = Statement::new("SELECT * FROM t WHERE id = ? AND at > :since", bindings);
        assert_eq!(stmt.placeholder_count(), 1);
        assert_eq!(stmt.bindings.len(), 2);
        assert_eq!(stmt.bindings.positional().count(), 1);
    }
}
