use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scalar value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// NULL value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f64),
    /// String
    String(String),
    /// Point in time
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Whether the value is text (drives the `LIKE ... ESCAPE` rule).
    pub fn is_textual(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s),
            Value::Timestamp(t) => write!(f, "'{}'", t.to_rfc3339()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// One bound value. Positional bindings have no name and are numbered by
/// their order among the positional entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: Value,
}

/// Ordered binding accumulator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings {
    entries: Vec<Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional value.
    pub fn push(&mut self, value: impl Into<Value>) {
        self.entries.push(Binding {
            name: None,
            value: value.into(),
        });
    }

    /// Set a named value. An existing entry with the same name is replaced in place.
    pub fn push_named(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|b| b.name.as_deref() == Some(name.as_str()))
        {
            Some(existing) => existing.value = value,
            None => self.entries.push(Binding {
                name: Some(name),
                value,
            }),
        }
    }

    /// Append `other` after the current entries.
    ///
    /// Positional entries continue the numbering of `self`; named entries keep
    /// their names. The relative order of `other` is preserved.
    pub fn merge(&mut self, other: &Bindings) {
        for binding in &other.entries {
            match &binding.name {
                None => self.push(binding.value.clone()),
                Some(name) => self.push_named(name.clone(), binding.value.clone()),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.entries.iter()
    }

    /// Positional values in placeholder order.
    pub fn positional(&self) -> impl Iterator<Item = &Value> {
        self.entries
            .iter()
            .filter(|b| b.name.is_none())
            .map(|b| &b.value)
    }

    pub fn named(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|b| b.name.as_deref() == Some(name))
            .map(|b| &b.value)
    }

    /// All values in order, names dropped.
    pub fn values(&self) -> Vec<Value> {
        self.entries.iter().map(|b| b.value.clone()).collect()
    }
}

impl<V: Into<Value>> FromIterator<V> for Bindings {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut bindings = Bindings::new();
        for value in iter {
            bindings.push(value);
        }
        bindings
    }
}
