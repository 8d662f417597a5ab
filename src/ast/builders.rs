//! Fluent constructors for [`Query`].
//!
//! These only assemble the tree; argument validation beyond the type system
//! happens in the compiler.

use std::sync::Arc;

use crate::ast::{
    Aggregate, Column, Criterion, Insert, InsertFromSelect, Join, Operand, Order, Query, Row,
    SelectItem, Selectable, Table,
};

impl Query {
    /// Start a query on a table.
    pub fn from_table(table: impl Into<Table>) -> Self {
        Self {
            table: Some(table.into()),
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.table_alias = Some(alias.into());
        self
    }

    pub fn select(mut self, column: impl Into<Selectable>) -> Self {
        self.select.push(Arc::new(SelectItem {
            alias: None,
            value: column.into(),
        }));
        self
    }

    pub fn select_as(mut self, column: impl Into<Selectable>, alias: impl Into<String>) -> Self {
        self.select.push(Arc::new(SelectItem {
            alias: Some(alias.into()),
            value: column.into(),
        }));
        self
    }

    pub fn columns(self, columns: &[&str]) -> Self {
        columns.iter().fold(self, |q, c| q.select(*c))
    }

    pub fn aggregate(
        self,
        function: &str,
        column: impl Into<Column>,
        alias: Option<&str>,
    ) -> Self {
        let aggregate = Aggregate::new(function, column);
        match alias {
            Some(alias) => self.select_as(aggregate, alias),
            None => self.select(aggregate),
        }
    }

    /// Add a criterion joined with its own append rule (AND unless set otherwise).
    pub fn filter(mut self, criterion: Criterion) -> Self {
        self.criteria.push(Arc::new(criterion));
        self
    }

    /// Add a criterion joined with OR.
    pub fn or_filter(self, criterion: Criterion) -> Self {
        self.filter(criterion.or())
    }

    /// `WHERE column = value`
    pub fn where_eq(self, column: &str, value: impl Into<Operand>) -> Self {
        self.filter(Criterion::value(column, "=", value))
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(Arc::new(join));
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order.push(Arc::new(order));
        self
    }

    pub fn order_by(self, column: &str, descending: bool) -> Self {
        if descending {
            self.order(Order::desc(column))
        } else {
            self.order(Order::asc(column))
        }
    }

    pub fn order_random(self) -> Self {
        self.order(Order::Random)
    }

    pub fn offset(mut self, offset: impl Into<Operand>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    pub fn limit(mut self, limit: impl Into<Operand>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    /// Append an inserted row. Replaces a pending insert-from-select.
    ///
    /// A column repeated within the row keeps its last value.
    pub fn insert_row<K, V>(mut self, row: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Operand>,
    {
        let mut entries = Row::new();
        for (column, value) in row {
            assign(&mut entries, column.into(), value.into());
        }
        let row = Arc::new(entries);
        match self.insert.as_mut().map(Arc::make_mut) {
            Some(Insert::Rows(rows)) => rows.push(row),
            _ => self.insert = Some(Arc::new(Insert::Rows(vec![row]))),
        }
        self
    }

    /// Insert the result of a select. Replaces pending rows.
    pub fn insert_from_select(
        mut self,
        columns: Option<Vec<String>>,
        select: impl Into<Arc<Query>>,
    ) -> Self {
        self.insert = Some(Arc::new(Insert::Select(Arc::new(InsertFromSelect {
            columns,
            select: select.into(),
        }))));
        self
    }

    /// Add an UPDATE assignment. A repeated column replaces the earlier value.
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Operand>) -> Self {
        assign(Arc::make_mut(&mut self.update), column.into(), value.into());
        self
    }

    pub fn delete(mut self) -> Self {
        self.delete = true;
        self
    }
}

/// Set `column` in `row`, replacing an earlier value for the same column.
fn assign(row: &mut Row, column: String, value: Operand) {
    match row.iter_mut().find(|(c, _)| *c == column) {
        Some(existing) => existing.1 = value,
        None => row.push((column, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_insert_from_select_exclude_each_other() {
        let q = Query::from_table("users")
            .insert_row([("name", "Ann")])
            .insert_from_select(None, Query::from_table("people"));
        assert!(matches!(q.insert.as_deref(), Some(Insert::Select(_))));

        let q = q.insert_row([("name", "Bob")]).insert_row([("name", "Cid")]);
        match q.insert.as_deref() {
            Some(Insert::Rows(rows)) => assert_eq!(rows.len(), 2),
            other => panic!("expected rows, got {:?}", other),
        }
    }

    #[test]
    fn test_set_replaces_repeated_column() {
        let q = Query::from_table("users").set("name", "a").set("age", 3).set("name", "b");
        assert_eq!(q.update.len(), 2);
        assert_eq!(q.update[0], ("name".to_string(), Operand::from("b")));
    }

    #[test]
    fn test_insert_row_keeps_last_value_of_repeated_column() {
        let q = Query::from_table("t")
            .insert_row([("a", 1), ("b", 2), ("a", 3)])
            .insert_row([("b", 4)]);
        let Some(Insert::Rows(rows)) = q.insert.as_deref() else {
            panic!("expected rows, got {:?}", q.insert);
        };
        assert_eq!(
            *rows[0],
            vec![
                ("a".to_string(), Operand::from(3)),
                ("b".to_string(), Operand::from(2)),
            ]
        );
        assert_eq!(*rows[1], vec![("b".to_string(), Operand::from(4))]);
    }
}
