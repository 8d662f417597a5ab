//! Query tree rewriting.
//!
//! A [`Rewriter`] walks a query and applies the leaf transforms of a
//! [`RewriteRules`] policy to every table and column slot, recursing into
//! sub-queries, joins, inserted rows, criteria and orders.
//!
//! The input is never mutated. A node is rebuilt only when something below it
//! changed; unchanged subtrees are shared with the input, so
//! `Arc::ptr_eq(&rewritten, &original)` holds when nothing matched.

pub mod prefix;
pub mod qualify;


use std::sync::Arc;

use tracing::trace;

use crate::ast::{
    Aggregate, Column, Criterion, InValues, Insert, InsertFromSelect, Join, Operand, Order, Query,
    Row, SelectItem, Selectable, SubQuery, Table,
};

pub use prefix::TablePrefixer;
pub use qualify::ExplicitTables;

/// A pass that turns a query into a (possibly) new query.
pub trait PostProcessor {
    fn process(&self, query: &Arc<Query>) -> Arc<Query>;
}

/// Run processors in order, each on the output of the previous one.
pub fn process_all(processors: &[&dyn PostProcessor], query: &Arc<Query>) -> Arc<Query> {
    processors
        .iter()
        .fold(Arc::clone(query), |query, processor| processor.process(&query))
}

/// Leaf transforms applied by a [`Rewriter`].
///
/// Every hook returns `None` to leave its input untouched.
pub trait RewriteRules {
    /// Top-down state, e.g. the tables in scope.
    type Context;

    /// Context above the root query.
    fn root_context(&self) -> Self::Context;

    /// Context for the clauses of `query`, derived from the enclosing one.
    fn enter_query(&self, query: &Query, parent: &Self::Context) -> Self::Context;

    /// Rewrite a plain table name (FROM, JOIN, INSERT / UPDATE / DELETE target).
    fn table_name(&self, _name: &str, _ctx: &Self::Context) -> Option<String> {
        None
    }

    /// Rewrite a column name read by the query.
    fn column_name(&self, _name: &str, _ctx: &Self::Context) -> Option<String> {
        None
    }

    /// Rewrite a column written by INSERT or UPDATE.
    fn target_column(&self, _name: &str, _ctx: &Self::Context) -> Option<String> {
        None
    }
}

/// Generic reference-preserving traversal driven by a [`RewriteRules`] policy.
pub struct Rewriter<'r, R: RewriteRules + ?Sized> {
    rules: &'r R,
}

impl<'r, R: RewriteRules + ?Sized> Rewriter<'r, R> {
    pub fn new(rules: &'r R) -> Self {
        Self { rules }
    }

    /// Rewrite a query; returns the same handle when nothing changed.
    pub fn rewrite(&self, query: &Arc<Query>) -> Arc<Query> {
        let root = self.rules.root_context();
        match self.query(query, &root) {
            Some(rewritten) => {
                trace!("rewriter rebuilt the root query");
                Arc::new(rewritten)
            }
            None => {
                trace!("rewriter left the query unchanged");
                Arc::clone(query)
            }
        }
    }

    fn query(&self, query: &Query, parent: &R::Context) -> Option<Query> {
        let ctx = self.rules.enter_query(query, parent);

        let table = query.table.as_ref().and_then(|t| self.table(t, &ctx));
        let select = rewrite_arcs(&query.select, |item| self.select_item(item, &ctx));
        let insert = query.insert.as_ref().and_then(|i| self.insert(i, &ctx));
        let update = self.row(&query.update, &ctx);
        let joins = rewrite_arcs(&query.joins, |join| self.join(join, &ctx));
        let criteria = self.criteria(&query.criteria, &ctx);
        let order = rewrite_arcs(&query.order, |order| self.order(order, &ctx));
        let offset = query.offset.as_ref().and_then(|o| self.operand(o, &ctx));
        let limit = query.limit.as_ref().and_then(|l| self.operand(l, &ctx));

        if table.is_none()
            && select.is_none()
            && insert.is_none()
            && update.is_none()
            && joins.is_none()
            && criteria.is_none()
            && order.is_none()
            && offset.is_none()
            && limit.is_none()
        {
            return None;
        }

        Some(Query {
            table: table.or_else(|| query.table.clone()),
            table_alias: query.table_alias.clone(),
            select: select.unwrap_or_else(|| query.select.clone()),
            insert: insert.map(Arc::new).or_else(|| query.insert.clone()),
            update: update.map_or_else(|| Arc::clone(&query.update), Arc::new),
            delete: query.delete,
            joins: joins.unwrap_or_else(|| query.joins.clone()),
            criteria: criteria.unwrap_or_else(|| query.criteria.clone()),
            order: order.unwrap_or_else(|| query.order.clone()),
            offset: offset.or_else(|| query.offset.clone()),
            limit: limit.or_else(|| query.limit.clone()),
        })
    }

    fn subquery_handle(&self, query: &Arc<Query>, ctx: &R::Context) -> Option<Arc<Query>> {
        self.query(query, ctx).map(Arc::new)
    }

    fn table(&self, table: &Table, ctx: &R::Context) -> Option<Table> {
        match table {
            Table::Name(name) => self.rules.table_name(name, ctx).map(Table::Name),
            Table::Query(query) => self.subquery_handle(query, ctx).map(Table::Query),
            Table::Raw(_) => None,
        }
    }

    fn column(&self, column: &Column, ctx: &R::Context) -> Option<Column> {
        match column {
            Column::Name(name) => self.rules.column_name(name, ctx).map(Column::Name),
            Column::Query(query) => self.subquery_handle(query, ctx).map(Column::Query),
            Column::Expr(_) => None,
        }
    }

    fn operand(&self, operand: &Operand, ctx: &R::Context) -> Option<Operand> {
        match operand {
            Operand::Query(query) => self.subquery_handle(query, ctx).map(Operand::Query),
            Operand::Value(_) | Operand::Expr(_) => None,
        }
    }

    fn operands(&self, operands: &[Operand], ctx: &R::Context) -> Option<Vec<Operand>> {
        rewrite_list(operands, |o| self.operand(o, ctx))
    }

    fn select_item(&self, item: &SelectItem, ctx: &R::Context) -> Option<SelectItem> {
        let value = match &item.value {
            Selectable::Column(column) => self.column(column, ctx).map(Selectable::Column),
            Selectable::Aggregate(aggregate) => self
                .aggregate(aggregate, ctx)
                .map(|a| Selectable::Aggregate(Arc::new(a))),
        }?;
        Some(SelectItem {
            alias: item.alias.clone(),
            value,
        })
    }

    fn aggregate(&self, aggregate: &Aggregate, ctx: &R::Context) -> Option<Aggregate> {
        let column = self.column(&aggregate.column, ctx)?;
        Some(Aggregate {
            function: aggregate.function.clone(),
            column,
        })
    }

    /// Inserted row or UPDATE assignments.
    fn row(&self, row: &Row, ctx: &R::Context) -> Option<Row> {
        rewrite_list(row, |(column, value)| {
            let new_column = self.rules.target_column(column, ctx);
            let new_value = self.operand(value, ctx);
            if new_column.is_none() && new_value.is_none() {
                return None;
            }
            Some((pick(new_column, column), pick(new_value, value)))
        })
    }

    fn insert(&self, insert: &Insert, ctx: &R::Context) -> Option<Insert> {
        match insert {
            Insert::Rows(rows) => rewrite_arcs(rows, |row| self.row(row, ctx)).map(Insert::Rows),
            Insert::Select(source) => self
                .insert_from_select(source, ctx)
                .map(|s| Insert::Select(Arc::new(s))),
        }
    }

    fn insert_from_select(
        &self,
        source: &InsertFromSelect,
        ctx: &R::Context,
    ) -> Option<InsertFromSelect> {
        let columns = source.columns.as_ref().and_then(|columns| {
            rewrite_list(columns, |column| self.rules.target_column(column, ctx))
        });
        let select = self.subquery_handle(&source.select, ctx);
        if columns.is_none() && select.is_none() {
            return None;
        }
        Some(InsertFromSelect {
            columns: columns.or_else(|| source.columns.clone()),
            select: select.unwrap_or_else(|| Arc::clone(&source.select)),
        })
    }

    fn join(&self, join: &Join, ctx: &R::Context) -> Option<Join> {
        let table = self.table(&join.table, ctx);
        let criteria = self.criteria(&join.criteria, ctx);
        if table.is_none() && criteria.is_none() {
            return None;
        }
        Some(Join {
            kind: join.kind,
            table: pick(table, &join.table),
            alias: join.alias.clone(),
            criteria: criteria.unwrap_or_else(|| join.criteria.clone()),
        })
    }

    fn criteria(
        &self,
        criteria: &[Arc<Criterion>],
        ctx: &R::Context,
    ) -> Option<Vec<Arc<Criterion>>> {
        rewrite_arcs(criteria, |c| self.criterion(c, ctx))
    }

    fn criterion(&self, criterion: &Criterion, ctx: &R::Context) -> Option<Criterion> {
        match criterion {
            Criterion::Value {
                column,
                rule,
                value,
                append_rule,
            } => {
                let new_column = self.column(column, ctx);
                let new_value = self.operand(value, ctx);
                if new_column.is_none() && new_value.is_none() {
                    return None;
                }
                Some(Criterion::Value {
                    column: pick(new_column, column),
                    rule: rule.clone(),
                    value: pick(new_value, value),
                    append_rule: *append_rule,
                })
            }
            Criterion::Columns {
                left,
                rule,
                right,
                append_rule,
            } => {
                let new_left = self.column(left, ctx);
                let new_right = self.column(right, ctx);
                if new_left.is_none() && new_right.is_none() {
                    return None;
                }
                Some(Criterion::Columns {
                    left: pick(new_left, left),
                    rule: rule.clone(),
                    right: pick(new_right, right),
                    append_rule: *append_rule,
                })
            }
            Criterion::Between {
                column,
                min,
                max,
                not,
                append_rule,
            } => {
                let new_column = self.column(column, ctx);
                let new_min = self.operand(min, ctx);
                let new_max = self.operand(max, ctx);
                if new_column.is_none() && new_min.is_none() && new_max.is_none() {
                    return None;
                }
                Some(Criterion::Between {
                    column: pick(new_column, column),
                    min: pick(new_min, min),
                    max: pick(new_max, max),
                    not: *not,
                    append_rule: *append_rule,
                })
            }
            Criterion::Group {
                criteria,
                not,
                append_rule,
            } => Some(Criterion::Group {
                criteria: self.criteria(criteria, ctx)?,
                not: *not,
                append_rule: *append_rule,
            }),
            Criterion::Exists {
                subquery,
                not,
                append_rule,
            } => Some(Criterion::Exists {
                subquery: self.subquery(subquery, ctx)?,
                not: *not,
                append_rule: *append_rule,
            }),
            Criterion::In {
                column,
                values,
                not,
                append_rule,
            } => {
                let new_column = self.column(column, ctx);
                let new_values = match values {
                    InValues::List(list) => self.operands(list, ctx).map(InValues::List),
                    InValues::Select(subquery) => {
                        self.subquery(subquery, ctx).map(InValues::Select)
                    }
                };
                if new_column.is_none() && new_values.is_none() {
                    return None;
                }
                Some(Criterion::In {
                    column: pick(new_column, column),
                    values: pick(new_values, values),
                    not: *not,
                    append_rule: *append_rule,
                })
            }
            Criterion::IsNull {
                column,
                is_null,
                append_rule,
            } => Some(Criterion::IsNull {
                column: self.column(column, ctx)?,
                is_null: *is_null,
                append_rule: *append_rule,
            }),
            Criterion::Raw { .. } => None,
        }
    }

    fn subquery(&self, subquery: &SubQuery, ctx: &R::Context) -> Option<SubQuery> {
        match subquery {
            SubQuery::Query(query) => self.subquery_handle(query, ctx).map(SubQuery::Query),
            SubQuery::Raw(_) => None,
        }
    }

    fn order(&self, order: &Order, ctx: &R::Context) -> Option<Order> {
        match order {
            Order::Column { column, descending } => Some(Order::Column {
                column: self.column(column, ctx)?,
                descending: *descending,
            }),
            Order::Nulls {
                column,
                nulls_first,
            } => Some(Order::Nulls {
                column: self.column(column, ctx)?,
                nulls_first: *nulls_first,
            }),
            Order::Explicit {
                column,
                values,
                others_first,
            } => {
                let new_column = self.column(column, ctx);
                let new_values = self.operands(values, ctx);
                if new_column.is_none() && new_values.is_none() {
                    return None;
                }
                Some(Order::Explicit {
                    column: pick(new_column, column),
                    values: new_values.unwrap_or_else(|| values.clone()),
                    others_first: *others_first,
                })
            }
            Order::Random => None,
        }
    }
}

fn pick<T: Clone>(new: Option<T>, old: &T) -> T {
    new.unwrap_or_else(|| old.clone())
}

/// Rewrite a list; `None` when no item changed. Unchanged items are cloned
/// into the new list, which for `Arc` items keeps the same handles. Only
/// leaf lists (names, scalar operands, row entries) hold items by value.
fn rewrite_list<T: Clone>(items: &[T], mut f: impl FnMut(&T) -> Option<T>) -> Option<Vec<T>> {
    let mut out: Option<Vec<T>> = None;
    for (i, item) in items.iter().enumerate() {
        let new = f(item);
        if let Some(list) = out.as_mut() {
            list.push(new.unwrap_or_else(|| item.clone()));
        } else if let Some(new) = new {
            let mut list = Vec::with_capacity(items.len());
            list.extend_from_slice(&items[..i]);
            list.push(new);
            out = Some(list);
        }
    }
    out
}

fn rewrite_arcs<T>(items: &[Arc<T>], mut f: impl FnMut(&T) -> Option<T>) -> Option<Vec<Arc<T>>> {
    rewrite_list(items, |item| f(item.as_ref()).map(Arc::new))
}
