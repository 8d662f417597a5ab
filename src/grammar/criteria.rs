//! WHERE / ON criteria compilation.

use std::sync::Arc;

use crate::ast::{AppendRule, Bindings, Criterion, InValues, Operand};
use crate::error::{SqlWeaveError, SqlWeaveResult};
use crate::grammar::Grammar;
use crate::grammar::slots::{
    compile_column, compile_select_source, compile_value, inline_statement,
};

/// Join a criteria list into one boolean expression.
///
/// Criteria are folded left to right. When an AND follows a non-AND, the
/// text accumulated so far is wrapped in parentheses first, so
/// `[a, OR b, AND c]` becomes `(a OR b) AND c`. Empty fragments are skipped.
pub fn compile_criteria<G: Grammar + ?Sized>(
    g: &G,
    criteria: &[Arc<Criterion>],
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    let mut sql = String::new();
    let mut previous: Option<AppendRule> = None;

    for criterion in criteria {
        let fragment = compile_criterion(g, criterion, bindings)?;
        if fragment.is_empty() {
            continue;
        }

        let rule = criterion.append_rule();
        match previous {
            None => sql = fragment,
            Some(prev) if rule == AppendRule::And && prev != AppendRule::And => {
                sql = format!("({}) AND {}", sql, fragment);
            }
            Some(_) => {
                sql.push(' ');
                sql.push_str(rule.as_str());
                sql.push(' ');
                sql.push_str(&fragment);
            }
        }
        previous = Some(rule);
    }

    Ok(sql)
}

/// Compile one criterion. Only a group of empty criteria yields an empty string.
pub fn compile_criterion<G: Grammar + ?Sized>(
    g: &G,
    criterion: &Criterion,
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    match criterion {
        Criterion::Value {
            column,
            rule,
            value,
            ..
        } => {
            check_rule(rule)?;
            let column = compile_column(g, column, bindings)?;
            let value_sql = compile_value(g, value, bindings)?;
            let mut sql = format!("{} {} {}", column, rule, value_sql);
            if is_like_rule(rule) && value.as_value().is_some_and(|v| v.is_textual()) {
                sql.push_str(" ESCAPE ?");
                bindings.push("\\");
            }
            Ok(sql)
        }
        Criterion::Columns {
            left, rule, right, ..
        } => {
            check_rule(rule)?;
            let left = compile_column(g, left, bindings)?;
            let right = compile_column(g, right, bindings)?;
            Ok(format!("{} {} {}", left, rule, right))
        }
        Criterion::Between {
            column,
            min,
            max,
            not,
            ..
        } => {
            let column = compile_column(g, column, bindings)?;
            let min = compile_value(g, min, bindings)?;
            let max = compile_value(g, max, bindings)?;
            Ok(format!(
                "({} {}BETWEEN {} AND {})",
                column,
                not_prefix(*not),
                min,
                max
            ))
        }
        Criterion::Group { criteria, not, .. } => {
            let inner = compile_criteria(g, criteria, bindings)?;
            if inner.is_empty() {
                Ok(String::new())
            } else {
                Ok(format!("{}({})", not_prefix(*not), inner))
            }
        }
        Criterion::Exists { subquery, not, .. } => {
            let subquery = compile_select_source(g, subquery, bindings)?;
            Ok(format!("{}EXISTS {}", not_prefix(*not), subquery))
        }
        Criterion::In {
            column,
            values,
            not,
            ..
        } => match values {
            InValues::List(list) if list.is_empty() => {
                // Membership in an empty set is always false, non-membership always true
                bindings.push(if *not { 1 } else { 0 });
                Ok("?".to_string())
            }
            InValues::List(list) => {
                let column = compile_column(g, column, bindings)?;
                let items = compile_value_list(g, list, bindings)?;
                Ok(format!("{} {}IN ({})", column, not_prefix(*not), items))
            }
            InValues::Select(subquery) => {
                let column = compile_column(g, column, bindings)?;
                let subquery = compile_select_source(g, subquery, bindings)?;
                Ok(format!("{} {}IN {}", column, not_prefix(*not), subquery))
            }
        },
        Criterion::IsNull {
            column, is_null, ..
        } => {
            let column = compile_column(g, column, bindings)?;
            Ok(format!("{} IS {}NULL", column, not_prefix(!*is_null)))
        }
        Criterion::Raw { statement, .. } => Ok(inline_statement(statement, bindings)),
    }
}

pub fn compile_value_list<G: Grammar + ?Sized>(
    g: &G,
    values: &[Operand],
    bindings: &mut Bindings,
) -> SqlWeaveResult<String> {
    let mut parts = Vec::with_capacity(values.len());
    for value in values {
        parts.push(compile_value(g, value, bindings)?);
    }
    Ok(parts.join(", "))
}

fn not_prefix(not: bool) -> &'static str {
    if not { "NOT " } else { "" }
}

fn is_like_rule(rule: &str) -> bool {
    rule == "LIKE" || rule == "NOT LIKE"
}

/// Comparison rules are emitted verbatim, so they may only contain operator
/// characters and keyword letters.
fn check_rule(rule: &str) -> SqlWeaveResult<()> {
    let valid = !rule.trim().is_empty()
        && rule
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == ' ' || "=<>!~&|^%@#*+-/".contains(c));
    if valid {
        Ok(())
    } else {
        Err(SqlWeaveError::invalid_query(format!(
            "Unknown comparison rule `{}`",
            rule
        )))
    }
}
