//! # sqlweave — dialect-aware SQL query builder
//!
//! Build a query tree, optionally rewrite it, then compile it into
//! parameterized SQL plus its bindings for one SQL dialect.
//!
//! ## Quick Example
//!
//! ```
//! use sqlweave::prelude::*;
//!
//! let query = Query::from_table("users")
//!     .select("id")
//!     .filter(Criterion::value("name", "like", "A%"))
//!     .or_filter(Criterion::is_in("role", ["admin", "staff"]))
//!     .filter(Criterion::is_null("deleted_at"))
//!     .limit(10)
//!     .finish();
//!
//! let query = TablePrefixer::new("app_").process(&query);
//! let statement = MySqlGrammar.compile(&query).unwrap();
//! assert_eq!(
//!     statement.sql,
//!     "SELECT `id`\nFROM `app_users`\n\
//!      WHERE (`name` LIKE ? ESCAPE ? OR `role` IN (?, ?)) AND `deleted_at` IS NULL\n\
//!      LIMIT ?"
//! );
//! assert_eq!(statement.bindings.len(), 5);
//! ```
//!
//! ## Layers
//!
//! | Module     | Role                                                  |
//! |------------|-------------------------------------------------------|
//! | `ast`      | Query tree: criteria, orders, joins, leaf statements  |
//! | `grammar`  | Compilers for the common, MySQL and SQLite dialects   |
//! | `rewrite`  | Reference-preserving tree rewriting post-processors   |
//! | `config`   | CLI configuration file                                |

pub mod ast;
pub mod config;
pub mod error;
pub mod grammar;
pub mod rewrite;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::error::*;
    pub use crate::grammar::{CommonGrammar, Dialect, Grammar, MySqlGrammar, SqliteGrammar};
    pub use crate::rewrite::{ExplicitTables, PostProcessor, TablePrefixer};
}

/// Compile a query into every statement it needs in `dialect`.
///
/// Inserts go through `compile_insert` and may yield several statements (or
/// none for an empty row list); every other query yields exactly one.
///
/// # Example
///
/// ```
/// use sqlweave::prelude::*;
///
/// let query = Query::from_table("t")
///     .insert_row([("a", 1)])
///     .insert_row([("a", 2)]);
/// let statements = sqlweave::compile(&query, Dialect::Sqlite).unwrap();
/// assert_eq!(statements.len(), 2);
/// ```
pub fn compile(
    query: &ast::Query,
    dialect: grammar::Dialect,
) -> error::SqlWeaveResult<Vec<ast::Statement>> {
    let grammar = dialect.grammar();
    if query.is_insert() {
        grammar.compile_insert(query)
    } else {
        grammar.compile(query).map(|statement| vec![statement])
    }
}
