//! Dialect grammars.

pub mod common;
pub mod mysql;
pub mod sqlite;
