use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SqlWeaveError;
use crate::grammar::Grammar;
use crate::grammar::sql::common::CommonGrammar;
use crate::grammar::sql::mysql::MySqlGrammar;
use crate::grammar::sql::sqlite::SqliteGrammar;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Common,
    #[serde(alias = "MySQL")]
    MySql,
    #[serde(alias = "SQLite")]
    Sqlite,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Common, Dialect::MySql, Dialect::Sqlite];

    pub fn grammar(&self) -> Box<dyn Grammar> {
        match self {
            Dialect::Common => Box::new(CommonGrammar),
            Dialect::MySql => Box::new(MySqlGrammar),
            Dialect::Sqlite => Box::new(SqliteGrammar),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Common => "common",
            Dialect::MySql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }
}

impl FromStr for Dialect {
    type Err = SqlWeaveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "common" | "sql" | "ansi" => Ok(Dialect::Common),
            "mysql" | "mariadb" => Ok(Dialect::MySql),
            "sqlite" | "sqlite3" => Ok(Dialect::Sqlite),
            other => Err(SqlWeaveError::invalid_argument(format!(
                "Unknown dialect `{}`, expected one of common, mysql, sqlite",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialect_names() {
        assert_eq!("MySQL".parse::<Dialect>().unwrap(), Dialect::MySql);
        assert_eq!(" sqlite3 ".parse::<Dialect>().unwrap(), Dialect::Sqlite);
        assert_eq!("common".parse::<Dialect>().unwrap(), Dialect::Common);
        assert!(matches!(
            "oracle".parse::<Dialect>(),
            Err(SqlWeaveError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_grammar_names_match() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.grammar().name(), dialect.as_str());
        }
    }
}
