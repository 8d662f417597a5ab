//! CLI configuration.
//!
//! Looked up in order: an explicit path, `./sqlweave.toml`, then
//! `<config dir>/sqlweave/config.toml`. The first file found wins; with no
//! file the defaults apply.
//!
//! ```toml
//! dialect = "mysql"
//! table_prefix = "app_"
//! explicit_tables = true
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::Query;
use crate::error::{SqlWeaveError, SqlWeaveResult};
use crate::grammar::Dialect;
use crate::rewrite::{ExplicitTables, PostProcessor, TablePrefixer, process_all};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG: &str = "sqlweave.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Target dialect
    pub dialect: Dialect,

    /// Prefix applied to every table name
    pub table_prefix: Option<String>,

    /// Qualify bare column names with their table
    pub explicit_tables: bool,
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> SqlWeaveResult<Self> {
        toml::from_str(content).map_err(|e| SqlWeaveError::Config(e.to_string()))
    }

    /// Read a config file.
    pub fn from_file(path: &Path) -> SqlWeaveResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SqlWeaveError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| SqlWeaveError::Config(format!("{}: {}", path.display(), e.message())))
    }

    /// Load the first config found. An explicit path must exist.
    pub fn load(explicit: Option<&Path>) -> SqlWeaveResult<Self> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading config");
            return Self::from_file(path);
        }
        for path in Self::search_paths() {
            if path.is_file() {
                debug!(path = %path.display(), "loading config");
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Implicit config locations, in lookup order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sqlweave").join("config.toml"));
        }
        paths
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = Some(prefix.into());
        self
    }

    pub fn with_explicit_tables(mut self, enabled: bool) -> Self {
        self.explicit_tables = enabled;
        self
    }

    /// Run the configured post-processors: explicit tables first, then the prefix.
    pub fn apply(&self, query: &Arc<Query>) -> Arc<Query> {
        let prefixer = self
            .table_prefix
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(TablePrefixer::new);

        let mut processors: Vec<&dyn PostProcessor> = Vec::new();
        if self.explicit_tables {
            processors.push(&ExplicitTables);
        }
        if let Some(prefixer) = &prefixer {
            processors.push(prefixer);
        }
        process_all(&processors, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml_str(
            r#"
            dialect = "sqlite"
            table_prefix = "app_"
            explicit_tables = true
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            Config::default()
                .with_dialect(Dialect::Sqlite)
                .with_table_prefix("app_")
                .with_explicit_tables(true)
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_bad_config() {
        assert!(matches!(
            Config::from_toml_str("dialect = \"oracle\""),
            Err(SqlWeaveError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml_str("prefix = \"x\""),
            Err(SqlWeaveError::Config(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/sqlweave.toml"))).unwrap_err();
        assert!(matches!(err, SqlWeaveError::Config(_)));
    }

    #[test]
    fn test_apply_processors() {
        let query = Query::from_table("users").select("id").finish();

        let unchanged = Config::default().apply(&query);
        assert!(Arc::ptr_eq(&unchanged, &query));

        let config = Config::default()
            .with_table_prefix("app_")
            .with_explicit_tables(true);
        let stmt = config
            .dialect
            .grammar()
            .compile(&config.apply(&query))
            .unwrap();
        assert_eq!(stmt.sql, "SELECT \"app_users\".\"id\"\nFROM \"app_users\"");
    }
}
