//! sqlweave — compile JSON query trees to SQL
//!
//! # Usage
//!
//! ```bash
//! # Compile for the configured dialect
//! sqlweave compile query.json
//!
//! # Pick a dialect, prefix tables and print JSON
//! sqlweave compile query.json --dialect mysql --prefix app_ --format json
//!
//! # Read the query from stdin
//! cat query.json | sqlweave compile -
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use sqlweave::config::Config;
use sqlweave::prelude::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlweave")]
#[command(version)]
#[command(about = "Compile JSON query trees into parameterized SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlweave compile query.json
    sqlweave compile query.json --dialect sqlite --explicit-tables
    sqlweave explain query.json --prefix app_
    sqlweave dialects")]
struct Cli {
    /// Config file (defaults to ./sqlweave.toml, then the user config dir)
    #[arg(short, long, global = true, env = "SQLWEAVE_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Flags that override the config file.
#[derive(clap::Args)]
struct QueryArgs {
    /// Query tree as JSON, `-` for stdin
    file: PathBuf,

    /// Target dialect: common, mysql or sqlite
    #[arg(short, long)]
    dialect: Option<Dialect>,

    /// Prefix every table name
    #[arg(short, long)]
    prefix: Option<String>,

    /// Qualify bare columns with their table
    #[arg(short, long)]
    explicit_tables: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query tree and print SQL with bindings
    Compile {
        #[command(flatten)]
        args: QueryArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Summarize a query tree and show the SQL it compiles to
    Explain {
        #[command(flatten)]
        args: QueryArgs,
    },
    /// Show how the dialects differ
    Dialects,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Compile { args, format } => run_compile(&cli, args, *format),
        Commands::Explain { args } => run_explain(&cli, args),
        Commands::Dialects => {
            show_dialects();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("SQLWEAVE_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file values with the command-line flags applied on top.
fn resolve_config(cli: &Cli, args: &QueryArgs) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dialect) = args.dialect {
        config = config.with_dialect(dialect);
    }
    if let Some(prefix) = &args.prefix {
        config = config.with_table_prefix(prefix.clone());
    }
    if args.explicit_tables {
        config = config.with_explicit_tables(true);
    }
    debug!(?config, "resolved config");
    Ok(config)
}

fn read_query(path: &Path) -> Result<Arc<Query>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read query from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    let query: Query = serde_json::from_str(&content)
        .with_context(|| format!("Invalid query tree in {}", path.display()))?;
    Ok(query.finish())
}

fn prepare(cli: &Cli, args: &QueryArgs) -> Result<(Config, Arc<Query>, Vec<Statement>)> {
    let config = resolve_config(cli, args)?;
    let query = config.apply(&read_query(&args.file)?);
    let statements = sqlweave::compile(&query, config.dialect)?;
    Ok((config, query, statements))
}

fn run_compile(cli: &Cli, args: &QueryArgs, format: OutputFormat) -> Result<()> {
    let (_, _, statements) = prepare(cli, args)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&statements)?);
        }
        OutputFormat::Text => {
            if statements.is_empty() {
                println!("{}", "(no statements)".dimmed());
            }
            for (i, statement) in statements.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_statement(statement);
            }
        }
    }
    Ok(())
}

fn print_statement(statement: &Statement) {
    println!("{}", statement.sql.white());
    if statement.bindings.is_empty() {
        return;
    }
    println!("{}", "Bindings:".cyan());
    let mut position = 0;
    for binding in statement.bindings.iter() {
        match &binding.name {
            Some(name) => println!("  :{} = {}", name, binding.value.to_string().yellow()),
            None => {
                position += 1;
                println!("  ?{} = {}", position, binding.value.to_string().yellow());
            }
        }
    }
}

fn run_explain(cli: &Cli, args: &QueryArgs) -> Result<()> {
    let (config, query, statements) = prepare(cli, args)?;

    println!("{}", "Query Tree:".green().bold());
    println!("  {} {}", "Kind:".dimmed(), query_kind(&query).cyan());
    if let Some(table) = &query.table {
        match &query.table_alias {
            Some(alias) => println!("  {} {} AS {}", "Table:".dimmed(), table, alias),
            None => println!("  {} {}", "Table:".dimmed(), table),
        }
    }
    if !query.select.is_empty() {
        println!("  {}", "Select:".dimmed());
        for item in &query.select {
            let value = match &item.value {
                Selectable::Column(column) => column.to_string(),
                Selectable::Aggregate(aggregate) => {
                    format!("{}({})", aggregate.function, aggregate.column)
                }
            };
            match &item.alias {
                Some(alias) => println!("    • {} AS {}", value.white(), alias),
                None => println!("    • {}", value.white()),
            }
        }
    }
    for join in &query.joins {
        println!(
            "  {} {} {} ({} criteria)",
            "Join:".dimmed(),
            join.kind.as_str().cyan(),
            join.table,
            join.criteria.len()
        );
    }
    if !query.criteria.is_empty() {
        println!("  {} {}", "Criteria:".dimmed(), query.criteria.len());
    }
    if !query.order.is_empty() {
        println!("  {}", "Order:".dimmed());
        for order in &query.order {
            println!("    • {}", order.to_string().white());
        }
    }
    if let Some(offset) = &query.offset {
        println!("  {} {}", "Offset:".dimmed(), offset);
    }
    if let Some(limit) = &query.limit {
        println!("  {} {}", "Limit:".dimmed(), limit);
    }

    println!();
    println!("{} ({})", "Generated SQL:".green().bold(), config.dialect);
    for statement in &statements {
        print_statement(statement);
    }
    Ok(())
}

fn query_kind(query: &Query) -> &'static str {
    if query.is_insert() {
        "INSERT"
    } else if query.is_update() {
        "UPDATE"
    } else if query.delete {
        "DELETE"
    } else {
        "SELECT"
    }
}

fn show_dialects() {
    println!("{}", "SQL Dialects".cyan().bold());
    println!();

    let rows = [
        ("Identifier quote", "\"name\"", "`name`", "\"name\""),
        ("Random order", "RANDOM()", "RAND()", "RANDOM()"),
        ("Explicit order", "CASE ... END", "FIELD(...)", "CASE ... END"),
        ("OFFSET / LIMIT", "OFFSET, LIMIT", "LIMIT, OFFSET", "LIMIT, OFFSET"),
        ("Aliased UPDATE/DELETE", "yes", "yes", "no"),
        ("Multi-row INSERT", "one statement", "one statement", "one per row"),
    ];

    println!(
        "{:24} {:16} {:16} {}",
        "Aspect".white().bold(),
        Dialect::Common.as_str().white().bold(),
        Dialect::MySql.as_str().white().bold(),
        Dialect::Sqlite.as_str().white().bold()
    );
    println!("{}", "─".repeat(72).dimmed());

    for (aspect, common, mysql, sqlite) in rows {
        println!(
            "{:24} {:16} {:16} {}",
            aspect.yellow(),
            common,
            mysql,
            sqlite
        );
    }
}
