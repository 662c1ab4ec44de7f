//! json2sql: compile JSON query documents into SQL
//!
//! # Usage
//!
//! ```bash
//! # Show the SQL for a query
//! json2sql '{"queryType": "SELECT", "table": "users", "limit": 10}'
//!
//! # Read the query from a file and run it
//! json2sql --file query.json --database-url postgres://localhost/app
//!
//! # Pipe a query in and get the result envelope as JSON
//! cat query.json | json2sql --format json
//! ```

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;
use json2sql::parser::{Field, parse_with};
use json2sql::prelude::*;
use json2sql::service::compile_only;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "json2sql")]
#[command(version)]
#[command(about = "Compile JSON query documents into SQL", long_about = None)]
#[command(after_help = r#"EXAMPLES:
    json2sql '{"queryType": "SELECT", "table": "users", "columns": ["id", "email"]}'
    json2sql --file insert.json --dry-run
    json2sql explain '{"queryType": "DELETE", "table": "sessions"}'"#)]
struct Cli {
    /// The JSON query to compile (read from --file or stdin when omitted)
    query: Option<String>,

    /// Read the JSON query from a file
    #[arg(short = 'i', long = "file")]
    file: Option<PathBuf>,

    /// Don't execute, just show the generated SQL
    #[arg(short, long)]
    dry_run: bool,

    /// Output format (defaults to the config file, then "table")
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Database connection URL
    #[arg(long, env = "JSON2SQL_DATABASE_URL")]
    database_url: Option<String>,

    /// Config file (defaults to ./json2sql.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a query is understood and the SQL it produces
    Explain {
        /// The JSON query to explain
        query: String,
    },
    /// Show the recognized query fields
    Fields,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match &cli.command {
        Some(Commands::Explain { query }) => explain_query(query, &cli),
        Some(Commands::Fields) => {
            show_fields();
            Ok(true)
        }
        None => run(&cli).await,
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "json2sql=info" } else { "json2sql=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Compile (and maybe execute) one query. `Ok(false)` means the query was
/// rejected and the result already printed.
async fn run(cli: &Cli) -> anyhow::Result<bool> {
    let config = Config::load(cli.config.as_deref())?;
    let Some(input) = read_input(cli)? else {
        println!("{}", "json2sql: JSON query documents to SQL".cyan().bold());
        println!();
        println!("Usage: json2sql <QUERY> [OPTIONS]");
        println!();
        println!("Try: json2sql --help");
        return Ok(true);
    };

    let format = cli.format.unwrap_or(config.output.format);
    let options = config.build_options();
    let database_url = cli.database_url.clone().or(config.database_url.clone());

    if cli.verbose {
        eprintln!("{} {}", "Input:".dimmed(), input.trim().yellow());
    }

    // Dry run or no database URL - just show SQL
    let Some(db_url) = database_url.filter(|_| !cli.dry_run) else {
        let result = compile_only(&input, &options);
        print_result(&result, format, false)?;
        if !cli.dry_run && result.successful && format == OutputFormat::Table {
            println!();
            println!(
                "{}",
                "⚠ No database URL. Use --database-url or set JSON2SQL_DATABASE_URL".yellow()
            );
        }
        return Ok(result.successful);
    };

    if cli.verbose {
        eprintln!("{} {}", "Connecting to:".dimmed(), db_url);
    }
    let db = Database::connect(&db_url).await?;
    let service = QueryService::with_options(db, options);
    let result = service.run(&input).await;
    print_result(&result, format, true)?;
    Ok(result.successful)
}

/// The query text from the argument, `--file`, or piped stdin.
fn read_input(cli: &Cli) -> anyhow::Result<Option<String>> {
    if let Some(query) = &cli.query {
        return Ok(Some(query.clone()));
    }
    if let Some(path) = &cli.file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return Ok(Some(content));
    }
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut content = String::new();
    stdin.read_to_string(&mut content).context("failed to read stdin")?;
    Ok(Some(content).filter(|c| !c.trim().is_empty()))
}

fn print_result(result: &QueryResult, format: OutputFormat, executed: bool) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Sql => match &result.query {
            Some(sql) if result.successful => println!("{}", sql),
            _ => eprintln!("{}", result.message),
        },
        OutputFormat::Table => {
            if let Some(sql) = &result.query {
                println!("{}", "Generated SQL:".green().bold());
                println!("{}", sql.white());
            }
            if !result.successful {
                eprintln!("{} {}", "✗".red(), result.message.red());
                return Ok(());
            }
            if !executed {
                return Ok(());
            }
            println!();
            if result.operation.as_deref() == Some("SELECT") {
                format_rows(&result.results);
            } else {
                println!("{} {} rows affected", "✓".green(), result.rows_affected);
            }
        }
    }
    Ok(())
}

fn format_rows(results: &[Row]) {
    if results.is_empty() {
        println!("{}", "(no results)".dimmed());
        return;
    }

    // Get column names from first row
    let columns: Vec<&String> = results[0].keys().collect();

    // Calculate column widths
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in results {
        for (i, col) in columns.iter().enumerate() {
            let len = row.get(*col).map(val_to_string).unwrap_or_default().chars().count();
            widths[i] = widths[i].max(len);
        }
    }

    // Print header
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:width$}", c, width = *w))
        .collect();
    println!("{}", header.join(" │ ").white().bold());

    // Print separator
    let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    println!("{}", sep.join("─┼─").dimmed());

    // Print rows
    for row in results {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| {
                let val = row.get(*c).map(val_to_string).unwrap_or_default();
                format!("{:width$}", val, width = *w)
            })
            .collect();
        println!("{}", cells.join(" │ "));
    }

    println!();
    println!("{} row(s) returned", results.len().to_string().cyan());
}

fn val_to_string(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => val.to_string(),
    }
}

fn explain_query(query: &str, cli: &Cli) -> anyhow::Result<bool> {
    let config = Config::load(cli.config.as_deref())?;

    println!("{}", "json2sql Query Explanation".cyan().bold());
    println!();
    println!("{} {}", "Query:".dimmed(), query.trim().yellow());
    println!();

    let spec = match parse_with(query, &config.build_options()) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("{} {}", "Decode Error:".red().bold(), e);
            return Ok(false);
        }
    };

    println!("{}", "Parsed Structure:".green().bold());
    let unset = || "(unset)".dimmed().to_string();
    println!(
        "  {} {}",
        "Operation:".dimmed(),
        spec.query_type.as_ref().map(|t| t.to_string().cyan().to_string()).unwrap_or_else(unset)
    );
    println!(
        "  {} {}",
        "Table:".dimmed(),
        spec.table.as_deref().map(|t| t.white().to_string()).unwrap_or_else(unset)
    );
    print_list("Columns:", spec.columns.as_deref());
    print_list("Values:", spec.values.as_deref());
    print_list("Conditions:", spec.conditions.as_deref());
    print_list("Group By:", spec.group_by.as_deref());
    print_list("Order By:", spec.order_by.as_deref());
    if let Some(limit) = spec.limit {
        println!("  {} {}", "Limit:".dimmed(), limit.to_string().white());
    }

    println!();
    match spec.generate() {
        Ok(sql) => {
            println!("{}", "Generated SQL:".green().bold());
            println!("  {}", sql.white());
            Ok(true)
        }
        Err(e) => {
            println!("{}", "Diagnostic:".red().bold());
            println!("  {}", e.to_string().red());
            Ok(false)
        }
    }
}

fn print_list<T: std::fmt::Display>(label: &str, items: Option<&[T]>) {
    let Some(items) = items else { return };
    println!("  {}", label.dimmed());
    if items.is_empty() {
        println!("    {}", "(empty)".dimmed());
    }
    for item in items {
        println!("    • {}", item.to_string().white());
    }
}

fn show_fields() {
    println!("{}", "json2sql Query Fields".cyan().bold());
    println!();

    println!(
        "{:12} {:44} {}",
        "Field".white().bold(),
        "Shape".white().bold(),
        "SQL".white().bold()
    );
    println!("{}", "─".repeat(80).dimmed());

    for field in Field::ALL {
        let (shape, sql) = match field {
            Field::QueryType => (
                "\"SELECT\" | \"INSERT\" | \"UPDATE\" | \"DELETE\"",
                "statement kind",
            ),
            Field::Table => ("string", "FROM / INTO / UPDATE table"),
            Field::Columns => ("[string, ...]", "select list / insert columns"),
            Field::Values => ("[{col: value, ...}] | [{col: value}, ...]", "VALUES / SET"),
            Field::Conditions => ("[{column, operator, value}, ...]", "WHERE ... AND ..."),
            Field::OrderBy => ("[{column, direction}, ...]", "ORDER BY"),
            Field::GroupBy => ("[string, ...]", "GROUP BY"),
            Field::Limit => ("number | null", "LIMIT"),
        };
        println!(
            "{:12} {:44} {}",
            field.key().cyan().bold(),
            shape.yellow(),
            sql.dimmed()
        );
    }
}
