use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use embedding_migrate_core::ChangeSet;
use embedding_migrate_sqlite::Migrator;

#[derive(Debug, Parser)]
#[command(name = "embed-migrate")]
#[command(about = "Idempotent additive schema migrations for SQLite")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply the change set to the database.
    Apply(DbArgs),
    /// Print the SQL statements an apply run would execute.
    Plan(DbArgs),
    /// Show which declared columns and indexes are present.
    Status(DbArgs),
    /// Write the built-in change set as JSON, as a starting point for custom sets.
    Init(InitArgs),
}

#[derive(Debug, Args)]
struct DbArgs {
    /// Database file path.
    #[arg(long)]
    db: PathBuf,
    /// Change-set JSON file (defaults to the built-in news_items embedding set).
    #[arg(long)]
    changes: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct InitArgs {
    /// Output JSON path.
    #[arg(long)]
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Apply(args) => run_apply(args),
        Command::Plan(args) => run_plan(args),
        Command::Status(args) => run_status(args),
        Command::Init(args) => run_init(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn load_change_set(path: &Option<PathBuf>) -> Result<ChangeSet, String> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
            ChangeSet::from_json_str(&raw)
                .map_err(|err| format!("Invalid change set '{}': {err}", path.display()))
        }
        None => Ok(ChangeSet::news_items_embedding()),
    }
}

fn open_migrator(args: &DbArgs) -> Result<Migrator, String> {
    let set = load_change_set(&args.changes)?;
    Migrator::open(&args.db, set).map_err(|err| err.to_string())
}

fn run_apply(args: DbArgs) -> Result<(), String> {
    let mut migrator = open_migrator(&args)?;
    let report = migrator.apply().map_err(|err| err.to_string())?;

    if report.is_noop() {
        println!("Already up to date.");
    } else {
        println!(
            "Applied: {} column(s), {} index(es), {} comment(s).",
            report.columns_added, report.indexes_created, report.comments_written
        );
    }
    Ok(())
}

fn run_plan(args: DbArgs) -> Result<(), String> {
    let migrator = open_migrator(&args)?;
    let statements = migrator.plan().map_err(|err| err.to_string())?;

    if statements.is_empty() {
        println!("Nothing to do.");
    } else {
        for statement in statements {
            println!("{statement}");
        }
    }
    Ok(())
}

fn run_status(args: DbArgs) -> Result<(), String> {
    let migrator = open_migrator(&args)?;
    let status = migrator.status().map_err(|err| err.to_string())?;

    let table = &migrator.change_set().table;
    if !status.table_exists {
        println!("Table '{table}' does not exist.");
        return Ok(());
    }

    println!("Table '{table}':");
    for column in &status.columns_present {
        println!("  column {column}: present");
    }
    for column in &status.columns_missing {
        println!("  column {column}: missing");
    }
    for index in &status.indexes_present {
        println!("  index {index}: present");
    }
    for index in &status.indexes_missing {
        println!("  index {index}: missing");
    }
    println!(
        "Fully applied: {}",
        if status.fully_applied() { "yes" } else { "no" }
    );
    Ok(())
}

fn run_init(args: InitArgs) -> Result<(), String> {
    let set = ChangeSet::news_items_embedding();
    let json = set
        .to_json_string_pretty()
        .map_err(|err| err.to_string())?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }
    fs::write(&args.output, json)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;

    println!("Wrote change set to '{}'.", args.output.display());
    Ok(())
}
