use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use ledger_projection::{
    insert_snapshot, load_snapshot, open_read_only, query_account, query_accounts,
    query_accounts_signed_by, query_data_entries, query_signers, query_trustlines,
    query_trustlines_with_native, setup_database, Config, OutputFormat, VERSION,
};

#[derive(Parser)]
#[command(
    name = "ledger-projection",
    about = "Read decoded ledger entries out of a SQLite ledger database",
    version = VERSION
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Ledger database (overrides LEDGER_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Output format (overrides LEDGER_OUTPUT)
    #[arg(long, global = true)]
    format: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Command {
    /// Load a JSON snapshot of stored rows into the database
    Import { snapshot: PathBuf },
    #[command(flatten)]
    Query(QueryCommand),
}

#[derive(Subcommand)]
enum QueryCommand {
    /// Show one account
    Account { id: String },
    /// Show accounts, one bucket per id
    Accounts {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show trustlines of each account
    Trustlines {
        #[arg(required = true)]
        ids: Vec<String>,
        /// Prepend the native balance line
        #[arg(long)]
        native: bool,
    },
    /// Show signers of each account
    Signers {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show data entries of each account
    Data {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Show the account of a key and the accounts it signs for
    SignedBy {
        public_key: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?.with_overrides(cli.db, cli.format);

    match cli.command {
        Command::Import { snapshot } => run_import(&config, &snapshot),
        Command::Query(command) => run_query(&config, command),
    }
}

fn run_import(config: &Config, snapshot_path: &Path) -> Result<()> {
    let snapshot = load_snapshot(snapshot_path)
        .with_context(|| format!("Failed to load snapshot {}", snapshot_path.display()))?;

    let conn = Connection::open(&config.db_path)
        .with_context(|| format!("Failed to open {}", config.db_path.display()))?;
    setup_database(&conn)?;

    let stats = insert_snapshot(&conn, &snapshot)?;
    println!("✓ Inserted: {} rows", stats.inserted);
    println!("✓ Skipped duplicates: {}", stats.duplicates);

    Ok(())
}

fn run_query(config: &Config, command: QueryCommand) -> Result<()> {
    let conn = open_read_only(&config.db_path)
        .with_context(|| "Run `ledger-projection import <snapshot.json>` first")?;

    match command {
        QueryCommand::Account { id } => {
            let account = query_account(&conn, &id)?;
            print_one(config.output, &id, &account)
        }
        QueryCommand::Accounts { ids } => print_buckets(config.output, &ids, &query_accounts(&conn, &ids)?),
        QueryCommand::Trustlines { ids, native } => {
            let buckets = if native {
                query_trustlines_with_native(&conn, &ids)?
            } else {
                query_trustlines(&conn, &ids)?
            };
            print_buckets(config.output, &ids, &buckets)
        }
        QueryCommand::Signers { ids } => print_buckets(config.output, &ids, &query_signers(&conn, &ids)?),
        QueryCommand::Data { ids } => print_buckets(config.output, &ids, &query_data_entries(&conn, &ids)?),
        QueryCommand::SignedBy { public_key, limit } => {
            let accounts = query_accounts_signed_by(&conn, &public_key, limit)?;
            print_buckets(config.output, &[public_key], &[accounts])
        }
    }
}

fn print_one<T: Serialize>(format: OutputFormat, id: &str, value: &Option<T>) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => match value {
            Some(v) => println!("{}: {}", id, serde_json::to_string(v)?),
            None => println!("{}: not found", id),
        },
    }
    Ok(())
}

fn print_buckets<T: Serialize>(format: OutputFormat, ids: &[String], buckets: &[Vec<T>]) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(buckets)?),
        OutputFormat::Text => {
            for (id, bucket) in ids.iter().zip(buckets) {
                println!("{} ({} entries)", id, bucket.len());
                for entry in bucket {
                    println!("  {}", serde_json::to_string(entry)?);
                }
            }
        }
    }
    Ok(())
}
