// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Command-line access to a rowkit store.
//!
//! ```bash
//! rowkit --config store.toml init
//! rowkit select users --where "active = ?" --arg 1 --order-by name
//! ROWKIT_CONFIG=store.toml rowkit delete users --where "id = ?" --arg 3
//! ```

use std::io::{Write, stdout};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rowkit_db::{DbHelper, DbManager, OpenMode, SchemaCreation, SelectParams, StoreConfig, Value};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod error;
mod output;

use error::{CliError, IoContext};

#[derive(Parser, Debug)]
#[command(name = "rowkit", version, about = "Inspect and edit a rowkit store")]
struct Cli {
    /// Store configuration file
    #[arg(long, value_name = "FILE", env = "ROWKIT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the store and its tables if absent
    Init,
    /// Print matching rows as JSON lines
    Select {
        table: String,

        /// Column or expression to return; repeat for several
        #[arg(short, long = "column")]
        columns: Vec<String>,

        #[command(flatten)]
        filter: Filter,

        #[arg(long)]
        group_by: Option<String>,

        #[arg(long)]
        having: Option<String>,

        #[arg(long)]
        order_by: Option<String>,

        #[arg(long)]
        limit: Option<String>,

        /// Open mode
        #[arg(long, default_value = "read-only")]
        mode: OpenMode,
    },
    /// Print the number of matching rows
    Count {
        table: String,

        #[command(flatten)]
        filter: Filter,
    },
    /// Delete matching rows and print how many were removed
    Delete {
        table: String,

        #[command(flatten)]
        filter: Filter,
    },
}

#[derive(Args, Debug)]
struct Filter {
    /// Where clause without the WHERE keyword
    #[arg(short, long = "where")]
    selection: Option<String>,

    /// Value bound to the next `?` placeholder
    #[arg(short, long = "arg")]
    args: Vec<String>,
}

impl Filter {
    fn values(&self) -> Vec<Value> {
        self.args.iter().map(|a| output::parse_arg(a)).collect()
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => StoreConfig::from_file(path)?,
        None => StoreConfig::default(),
    };
    init_logging(&config.log_level);

    let mut db = DbManager::new(DbHelper::from_config(&config)?);
    match cli.command {
        Command::Init => {
            db.open(OpenMode::ReadWrite)?;
            match db.helper().last_creation() {
                Some(SchemaCreation::Complete { statements }) => {
                    info!("Created {} with {statements} statements", config.path().display());
                }
                Some(SchemaCreation::Incomplete {
                    executed,
                    failed_statement,
                    reason,
                }) => {
                    eprintln!(
                        "Table creation stopped after {executed} statements at `{failed_statement}`: {reason}"
                    );
                }
                None => info!("Store {} already exists", config.path().display()),
            }
            db.close()?;
        }
        Command::Select {
            table,
            columns,
            filter,
            group_by,
            having,
            order_by,
            limit,
            mode,
        } => {
            db.open(mode)?;
            let params = SelectParams {
                table,
                columns,
                selection_args: filter.values(),
                selection: filter.selection,
                group_by,
                having,
                order_by,
                limit,
            };
            let rows = db.select(&params)?;
            let mut out = stdout().lock();
            output::write_rows(&mut out, &rows)?;
            out.flush().io_context(|| "Failed to flush stdout".to_string())?;
        }
        Command::Count { table, filter } => {
            db.open(OpenMode::ReadOnly)?;
            let count = db.count(&table, filter.selection.as_deref(), &filter.values())?;
            println!("{count}");
        }
        Command::Delete { table, filter } => {
            db.open(OpenMode::ReadWrite)?;
            let deleted = db.delete(&table, filter.selection.as_deref(), &filter.values())?;
            println!("{deleted}");
        }
    }
    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
