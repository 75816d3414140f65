//! schemadef CLI
//!
//! Command-line tool for declarative schema migrations.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use schemadef::prelude::*;
use schemadef_core::{build_schema, diff, parse_ddls};

/// Declarative schema migrations.
#[derive(Parser)]
#[command(name = "schemadef")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (`sqlite:` connection string).
    #[arg(short, long, env = "DATABASE_URL")]
    database: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate the database to a desired schema.
    Apply {
        /// File with the desired schema.
        #[arg(short, long)]
        file: PathBuf,

        /// Show DDL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the live schema.
    Export {
        /// Print the parsed schema as JSON instead of DDL.
        #[arg(long)]
        json: bool,
    },

    /// Diff schema files without a database.
    Diff {
        /// SQL dialect of both files.
        #[arg(long)]
        dialect: String,

        /// File with the desired schema.
        #[arg(long)]
        desired: PathBuf,

        /// File with the current schema (empty schema if not specified).
        #[arg(long)]
        current: Option<PathBuf>,

        /// Print the schema operations as JSON instead of DDL.
        #[arg(long)]
        json: bool,
    },
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

async fn connect(database: Option<&str>) -> anyhow::Result<SqliteAdapter> {
    let url = database.context("A database URL is required (--database or DATABASE_URL)")?;
    Ok(SqliteAdapter::connect(url).await?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Apply { file, dry_run } => {
            let desired = read(&file)?;
            let migrator = Migrator::new(connect(cli.database.as_deref()).await?).dry_run(dry_run);
            if dry_run {
                info!("Dry run mode - DDL will be printed but not executed.");
            }
            let ddls = migrator.apply(&desired).await?;
            if ddls.is_empty() {
                println!("-- Nothing is modified --");
            } else {
                print!("{}", join_ddls(&ddls));
            }
        }

        Commands::Export { json } => {
            let adapter = connect(cli.database.as_deref()).await?;
            let dump = adapter.dump_schema_as_ddl().await?;
            if json {
                let dialect = adapter.dialect();
                let schema = build_schema(dialect, &parse_ddls(dialect, &dump)?)?;
                println!("{}", serde_json::to_string_pretty(&schema)?);
            } else if dump.is_empty() {
                println!("-- No table exists --");
            } else {
                print!("{dump}");
            }
        }

        Commands::Diff {
            dialect,
            desired,
            current,
            json,
        } => {
            let dialect: Dialect = dialect.parse()?;
            let desired = read(&desired)?;
            let current = current.as_deref().map(read).transpose()?.unwrap_or_default();
            let desired = build_schema(dialect, &parse_ddls(dialect, &desired)?)?;
            let current = build_schema(dialect, &parse_ddls(dialect, &current)?)?;
            let ops = diff(&current, &desired);
            if json {
                println!("{}", serde_json::to_string_pretty(&ops)?);
            } else {
                print!("{}", join_ddls(&schemadef_core::generate(dialect, &ops)?));
            }
        }
    }

    Ok(())
}
