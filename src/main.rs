//! Lendlog console - lend things, take them back, add friends

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use lendlog::config::{self, DbConfig};
use lendlog::storage::SqliteStore;
use lendlog::ui::{self, Icons};
use lendlog::Session;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "lendlog")]
#[command(version)]
#[command(about = "Keep track of the things you lent to your friends")]
#[command(long_about = r#"
Interactive console over the lendlog database.

At the prompt, type one of:
  newfriend   add someone you lend things to
  give        record an item you lent
  takeback    record an item you got back
  quit        leave

The database is chosen by --database, then DB_NAME (from the environment
or .env), then lendlog.toml, then ./lendlog.db.
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to the database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the prompts
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    config::load_dotenv();
    let file_config = config::load_config(cli.config.as_deref())?;
    let db_config = DbConfig::from_env();
    tracing::debug!("Database settings: {}", db_config.describe());

    let database = config::resolve_database_path(cli.database, &db_config, file_config.as_ref());
    config::ensure_db_dir(&database)?;

    let store = SqliteStore::open(&database)
        .with_context(|| format!("Failed to open database {}", database.display()))?;
    ui::success("Successfully connected to database!");
    ui::status(Icons::DATABASE, "Database", &database.display().to_string());
    tracing::info!("{}", store.stats()?);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    Session::new(&store, stdin.lock(), stdout.lock()).run()?;

    Ok(())
}
