//! Lendlog API server - REST front end over the lendlog database

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use lendlog::config::{self, DbConfig};
use lendlog::server;
use lendlog::storage::SqliteStore;
use lendlog::ui::{self, Icons};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "lendlog-server")]
#[command(version)]
#[command(about = "Serve the lendlog database as a JSON API under /api")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to the database file
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Directory served for any path outside /api
    #[arg(short, long)]
    static_dir: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    config::load_dotenv();
    let file_config = config::load_config(cli.config.as_deref())?;
    let db_config = DbConfig::from_env();
    tracing::debug!("Database settings: {}", db_config.describe());

    let database = config::resolve_database_path(cli.database, &db_config, file_config.as_ref());
    let port = config::resolve_port(cli.port, file_config.as_ref());
    let static_dir = config::resolve_static_dir(cli.static_dir, file_config.as_ref());
    config::ensure_db_dir(&database)?;

    let store = SqliteStore::open(&database)
        .with_context(|| format!("Failed to open database {}", database.display()))?;
    tracing::info!("Successfully connected to database! {}", store.stats()?);

    ui::header("Lendlog API");
    ui::status(Icons::DATABASE, "Database", &database.display().to_string());
    ui::status(Icons::GLOBE, "Listening", &format!("http://0.0.0.0:{}/api", port));
    if !static_dir.is_dir() {
        ui::warn(&format!("Static directory {} not found; only /api will answer", static_dir.display()));
    } else {
        ui::info("Static files", &static_dir.display().to_string());
    }

    server::start_server(port, store, &static_dir).await
}
