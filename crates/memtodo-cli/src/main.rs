use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use memtodo_cli::{Shell, activity, setup};
use memtodo_core::{Config, SharedStore};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// memtodo - an in-memory todo list
#[derive(Parser)]
#[command(name = "memtodo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a config file (defaults to ~/.config/memtodo/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Log store activity at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(config: &Config, verbose: bool) {
    let directive = if verbose {
        "debug".to_string()
    } else {
        config.log_filter()
    };
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).with_target(true))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init_config {
        let path = setup::init_config(cli.config.as_deref())?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let config = setup::load_config(cli.config.as_deref())?;

    init_tracing(&config, cli.verbose);
    tracing::debug!(?config, "configuration loaded");

    let store = SharedStore::default();
    let logger = tokio::spawn(activity::log_events(store.subscribe_events()));

    // The shell reads stdin synchronously.
    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        let mut shell = Shell::new(store, config, io::stdout());
        shell.run(stdin.lock())
    })
    .await
    .context("Shell task panicked")??;

    let logged = logger.await.context("Activity logger panicked")?;
    tracing::debug!(logged, "shutting down");

    Ok(())
}
