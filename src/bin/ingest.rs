use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tplvault::ingest::run_batch;
use tplvault::watch::run_watcher;
use tplvault::config::ConfigOverrides;
use tplvault::Config;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Turn .zip archives dropped in the inbox into template entries")]
struct Args {
    /// Keep running and re-ingest whenever the inbox changes
    #[arg(short, long)]
    watch: bool,

    /// Inbox directory (overrides vault.inbox_dir)
    #[arg(long)]
    inbox: Option<PathBuf>,

    /// Destination store directory (overrides vault.store_dir)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Quiet window in milliseconds before a burst of inbox events triggers a pass
    #[arg(long)]
    debounce_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config = Config::load()?;
    config.apply_overrides(ConfigOverrides {
        inbox_dir: args.inbox,
        store_dir: args.store,
        debounce_ms: args.debounce_ms,
        port: None,
    })?;

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.vault.log_level.as_str()),
    )
    .init();

    log::info!("Inbox: {}", config.inbox_dir().display());
    log::info!("Store: {}", config.store_dir().display());

    if args.watch {
        log::info!("Mode: watch (debounce {} ms)", config.watch.debounce_ms);
        run_watcher(
            config.inbox_dir().to_path_buf(),
            config.store_dir().to_path_buf(),
            config.watch.debounce_ms,
        )
        .await?;
        return Ok(ExitCode::SUCCESS);
    }

    let summary = run_batch(config.inbox_dir(), config.store_dir())
        .context("Ingestion pass aborted")?;
    print!("{}", summary);

    if summary.has_failures() {
        log::warn!("Some archives failed to ingest. They remain in the inbox for the next run.");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
