//! Watch mode: run one ingestion pass, then re-run whenever the inbox changes.
//!
//! Raw notify events are debounced on a dedicated thread and forwarded as triggers to
//! the [`scheduler`], which keeps at most one pass in flight and folds triggers that
//! arrive mid-pass into a single follow-up pass.

pub mod scheduler;
mod watcher;

pub use scheduler::{drive, RunGate, RunState, Transition};
pub use watcher::Debouncer;

use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::error::{Result, VaultError};
use crate::ingest::{run_batch, BatchSummary};

/// Log lines for a pass outcome, each with the level it is emitted at.
///
/// Failed items are warnings, everything else in a summary is info. An aborted pass
/// is a single error line.
pub fn pass_report(result: &Result<BatchSummary>) -> Vec<(log::Level, String)> {
    match result {
        Ok(summary) => summary
            .report_lines()
            .into_iter()
            .map(|line| {
                if line.starts_with("- FAILED") {
                    (log::Level::Warn, line)
                } else {
                    (log::Level::Info, line)
                }
            })
            .collect(),
        Err(e) => vec![(log::Level::Error, format!("ingestion pass aborted: {}", e))],
    }
}

/// Emit a pass outcome through the logger.
pub fn log_pass(result: &Result<BatchSummary>) {
    for (level, line) in pass_report(result) {
        log::log!(level, "{}", line);
    }
}

/// Run the watcher until the notify thread exits.
///
/// The first pass runs to completion before any filesystem event is considered.
pub async fn run_watcher(inbox_dir: PathBuf, store_dir: PathBuf, debounce_ms: u64) -> Result<()> {
    let first = {
        let inbox = inbox_dir.clone();
        let store = store_dir.clone();
        tokio::task::spawn_blocking(move || run_batch(&inbox, &store))
            .await
            .map_err(|e| VaultError::Watch(format!("initial pass join: {}", e)))?
    };
    log_pass(&first);
    // The inbox must exist before notify can watch it.
    std::fs::create_dir_all(&inbox_dir)?;

    log::info!("Watching {} for new .zip files...", inbox_dir.display());

    let (tx, rx) = mpsc::unbounded_channel();
    let watch_root = inbox_dir.clone();
    let watcher_thread = std::thread::spawn(move || {
        let res = watcher::run_watcher_thread(&watch_root, debounce_ms, tx);
        if let Err(e) = &res {
            log::error!("watcher thread error: {}", e);
        }
        res
    });

    let passes = drive(
        rx,
        move || run_batch(&inbox_dir, &store_dir),
        |result| log_pass(&result),
    )
    .await;
    log::info!("watch: stopped after {} triggered pass(es)", passes);

    tokio::task::spawn_blocking(move || watcher_thread.join())
        .await
        .map_err(|e| VaultError::Watch(format!("watcher task join: {}", e)))?
        .map_err(|_| VaultError::Watch("watcher thread panicked".to_string()))?
}
