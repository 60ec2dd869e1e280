//! One ingestion pass over the inbox.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::item::{ingest_item, IngestedEntry};
use super::relocate::{FileOps, StdFileOps};
use super::scanner::discover_inbox;
use crate::error::{Result, VaultError};

/// An inbox file that could not be ingested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestFailure {
    pub file: String,
    pub error: String,
}

/// Outcome of one pass: every eligible file ends up in exactly one of the two lists.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub inbox_dir: PathBuf,
    pub store_dir: PathBuf,
    pub created: Vec<IngestedEntry>,
    pub failed: Vec<IngestFailure>,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.failed.is_empty()
    }

    /// Human-readable report, one line per item.
    pub fn report_lines(&self) -> Vec<String> {
        if self.is_empty() {
            return vec![format!(
                "Ingest summary: no .zip files found in {}.",
                self.inbox_dir.display()
            )];
        }

        let mut lines = Vec::with_capacity(1 + self.created.len() + self.failed.len());
        lines.push(format!(
            "Ingest summary: {} created, {} failed.",
            self.created.len(),
            self.failed.len()
        ));
        for item in &self.created {
            lines.push(format!(
                "- {} -> {}/",
                item.source,
                self.store_dir.join(&item.slug).display()
            ));
        }
        for item in &self.failed {
            lines.push(format!("- FAILED {}: {}", item.file, item.error));
        }
        lines
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.report_lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| {
        VaultError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to create {}: {}", dir.display(), e),
        ))
    })
}

/// Ingest everything currently in `inbox_dir` into `store_dir`.
pub fn run_batch(inbox_dir: &Path, store_dir: &Path) -> Result<BatchSummary> {
    run_batch_with(inbox_dir, store_dir, &StdFileOps)
}

/// [`run_batch`] with explicit filesystem primitives for the move step.
///
/// Files are processed one at a time in sorted order; slug allocation relies on this.
/// A failing item is recorded and the pass moves on. Only failures to prepare the two
/// root directories or to list the inbox abort the pass.
pub fn run_batch_with(inbox_dir: &Path, store_dir: &Path, ops: &impl FileOps) -> Result<BatchSummary> {
    ensure_dir(inbox_dir)?;
    ensure_dir(store_dir)?;

    let items = discover_inbox(inbox_dir)?;
    let mut summary = BatchSummary {
        inbox_dir: inbox_dir.to_path_buf(),
        store_dir: store_dir.to_path_buf(),
        ..Default::default()
    };

    if items.is_empty() {
        log::debug!("No archives in {}", inbox_dir.display());
        return Ok(summary);
    }

    let total = items.len();
    let start = Instant::now();

    for (idx, item) in items.iter().enumerate() {
        log::info!("[{}/{}] Processing: {}", idx + 1, total, item.file_name);

        match ingest_item(store_dir, item, ops) {
            Ok(entry) => {
                log::info!("✓ {} -> {}", entry.source, entry.slug);
                summary.created.push(entry);
            }
            Err(e) => {
                log::error!("✗ {}: {}", item.file_name, e);
                summary.failed.push(IngestFailure {
                    file: item.file_name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "Ingest pass finished in {:?} ({} created, {} failed)",
        start.elapsed(),
        summary.created.len(),
        summary.failed.len()
    );
    Ok(summary)
}
