use feruca::{Collator, Locale, Tailoring};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, VaultError};

/// Extension (lowercase, with dot) of files the inbox accepts.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// An archive waiting in the inbox
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboxItem {
    pub file_name: String,
    pub file_path: PathBuf,
}

impl InboxItem {
    /// File name with the archive extension removed.
    pub fn stem(&self) -> &str {
        archive_stem(&self.file_name)
    }
}

/// Whether `file_name` ends in the archive extension, ignoring case.
pub fn is_archive_name(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(ARCHIVE_EXTENSION)
}

/// Strip a trailing archive extension (any case) from `file_name`.
pub fn archive_stem(file_name: &str) -> &str {
    let cut = file_name.len().saturating_sub(ARCHIVE_EXTENSION.len());
    match file_name.get(cut..) {
        Some(tail) if tail.eq_ignore_ascii_case(ARCHIVE_EXTENSION) => &file_name[..cut],
        _ => file_name,
    }
}

/// Root-locale (CLDR) collator with punctuation weighted, not ignored. Equal keys fall
/// back to byte order so the processing order is total.
fn file_name_collator() -> Collator {
    Collator::new(Tailoring::Cldr(Locale::Root), false, true)
}

/// Processing order for inbox files: Unicode collation for the root locale, so `_`
/// sorts before `-` and lowercase before uppercase of the same letter.
pub fn compare_file_names(a: &str, b: &str) -> Ordering {
    file_name_collator().collate(a, b)
}

/// List the archives sitting directly in `inbox` (no recursion), sorted for processing.
///
/// Only regular files count: directories and symlinks are skipped, as are names that are
/// not valid UTF-8.
pub fn discover_inbox(inbox: &Path) -> Result<Vec<InboxItem>> {
    let mut items = Vec::new();

    for entry in WalkDir::new(inbox).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            VaultError::Io(std::io::Error::other(format!(
                "Failed to list {}: {}",
                inbox.display(),
                e
            )))
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file_name) = entry.file_name().to_str() else {
            log::warn!("Skipping non UTF-8 file name in inbox: {}", entry.path().display());
            continue;
        };

        if !is_archive_name(file_name) {
            continue;
        }

        items.push(InboxItem {
            file_name: file_name.to_string(),
            file_path: entry.path().to_path_buf(),
        });
    }

    let mut collator = file_name_collator();
    items.sort_by(|a, b| collator.collate(a.file_name.as_str(), b.file_name.as_str()));
    log::debug!("Discovered {} archive(s) in {}", items.len(), inbox.display());
    Ok(items)
}
