use super::catalog::CatalogEntry;
use super::path_safety::resolve_within;
use crate::ingest::IMAGES_DIR_NAME;

/// Problems found with an entry's on-disk layout; empty when the entry is healthy.
pub fn check_entry(entry: &CatalogEntry) -> Vec<String> {
    let mut problems = Vec::new();

    match resolve_within(&entry.entry_dir, &entry.meta.zip_file) {
        None => problems.push(format!(
            "zipFile {:?} points outside {}",
            entry.meta.zip_file,
            entry.entry_dir.display()
        )),
        Some(path) if !path.is_file() => {
            problems.push(format!("archive missing: {}", path.display()))
        }
        Some(_) => {}
    }

    if !entry.entry_dir.join(IMAGES_DIR_NAME).is_dir() {
        problems.push(format!("no {}/ directory", IMAGES_DIR_NAME));
    }

    problems
}
