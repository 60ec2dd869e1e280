use std::path::{Path, PathBuf};

use super::entry::{render_stub, ENTRY_FILE_NAME, IMAGES_DIR_NAME, SOURCE_ARCHIVE_NAME};
use super::naming::{humanize, slugify};
use super::relocate::{relocate, FileOps, Relocation};
use super::scanner::InboxItem;
use super::slug::allocate_slug;
use crate::error::{Result, VaultError};

/// A successfully materialized entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedEntry {
    pub slug: String,
    pub title: String,
    /// Inbox file name the entry was created from.
    pub source: String,
    pub entry_dir: PathBuf,
    pub entry_path: PathBuf,
    pub zip_target: PathBuf,
    pub relocation: Relocation,
}

/// Turn one inbox archive into an entry under `store_dir`.
///
/// Steps run in order and the first failure aborts the item. Nothing is rolled back: a
/// directory created before a failed move stays in place, and the archive stays in the
/// inbox for a later pass.
pub fn ingest_item(store_dir: &Path, item: &InboxItem, ops: &impl FileOps) -> Result<IngestedEntry> {
    let stem = item.stem();
    let slug = allocate_slug(store_dir, &slugify(stem))?;
    let title = humanize(stem);

    let entry_dir = store_dir.join(&slug);
    let images_dir = entry_dir.join(IMAGES_DIR_NAME);
    let zip_target = entry_dir.join(SOURCE_ARCHIVE_NAME);
    let entry_path = entry_dir.join(ENTRY_FILE_NAME);

    std::fs::create_dir_all(&images_dir).map_err(|e| {
        VaultError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to create {}: {}", images_dir.display(), e),
        ))
    })?;

    let relocation = relocate(ops, &item.file_path, &zip_target)?;

    std::fs::write(&entry_path, render_stub(&title)).map_err(|e| {
        VaultError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to write {}: {}", entry_path.display(), e),
        ))
    })?;

    Ok(IngestedEntry {
        slug,
        title,
        source: item.file_name.clone(),
        entry_dir,
        entry_path,
        zip_target,
        relocation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::relocate::StdFileOps;
    use std::fs;
    use tempfile::TempDir;

    fn drop_archive(inbox: &Path, name: &str, bytes: &[u8]) -> InboxItem {
        let file_path = inbox.join(name);
        fs::write(&file_path, bytes).unwrap();
        InboxItem {
            file_name: name.to_string(),
            file_path,
        }
    }

    #[test]
    fn test_ingest_item_materializes_entry() {
        let inbox = TempDir::new().unwrap();
        let store = TempDir::new().unwrap();
        let item = drop_archive(inbox.path(), "Café_Landing.zip", b"PK-landing");

        let entry = ingest_item(store.path(), &item, &StdFileOps).unwrap();

        assert_eq!(entry.slug, "cafe-landing");
        assert_eq!(entry.title, "Café Landing");
        assert_eq!(entry.source, "Café_Landing.zip");
        assert_eq!(entry.relocation, Relocation::Renamed);
        assert_eq!(entry.entry_dir, store.path().join("cafe-landing"));
        assert!(entry.entry_dir.join("images").is_dir());
        assert_eq!(fs::read(&entry.zip_target).unwrap(), b"PK-landing");
        assert!(fs::read_to_string(&entry.entry_path)
            .unwrap()
            .contains("title: \"Café Landing\""));
        assert!(!item.file_path.exists());
    }

    #[test]
    fn test_ingest_item_collision_gets_suffix() {
        let inbox = TempDir::new().unwrap();
        let store = TempDir::new().unwrap();
        fs::create_dir(store.path().join("portfolio")).unwrap();
        let item = drop_archive(inbox.path(), "portfolio.zip", b"PK");

        let entry = ingest_item(store.path(), &item, &StdFileOps).unwrap();
        assert_eq!(entry.slug, "portfolio-2");
        assert!(store.path().join("portfolio-2/source.zip").exists());
    }

    #[test]
    fn test_ingest_item_failed_move_leaves_source_and_directory() {
        let inbox = TempDir::new().unwrap();
        let store = TempDir::new().unwrap();
        let item = InboxItem {
            file_name: "vanished.zip".to_string(),
            file_path: inbox.path().join("vanished.zip"),
        };

        let err = ingest_item(store.path(), &item, &StdFileOps).unwrap_err();
        assert!(matches!(err, VaultError::Relocate { .. }));
        // No cleanup of the half-created entry
        assert!(store.path().join("vanished/images").is_dir());
        assert!(!store.path().join("vanished/entry.mdx").exists());
    }
}
