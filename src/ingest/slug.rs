use std::path::Path;

use crate::error::{Result, VaultError};

/// Pick the first free entry name in `store_dir`, starting from `base_slug` and then
/// trying `base-2`, `base-3`, ... until no directory entry of that name exists.
///
/// Each candidate costs a single existence probe. The check-then-create sequence is
/// not atomic: callers must not allocate concurrently against the same store.
pub fn allocate_slug(store_dir: &Path, base_slug: &str) -> Result<String> {
    let mut slug = base_slug.to_string();
    let mut index: u64 = 2;

    while store_dir
        .join(&slug)
        .try_exists()
        .map_err(VaultError::Io)?
    {
        log::debug!("slug '{}' taken in {}", slug, store_dir.display());
        slug = format!("{}-{}", base_slug, index);
        index += 1;
    }

    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_allocate_free_slug_unchanged() {
        let store = TempDir::new().unwrap();
        assert_eq!(allocate_slug(store.path(), "foo").unwrap(), "foo");
    }

    #[test]
    fn test_allocate_appends_suffix_from_two() {
        let store = TempDir::new().unwrap();
        fs::create_dir(store.path().join("foo")).unwrap();
        assert_eq!(allocate_slug(store.path(), "foo").unwrap(), "foo-2");

        fs::create_dir(store.path().join("foo-2")).unwrap();
        assert_eq!(allocate_slug(store.path(), "foo").unwrap(), "foo-3");
    }

    #[test]
    fn test_allocate_counts_plain_files_as_taken() {
        let store = TempDir::new().unwrap();
        fs::write(store.path().join("foo"), b"not a dir").unwrap();
        assert_eq!(allocate_slug(store.path(), "foo").unwrap(), "foo-2");
    }

    #[test]
    fn test_allocate_takes_first_free_candidate() {
        let store = TempDir::new().unwrap();
        fs::create_dir(store.path().join("foo")).unwrap();
        fs::create_dir(store.path().join("foo-3")).unwrap();
        // foo-2 is the first free candidate
        assert_eq!(allocate_slug(store.path(), "foo").unwrap(), "foo-2");
    }
}
