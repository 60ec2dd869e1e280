//! Moving archives out of the inbox.
//!
//! A move is attempted as an atomic rename first. When source and destination live on
//! different volumes the rename fails with `CrossesDevices`, and the move falls back to
//! copy-then-delete. The copy always completes before the source is removed, so an
//! interrupted fallback leaves two copies behind rather than none.

use std::io;
use std::path::Path;

use crate::error::{Result, VaultError};

/// Filesystem primitives used by the relocator.
pub trait FileOps {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// [`FileOps`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileOps;

impl FileOps for StdFileOps {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        std::fs::copy(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// How a successful move was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relocation {
    /// Same-volume atomic rename.
    Renamed,
    /// Cross-volume copy followed by deletion of the source.
    CopiedAcrossDevices { bytes: u64 },
}

fn relocate_error(from: &Path, to: &Path, source: io::Error) -> VaultError {
    VaultError::Relocate {
        from: from.display().to_string(),
        to: to.display().to_string(),
        source,
    }
}

/// Move `from` to `to`, falling back to copy + delete across volumes.
///
/// Any rename failure other than `CrossesDevices` is returned unchanged (wrapped with
/// both paths). If the fallback copy succeeds but the delete fails, the error is
/// returned and both files remain on disk.
pub fn relocate(ops: &impl FileOps, from: &Path, to: &Path) -> Result<Relocation> {
    match ops.rename(from, to) {
        Ok(()) => Ok(Relocation::Renamed),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            log::warn!(
                "{} and {} are on different devices; copying instead of renaming",
                from.display(),
                to.display()
            );
            let bytes = ops.copy(from, to).map_err(|e| relocate_error(from, to, e))?;
            ops.remove_file(from).map_err(|e| relocate_error(from, to, e))?;
            Ok(Relocation::CopiedAcrossDevices { bytes })
        }
        Err(e) => Err(relocate_error(from, to, e)),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Behaves like `StdFileOps` except that renames always report a cross-device
    /// failure, and deletes can be made to fail (an interruption after the copy).
    pub(crate) struct CrossDeviceOps {
        pub fail_remove: bool,
    }

    impl FileOps for CrossDeviceOps {
        fn rename(&self, _from: &Path, _to: &Path) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::CrossesDevices))
        }

        fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
            fs::copy(from, to)
        }

        fn remove_file(&self, path: &Path) -> io::Result<()> {
            if self.fail_remove {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted before delete"));
            }
            fs::remove_file(path)
        }
    }

    #[test]
    fn test_relocate_same_volume_renames() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a.zip");
        let to = dir.path().join("b.zip");
        fs::write(&from, b"PK-data").unwrap();

        let outcome = relocate(&StdFileOps, &from, &to).unwrap();
        assert_eq!(outcome, Relocation::Renamed);
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"PK-data");
    }

    #[test]
    fn test_relocate_cross_device_copies_then_deletes() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a.zip");
        let to = dir.path().join("b.zip");
        fs::write(&from, b"PK-data").unwrap();

        let outcome = relocate(&CrossDeviceOps { fail_remove: false }, &from, &to).unwrap();
        assert_eq!(outcome, Relocation::CopiedAcrossDevices { bytes: 7 });
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"PK-data");
    }

    #[test]
    fn test_relocate_interrupted_fallback_keeps_both_copies() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("a.zip");
        let to = dir.path().join("b.zip");
        fs::write(&from, b"PK-data").unwrap();

        let err = relocate(&CrossDeviceOps { fail_remove: true }, &from, &to).unwrap_err();
        assert!(matches!(err, VaultError::Relocate { .. }));
        assert!(from.exists(), "source must survive an interrupted fallback");
        assert_eq!(fs::read(&to).unwrap(), b"PK-data");
    }

    #[test]
    fn test_relocate_other_errors_surface_unchanged() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("missing.zip");
        let to = dir.path().join("b.zip");

        let err = relocate(&StdFileOps, &from, &to).unwrap_err();
        match err {
            VaultError::Relocate { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::NotFound)
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!to.exists());
    }
}
