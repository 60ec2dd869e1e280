//! Traversal guard for references stored inside entry metadata.
//!
//! Resolution is purely lexical (no symlink lookups), so a reference is accepted only
//! when the joined, normalized path is the base directory itself or lies beneath it.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without touching the filesystem. `..` at the root
/// stays at the root.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Resolve `reference` against `base_dir`, or `None` if the result escapes it.
///
/// Backslashes are treated as separators and one leading `./` is dropped. Absolute
/// references and `..` segments that climb out of `base_dir` are rejected.
pub fn resolve_within(base_dir: &Path, reference: &str) -> Option<PathBuf> {
    let normalized = reference.replace('\\', "/");
    let normalized = normalized.strip_prefix("./").unwrap_or(&normalized);

    let base = normalize_lexically(&std::path::absolute(base_dir).ok()?);
    let target = normalize_lexically(&base.join(normalized));

    if target.starts_with(&base) {
        Some(target)
    } else {
        log::debug!(
            "rejected reference {:?} outside {}",
            reference,
            base.display()
        );
        None
    }
}
