//! Read side of the destination store: every `.md` / `.mdx` document under the store
//! becomes a catalog entry once its YAML frontmatter parses against [`EntryMeta`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Result, VaultError};
use crate::ingest::entry::{DEFAULT_COVER, DEFAULT_ZIP_FILE};

/// Site framework a template is built with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Nextjs,
    Html,
    Wordpress,
    #[default]
    Other,
}

/// Declared fields of an entry document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryMeta {
    pub title: String,
    #[serde(default)]
    pub framework: Framework,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_cover")]
    pub cover: String,
    #[serde(default = "default_zip_file")]
    pub zip_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<NaiveDate>,
}

fn default_cover() -> String {
    DEFAULT_COVER.to_string()
}

fn default_zip_file() -> String {
    DEFAULT_ZIP_FILE.to_string()
}

/// Split a document into its frontmatter block and body.
///
/// The document must open with a `---` line; the block ends at the next `---` line.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse the frontmatter of an entry document into [`EntryMeta`].
pub fn parse_frontmatter(content: &str) -> Result<EntryMeta> {
    let (yaml, _body) = split_frontmatter(content)
        .ok_or_else(|| VaultError::Parse("missing frontmatter block".to_string()))?;
    serde_yaml_ng::from_str(yaml).map_err(|e| VaultError::Parse(format!("frontmatter: {}", e)))
}

/// Identifier of a document from its store-relative path (`/`-separated).
///
/// `site/entry.mdx` → `site`; any other document keeps its path minus the extension
/// (`notes/draft.md` → `notes/draft`).
pub fn entry_id(relative_path: &str) -> String {
    let (folder, file_name) = match relative_path.rsplit_once('/') {
        Some((folder, name)) => (Some(folder), name),
        None => (None, relative_path),
    };
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    match folder {
        Some(folder) if stem == "entry" && !folder.is_empty() => folder.to_string(),
        Some(folder) => format!("{}/{}", folder, stem),
        None => stem.to_string(),
    }
}

/// One readable entry in the store
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(flatten)]
    pub meta: EntryMeta,
    /// Directory the entry's relative references resolve against.
    #[serde(skip)]
    pub entry_dir: PathBuf,
}

/// Snapshot of every valid entry in a store
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Walk `store_dir` and collect every document with valid frontmatter.
    ///
    /// A missing store is an empty catalog. Documents that fail to read or parse are
    /// skipped with a warning.
    pub fn load(store_dir: &Path) -> Result<Self> {
        if !store_dir.exists() {
            return Ok(Self::default());
        }

        let mut entries = Vec::new();
        for dir_entry in WalkDir::new(store_dir).sort_by_file_name() {
            let dir_entry = match dir_entry {
                Ok(e) => e,
                Err(e) => {
                    log::warn!("catalog: skipping unreadable path: {}", e);
                    continue;
                }
            };
            if !dir_entry.file_type().is_file() {
                continue;
            }

            let path = dir_entry.path();
            let extension = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            if !matches!(extension.as_str(), "md" | "mdx") {
                continue;
            }

            let relative_path = path
                .strip_prefix(store_dir)
                .map_err(|_| {
                    VaultError::Io(std::io::Error::other(format!(
                        "Failed to compute relative path for: {}",
                        path.display()
                    )))
                })?
                .to_string_lossy()
                .replace('\\', "/");

            let meta = match std::fs::read_to_string(path)
                .map_err(VaultError::Io)
                .and_then(|content| parse_frontmatter(&content))
            {
                Ok(meta) => meta,
                Err(e) => {
                    log::warn!("catalog: skipping {}: {}", relative_path, e);
                    continue;
                }
            };

            let id = entry_id(&relative_path);
            entries.push(CatalogEntry {
                entry_dir: store_dir.join(&id),
                id,
                meta,
            });
        }

        log::debug!("catalog: {} entries in {}", entries.len(), store_dir.display());
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn find(&self, slug: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == slug)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
