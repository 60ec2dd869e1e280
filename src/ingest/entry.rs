//! Layout of a materialized entry and its metadata stub.

use super::naming::escape_double_quotes;

/// Metadata document written into every new entry directory.
pub const ENTRY_FILE_NAME: &str = "entry.mdx";
/// Name the relocated archive takes inside its entry directory.
pub const SOURCE_ARCHIVE_NAME: &str = "source.zip";
/// Empty asset directory created for every entry.
pub const IMAGES_DIR_NAME: &str = "images";

pub const DEFAULT_FRAMEWORK: &str = "other";
pub const DEFAULT_COVER: &str = "./images/cover.png";
pub const DEFAULT_ZIP_FILE: &str = "./source.zip";

const STUB_BODY: &str = "Add template notes here.";

/// Render the metadata stub for a freshly ingested entry.
pub fn render_stub(title: &str) -> String {
    format!(
        "---\n\
         title: \"{title}\"\n\
         framework: \"{DEFAULT_FRAMEWORK}\"\n\
         tech: []\n\
         tags: []\n\
         cover: \"{DEFAULT_COVER}\"\n\
         zipFile: \"{DEFAULT_ZIP_FILE}\"\n\
         ---\n\
         \n\
         {STUB_BODY}\n",
        title = escape_double_quotes(title),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{parse_frontmatter, Framework};

    #[test]
    fn test_render_stub_layout() {
        let stub = render_stub("My Cool Site");
        assert!(stub.starts_with("---\ntitle: \"My Cool Site\"\nframework: \"other\"\n"));
        assert!(stub.contains("\ntech: []\ntags: []\n"));
        assert!(stub.contains("cover: \"./images/cover.png\"\n"));
        assert!(stub.contains("zipFile: \"./source.zip\"\n---\n\nAdd template notes here.\n"));
    }

    #[test]
    fn test_render_stub_round_trips_through_schema() {
        let title = r#"The "Best" \ Theme"#;
        let meta = parse_frontmatter(&render_stub(title)).unwrap();
        assert_eq!(meta.title, title);
        assert_eq!(meta.framework, Framework::Other);
        assert!(meta.tech.is_empty());
        assert!(meta.tags.is_empty());
        assert_eq!(meta.cover, DEFAULT_COVER);
        assert_eq!(meta.zip_file, DEFAULT_ZIP_FILE);
        assert!(meta.added_at.is_none());
    }
}
