//! Destination store: typed view of ingested entries and safe resolution of the
//! relative references they declare.

pub mod catalog;
pub mod path_safety;
pub mod verify;

pub use catalog::{parse_frontmatter, Catalog, CatalogEntry, EntryMeta, Framework};
pub use path_safety::resolve_within;
pub use verify::check_entry;
