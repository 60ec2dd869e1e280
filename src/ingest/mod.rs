//! Inbox ingestion pipeline: scan → name → allocate slug → relocate → write stub.

pub mod batch;
pub mod entry;
pub mod item;
pub mod naming;
pub mod relocate;
pub mod scanner;
pub mod slug;

pub use batch::{run_batch, run_batch_with, BatchSummary, IngestFailure};
pub use entry::{render_stub, ENTRY_FILE_NAME, IMAGES_DIR_NAME, SOURCE_ARCHIVE_NAME};
pub use item::{ingest_item, IngestedEntry};
pub use naming::{humanize, slugify};
pub use relocate::{relocate, FileOps, Relocation, StdFileOps};
pub use scanner::{discover_inbox, InboxItem};
pub use slug::allocate_slug;
