pub mod config;
pub mod error;
pub mod ingest;
pub mod server;
pub mod store;
pub mod watch;

pub use config::Config;
pub use error::{Result, VaultError};
pub use ingest::{run_batch, BatchSummary};
