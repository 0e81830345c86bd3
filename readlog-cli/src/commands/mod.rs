//! CLI command implementations

mod draft;
mod fill;
mod preview;
mod steps;
mod validate;

pub use draft::{draft, reset};
pub use fill::fill;
pub use preview::preview;
pub use steps::steps;
pub use validate::validate;

use anyhow::{Context, Result};
use readlog_core::{BookDraft, FileStore, Persistence};
use std::path::Path;

/// Read a draft JSON file (same shape as the persisted snapshot)
fn load_draft(input: &str) -> Result<BookDraft> {
    let data = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to open input file: {}", input))?;
    serde_json::from_str(&data).with_context(|| format!("Failed to parse draft {}", input))
}

/// Snapshot persistence rooted at the data directory
fn open_store(data_dir: &Path) -> Persistence<FileStore> {
    Persistence::new(FileStore::new(data_dir))
}
