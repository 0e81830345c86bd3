//! Draft inspection and reset

use super::open_store;
use anyhow::Result;
use readlog_core::{BookDraft, StorageKey};
use std::path::Path;

/// Print the persisted in-progress draft, if any
pub async fn draft(data_dir: &Path) -> Result<()> {
    match open_store(data_dir)
        .get::<BookDraft>(StorageKey::MultiStepFormData)
        .await
    {
        Some(draft) => println!("{}", serde_json::to_string_pretty(&draft)?),
        None => println!("No saved draft"),
    }
    Ok(())
}

/// Discard the persisted draft
pub async fn reset(data_dir: &Path) -> Result<()> {
    open_store(data_dir)
        .remove(StorageKey::MultiStepFormData)
        .await;
    println!("Draft cleared");
    Ok(())
}
