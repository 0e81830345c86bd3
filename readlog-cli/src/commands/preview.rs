//! Preview command implementation

use super::load_draft;
use anyhow::Result;
use readlog_core::Preview;

/// Print the app preview card for a draft file
pub fn preview(input: &str, json: bool) -> Result<()> {
    let preview = Preview::from_draft(&load_draft(input)?);
    if json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        println!("{}", preview);
    }
    Ok(())
}
