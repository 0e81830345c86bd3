//! Submitted-entry archive

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use readlog_core::{BookEntry, SubmitError, Submitter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One submitted entry as written to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedEntry {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub entry: BookEntry,
}

/// Writes each submitted entry to `<dir>/<uuid>.json`
pub struct EntryArchive {
    dir: PathBuf,
}

impl EntryArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save an entry atomically.
    /// Writes to a temp file then renames to avoid partial writes
    pub async fn save(&self, entry: &BookEntry) -> std::io::Result<ArchivedEntry> {
        let archived = ArchivedEntry {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            entry: entry.clone(),
        };
        let data = serde_json::to_string_pretty(&archived)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{}.json", archived.id));
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &data).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        tracing::info!("Archived \"{}\" as {}", entry.title, archived.id);
        Ok(archived)
    }
}

#[async_trait]
impl Submitter for EntryArchive {
    async fn submit(&self, entry: &BookEntry) -> Result<(), SubmitError> {
        self.save(entry)
            .await
            .map(|_| ())
            .map_err(|e| SubmitError::Failed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use readlog_core::{Rating, ReadingStatus};
    use tempfile::TempDir;

    fn entry() -> BookEntry {
        BookEntry {
            title: "Kindred".to_string(),
            author: "Octavia E. Butler".to_string(),
            published_date: NaiveDate::from_ymd_opt(1979, 6, 1).unwrap(),
            total_pages: 264,
            status: ReadingStatus::Wish,
            start_date: None,
            end_date: None,
            recommend: false,
            rating: Rating::new(3.5).unwrap(),
            review: String::new(),
            quotes: Vec::new(),
            is_public: false,
        }
    }

    #[tokio::test]
    async fn test_submit_writes_one_file() {
        let dir = TempDir::new().unwrap();
        let archive = EntryArchive::new(dir.path().join("entries"));

        archive.submit(&entry()).await.unwrap();

        let files: Vec<_> = std::fs::read_dir(archive.dir())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);
        let saved: ArchivedEntry =
            serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
        assert_eq!(saved.entry, entry());
        assert_eq!(files[0].file_stem().unwrap().to_str().unwrap(), saved.id.to_string());
    }

    #[tokio::test]
    async fn test_unwritable_dir_fails_submission() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("entries");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = EntryArchive::new(&blocker).submit(&entry()).await;
        assert!(matches!(result, Err(SubmitError::Failed(_))));
    }
}
