//! The reading-log entry and its in-progress form counterpart

use super::{Field, Rating, ReadingStatus};
use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A fully validated reading-log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookEntry {
    pub title: String,
    pub author: String,
    pub published_date: NaiveDate,
    pub total_pages: u32,
    pub status: ReadingStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub recommend: bool,
    pub rating: Rating,
    pub review: String,
    pub quotes: Vec<String>,
    pub is_public: bool,
}

/// Form state as the user types it
///
/// Values are kept in their input shape (dates and page counts as text) so a
/// half-filled form can be persisted and restored. Missing keys in a snapshot
/// fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    /// `YYYY-MM-DD`, empty when unset
    pub published_date: String,
    #[serde(deserialize_with = "text_or_number")]
    pub total_pages: String,
    pub status: Option<ReadingStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub recommend: bool,
    /// 0 means "not rated yet"
    pub rating: f64,
    pub review: String,
    pub quotes: Vec<String>,
    pub is_public: bool,
}

impl Default for BookDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            published_date: String::new(),
            total_pages: String::new(),
            status: Some(ReadingStatus::Wish),
            start_date: None,
            end_date: None,
            recommend: false,
            rating: 0.0,
            review: String::new(),
            quotes: Vec::new(),
            is_public: false,
        }
    }
}

impl BookDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a single field edit
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Title(v) => self.title = v,
            FieldEdit::Author(v) => self.author = v,
            FieldEdit::PublishedDate(v) => self.published_date = v,
            FieldEdit::TotalPages(v) => self.total_pages = v,
            FieldEdit::Status(v) => self.status = Some(v),
            FieldEdit::StartDate(v) => self.start_date = v,
            FieldEdit::EndDate(v) => self.end_date = v,
            FieldEdit::Recommend(v) => self.recommend = v,
            FieldEdit::Rating(v) => self.rating = v,
            FieldEdit::Review(v) => self.review = v,
            FieldEdit::Quotes(v) => self.quotes = v,
            FieldEdit::IsPublic(v) => self.is_public = v,
        }
    }

    /// Start date input, with empty text treated as absent
    pub fn start_date_input(&self) -> Option<&str> {
        non_blank(self.start_date.as_deref())
    }

    /// End date input, with empty text treated as absent
    pub fn end_date_input(&self) -> Option<&str> {
        non_blank(self.end_date.as_deref())
    }
}

impl From<&BookEntry> for BookDraft {
    fn from(entry: &BookEntry) -> Self {
        Self {
            title: entry.title.clone(),
            author: entry.author.clone(),
            published_date: entry.published_date.to_string(),
            total_pages: entry.total_pages.to_string(),
            status: Some(entry.status),
            start_date: entry.start_date.map(|d| d.to_string()),
            end_date: entry.end_date.map(|d| d.to_string()),
            recommend: entry.recommend,
            rating: entry.rating.value(),
            review: entry.review.clone(),
            quotes: entry.quotes.clone(),
            is_public: entry.is_public,
        }
    }
}

/// A typed write to exactly one field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Title(String),
    Author(String),
    PublishedDate(String),
    TotalPages(String),
    Status(ReadingStatus),
    StartDate(Option<String>),
    EndDate(Option<String>),
    Recommend(bool),
    Rating(f64),
    Review(String),
    Quotes(Vec<String>),
    IsPublic(bool),
}

impl FieldEdit {
    /// The field this edit writes
    pub fn field(&self) -> Field {
        match self {
            FieldEdit::Title(_) => Field::Title,
            FieldEdit::Author(_) => Field::Author,
            FieldEdit::PublishedDate(_) => Field::PublishedDate,
            FieldEdit::TotalPages(_) => Field::TotalPages,
            FieldEdit::Status(_) => Field::Status,
            FieldEdit::StartDate(_) => Field::StartDate,
            FieldEdit::EndDate(_) => Field::EndDate,
            FieldEdit::Recommend(_) => Field::Recommend,
            FieldEdit::Rating(_) => Field::Rating,
            FieldEdit::Review(_) => Field::Review,
            FieldEdit::Quotes(_) => Field::Quotes,
            FieldEdit::IsPublic(_) => Field::IsPublic,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Older snapshots store the page count as a JSON number
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a page count, found {}",
            other
        ))),
    }
}
