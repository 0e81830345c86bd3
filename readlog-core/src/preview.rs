//! Live preview of the entry as the mobile app would show it

use crate::date::{format_short_date, parse_date};
use crate::number::{group_thousands, parse_number};
use crate::types::{BookDraft, Rating, ReadingStatus};
use serde::Serialize;
use std::fmt;

pub const TITLE_PLACEHOLDER: &str = "Enter a title";
pub const AUTHOR_PLACEHOLDER: &str = "Enter an author";
pub const REVIEW_PLACEHOLDER: &str = "Write your review...";

/// Display-ready card built from a (possibly incomplete) draft
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub title: String,
    pub author: String,
    pub status: Option<ReadingStatus>,
    pub pages: String,
    pub start_date: String,
    pub end_date: String,
    pub recommend: bool,
    pub rating: Option<Rating>,
    pub review: String,
    pub quotes: Vec<String>,
    pub is_public: bool,
}

impl Preview {
    pub fn from_draft(draft: &BookDraft) -> Self {
        Self {
            title: or_placeholder(&draft.title, TITLE_PLACEHOLDER),
            author: or_placeholder(&draft.author, AUTHOR_PLACEHOLDER),
            status: draft.status,
            pages: parse_number(&draft.total_pages)
                .map(group_thousands)
                .unwrap_or_else(|| "0".to_string()),
            start_date: format_short_date(draft.start_date_input().and_then(parse_date)),
            end_date: format_short_date(draft.end_date_input().and_then(parse_date)),
            recommend: draft.recommend,
            rating: Rating::new(draft.rating).ok(),
            review: or_placeholder(&draft.review, REVIEW_PLACEHOLDER),
            quotes: draft
                .quotes
                .iter()
                .map(|quote| quote.trim())
                .filter(|quote| !quote.is_empty())
                .map(str::to_string)
                .collect(),
            is_public: draft.is_public,
        }
    }

    /// Five-slot star bar, e.g. `★★★★½`
    pub fn stars(&self) -> String {
        let halves = self.rating.map_or(0, |rating| rating.half_stars()) as usize;
        let full = halves / 2;
        let half = halves % 2;
        let empty = 5 - full - half;
        format!("{}{}{}", "★".repeat(full), "½".repeat(half), "☆".repeat(empty))
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.author)?;
        match self.status {
            Some(status) => writeln!(f, "[{}] {} pages", status.label(), self.pages)?,
            None => writeln!(f, "{} pages", self.pages)?,
        }
        if !self.start_date.is_empty() {
            writeln!(f, "Started: {}", self.start_date)?;
        }
        if !self.end_date.is_empty() {
            writeln!(f, "Finished: {}", self.end_date)?;
        }
        writeln!(
            f,
            "Recommended: {}",
            if self.recommend { "yes" } else { "no" }
        )?;
        match self.rating {
            Some(rating) => writeln!(f, "Rating: {} ({})", self.stars(), rating)?,
            None => writeln!(f, "Rating: {} (not rated)", self.stars())?,
        }
        writeln!(f, "Review: {}", self.review)?;
        for quote in &self.quotes {
            writeln!(f, "> {}", quote)?;
        }
        write!(
            f,
            "Visibility: {}",
            if self.is_public { "public" } else { "private" }
        )
    }
}
