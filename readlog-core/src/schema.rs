//! Validation rules for a book entry
//!
//! Validation runs in two passes over a [`BookDraft`]:
//!
//! 1. **Intrinsic checks**: each field on its own (required text, date
//!    format and bounds, page count coercion, status membership, rating range).
//! 2. **Cross-field rules**, always in this order:
//!    status vs. date presence, then date ordering, then rating vs. review
//!    length. Each rule reports on the single field it blames.
//!
//! Nothing short-circuits: every applicable rule runs so all messages surface
//! at once. Validation never fails with an error; it returns the issues,
//! sorted by field with each field's issues in the order they were raised.

use crate::date::{is_after_date, is_after_or_same_date, parse_date};
use crate::number::parse_number;
use crate::types::{BookDraft, BookEntry, Field, FieldMap, Rating, ReadingStatus};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Earliest accepted publication year (1900-01-01 onward)
pub const MIN_PUBLISHED_YEAR: i32 = 1900;

/// Minimum review length, in characters, for a 1 or 5 star rating
pub const EXTREME_RATING_MIN_REVIEW_CHARS: usize = 100;

/// One problem attached to one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: Field,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Ordered issues produced by a validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldIssue> {
        self.issues.iter()
    }

    pub fn has(&self, field: Field) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }

    /// All issues blamed on `field`, in the order they were raised
    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &FieldIssue> {
        self.issues.iter().filter(move |issue| issue.field == field)
    }

    pub fn first_for(&self, field: Field) -> Option<&FieldIssue> {
        self.for_field(field).next()
    }

    /// Keep only issues on the given fields
    pub fn restrict_to(&self, fields: &[Field]) -> ValidationErrors {
        ValidationErrors::new(
            self.issues
                .iter()
                .filter(|issue| fields.contains(&issue.field))
                .cloned()
                .collect(),
        )
    }

    /// First field of `order` that has an issue
    pub fn first_field_in(&self, order: &[Field]) -> Option<Field> {
        order.iter().copied().find(|field| self.has(*field))
    }

    /// First message per field, for inline display
    pub fn to_field_map(&self) -> FieldMap<String> {
        let mut map = FieldMap::new();
        for issue in &self.issues {
            if !map.contains(issue.field) {
                map.insert(issue.field, issue.message.clone());
            }
        }
        map
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .issues
            .iter()
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Date input after parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateInput {
    Absent,
    Invalid,
    Valid(NaiveDate),
}

impl DateInput {
    fn parse(raw: Option<&str>) -> Self {
        match raw {
            None => DateInput::Absent,
            Some(text) => parse_date(text).map_or(DateInput::Invalid, DateInput::Valid),
        }
    }

    fn is_present(&self) -> bool {
        !matches!(self, DateInput::Absent)
    }

    fn valid(&self) -> Option<NaiveDate> {
        match self {
            DateInput::Valid(date) => Some(*date),
            _ => None,
        }
    }
}

/// The book-entry rule set
///
/// `today` bounds the published date; it is injected so validation stays a
/// pure function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookEntrySchema {
    today: NaiveDate,
}

impl BookEntrySchema {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Schema bounded by the local calendar date
    pub fn for_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Validate the whole draft, producing the entry when every rule passes
    pub fn validate(&self, draft: &BookDraft) -> Result<BookEntry, ValidationErrors> {
        let mut issues = Vec::new();

        let published = self.check_published_date(draft, &mut issues);
        let total_pages = check_total_pages(draft, &mut issues);
        let start = DateInput::parse(draft.start_date_input());
        let end = DateInput::parse(draft.end_date_input());
        let rating = check_rating(draft.rating, &mut issues);

        if draft.title.is_empty() {
            issues.push(FieldIssue::new(Field::Title, "Enter the book title."));
        }
        if draft.author.is_empty() {
            issues.push(FieldIssue::new(Field::Author, "Enter the author's name."));
        }
        if draft.status.is_none() {
            issues.push(FieldIssue::new(Field::Status, "Select a reading status."));
        }
        if start == DateInput::Invalid {
            issues.push(FieldIssue::new(Field::StartDate, "Enter a valid date."));
        }
        if end == DateInput::Invalid {
            issues.push(FieldIssue::new(Field::EndDate, "Enter a valid date."));
        }

        if let Some(status) = draft.status {
            check_status_dates(status, start, end, &mut issues);
        }
        check_date_order(draft.status, published, start, end, &mut issues);
        check_review_length(draft, &mut issues);

        issues.sort_by_key(|issue| issue.field);

        match (published, total_pages, draft.status, rating) {
            (Some(published_date), Some(total_pages), Some(status), Some(rating))
                if issues.is_empty() =>
            {
                Ok(BookEntry {
                    title: draft.title.clone(),
                    author: draft.author.clone(),
                    published_date,
                    total_pages,
                    status,
                    start_date: start.valid(),
                    end_date: end.valid(),
                    recommend: draft.recommend,
                    rating,
                    review: draft.review.clone(),
                    quotes: draft.quotes.clone(),
                    is_public: draft.is_public,
                })
            }
            _ => Err(ValidationErrors::new(issues)),
        }
    }

    /// All issues for the draft (empty when valid)
    pub fn issues(&self, draft: &BookDraft) -> ValidationErrors {
        self.validate(draft).err().unwrap_or_default()
    }

    /// Issues on the given fields only, as used to gate one step
    pub fn validate_fields(&self, draft: &BookDraft, fields: &[Field]) -> ValidationErrors {
        self.issues(draft).restrict_to(fields)
    }

    fn check_published_date(
        &self,
        draft: &BookDraft,
        issues: &mut Vec<FieldIssue>,
    ) -> Option<NaiveDate> {
        let Some(date) = parse_date(&draft.published_date) else {
            issues.push(FieldIssue::new(Field::PublishedDate, "Enter a valid date."));
            return None;
        };
        if date.year() < MIN_PUBLISHED_YEAR {
            issues.push(FieldIssue::new(
                Field::PublishedDate,
                "Published date must be on or after January 1, 1900.",
            ));
            return None;
        }
        if date > self.today {
            issues.push(FieldIssue::new(
                Field::PublishedDate,
                "Published date cannot be in the future.",
            ));
            return None;
        }
        Some(date)
    }
}

impl Default for BookEntrySchema {
    fn default() -> Self {
        Self::for_today()
    }
}

fn check_total_pages(draft: &BookDraft, issues: &mut Vec<FieldIssue>) -> Option<u32> {
    let pages = parse_number(&draft.total_pages)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n >= 1);
    if pages.is_none() {
        issues.push(FieldIssue::new(
            Field::TotalPages,
            "Enter the total number of pages.",
        ));
    }
    pages
}

fn check_rating(value: f64, issues: &mut Vec<FieldIssue>) -> Option<Rating> {
    let message = if !value.is_finite() || value < 0.5 {
        "Select a rating."
    } else if value > 5.0 {
        "Rating cannot be higher than 5."
    } else {
        match Rating::new(value) {
            Ok(rating) => return Some(rating),
            Err(_) => "Rating must be in half-star steps.",
        }
    };
    issues.push(FieldIssue::new(Field::Rating, message));
    None
}

fn check_status_dates(
    status: ReadingStatus,
    start: DateInput,
    end: DateInput,
    issues: &mut Vec<FieldIssue>,
) {
    let policy = status.date_policy();

    if !policy.start_allowed && start.is_present() {
        issues.push(FieldIssue::new(
            Field::StartDate,
            format!("A book marked \"{}\" cannot have a start date.", status.label()),
        ));
    }
    if !policy.end_allowed && end.is_present() {
        issues.push(FieldIssue::new(
            Field::EndDate,
            format!("A book marked \"{}\" cannot have an end date.", status.label()),
        ));
    }
    if policy.start_required && !start.is_present() {
        issues.push(FieldIssue::new(
            Field::StartDate,
            format!("A book marked \"{}\" needs a start date.", status.label()),
        ));
    }
    if policy.end_required && !end.is_present() {
        issues.push(FieldIssue::new(
            Field::EndDate,
            format!("A book marked \"{}\" needs an end date.", status.label()),
        ));
    }
}

fn check_date_order(
    status: Option<ReadingStatus>,
    published: Option<NaiveDate>,
    start: DateInput,
    end: DateInput,
    issues: &mut Vec<FieldIssue>,
) {
    if let (Some(published), Some(start)) = (published, start.valid()) {
        if is_after_or_same_date(&published, &start) {
            issues.push(FieldIssue::new(
                Field::StartDate,
                "Start date must be after the published date.",
            ));
        }
    }

    if status == Some(ReadingStatus::Done) {
        if let (Some(start), Some(end)) = (start.valid(), end.valid()) {
            if is_after_date(&start, &end) {
                issues.push(FieldIssue::new(
                    Field::EndDate,
                    "End date must not precede the start date.",
                ));
            }
        }
    }
}

fn check_review_length(draft: &BookDraft, issues: &mut Vec<FieldIssue>) {
    let extreme = Rating::new(draft.rating).is_ok_and(|rating| rating.is_extreme());
    if extreme && draft.review.chars().count() < EXTREME_RATING_MIN_REVIEW_CHARS {
        issues.push(FieldIssue::new(
            Field::Review,
            format!(
                "A 1 or 5 star rating needs a review of at least {} characters.",
                EXTREME_RATING_MIN_REVIEW_CHARS
            ),
        ));
    }
}
