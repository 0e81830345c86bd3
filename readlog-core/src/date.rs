//! Calendar-date helpers
//!
//! Every comparison here looks at the calendar date only; time of day is
//! dropped through [`normalize_date`] first.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Anything that falls on a calendar day
pub trait CalendarDate {
    fn calendar_date(&self) -> NaiveDate;
}

impl CalendarDate for NaiveDate {
    fn calendar_date(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDate for NaiveDateTime {
    fn calendar_date(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDate for DateTime<Tz> {
    fn calendar_date(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// Midnight of the same day. Returns a new value; the input is untouched.
pub fn normalize_date<D: CalendarDate>(date: &D) -> NaiveDateTime {
    date.calendar_date().and_time(NaiveTime::MIN)
}

pub fn is_same_date<A: CalendarDate, B: CalendarDate>(a: &A, b: &B) -> bool {
    normalize_date(a) == normalize_date(b)
}

/// `a` falls on a strictly later day than `b`
pub fn is_after_date<A: CalendarDate, B: CalendarDate>(a: &A, b: &B) -> bool {
    normalize_date(a) > normalize_date(b)
}

/// `a` falls on the same day as `b` or later
pub fn is_after_or_same_date<A: CalendarDate, B: CalendarDate>(a: &A, b: &B) -> bool {
    normalize_date(a) >= normalize_date(b)
}

/// Parse a date typed into a form field.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps (time is discarded).
/// Blank or malformed input yields `None`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(input).ok().map(|d| d.date_naive()))
}

/// `Jan 5, 2024`; empty for `None`
pub fn format_short_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// `Friday, January 5, 2024`; empty for `None`
pub fn format_long_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_default()
}
