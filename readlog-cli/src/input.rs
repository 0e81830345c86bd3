//! Terminal input for single form fields
//!
//! Each answer line is turned into a [`FieldEdit`]. An empty line keeps the
//! current value and is handled by the caller; `-` clears an optional date.

use readlog_core::number::format_number;
use readlog_core::{BookDraft, Field, FieldEdit, ReadingStatus};

/// Separator between quotes on a single line
pub const QUOTE_SEPARATOR: char = ';';

/// Parse one answer for `field`
pub fn parse_edit(field: Field, input: &str) -> Result<FieldEdit, String> {
    let input = input.trim();
    let edit = match field {
        Field::Title => FieldEdit::Title(input.to_string()),
        Field::Author => FieldEdit::Author(input.to_string()),
        Field::PublishedDate => FieldEdit::PublishedDate(input.to_string()),
        Field::TotalPages => {
            // Same character set the page-count input accepts
            if !input.chars().all(|c| c.is_ascii_digit() || c == ',') {
                return Err("Use digits only, e.g. 1,024.".to_string());
            }
            FieldEdit::TotalPages(input.to_string())
        }
        Field::Status => FieldEdit::Status(parse_status(input)?),
        Field::StartDate => FieldEdit::StartDate(optional(input)),
        Field::EndDate => FieldEdit::EndDate(optional(input)),
        Field::Recommend => FieldEdit::Recommend(parse_bool(input)?),
        Field::Rating => FieldEdit::Rating(
            input
                .parse::<f64>()
                .map_err(|_| "Enter a number from 0.5 to 5.".to_string())?,
        ),
        Field::Review => FieldEdit::Review(input.to_string()),
        Field::Quotes => FieldEdit::Quotes(
            input
                .split(QUOTE_SEPARATOR)
                .map(str::trim)
                .filter(|quote| !quote.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        Field::IsPublic => FieldEdit::IsPublic(parse_bool(input)?),
    };
    Ok(edit)
}

/// A status by wire name, label or 1-based position in the picker
fn parse_status(input: &str) -> Result<ReadingStatus, String> {
    if let Ok(status) = input.parse::<ReadingStatus>() {
        return Ok(status);
    }
    if let Some(status) = ReadingStatus::ALL
        .iter()
        .find(|status| status.label().eq_ignore_ascii_case(input))
    {
        return Ok(*status);
    }
    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| ReadingStatus::ALL.get(i).copied())
        .ok_or_else(|| format!("Choose one of: {}.", status_choices()))
}

/// `1) Want to read  2) Reading ...`
pub fn status_choices() -> String {
    ReadingStatus::ALL
        .iter()
        .enumerate()
        .map(|(i, status)| format!("{}) {}", i + 1, status.label()))
        .collect::<Vec<_>>()
        .join("  ")
}

fn parse_bool(input: &str) -> Result<bool, String> {
    match input.to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" => Ok(true),
        "n" | "no" | "false" => Ok(false),
        _ => Err("Answer y or n.".to_string()),
    }
}

fn optional(input: &str) -> Option<String> {
    (input != "-").then(|| input.to_string())
}

/// Current value of `field` as shown next to its prompt
pub fn display_value(field: Field, draft: &BookDraft) -> String {
    match field {
        Field::Title => draft.title.clone(),
        Field::Author => draft.author.clone(),
        Field::PublishedDate => draft.published_date.clone(),
        Field::TotalPages => format_number(&draft.total_pages),
        Field::Status => draft
            .status
            .map(|status| status.label().to_string())
            .unwrap_or_default(),
        Field::StartDate => draft.start_date.clone().unwrap_or_default(),
        Field::EndDate => draft.end_date.clone().unwrap_or_default(),
        Field::Recommend => yes_no(draft.recommend),
        Field::Rating if draft.rating > 0.0 => draft.rating.to_string(),
        Field::Rating => String::new(),
        Field::Review => truncate(&draft.review, 40),
        Field::Quotes => draft.quotes.join("; "),
        Field::IsPublic => yes_no(draft.is_public),
    }
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "no" };
    text.to_string()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accepts_names_labels_and_positions() {
        assert_eq!(
            parse_edit(Field::Status, "done").unwrap(),
            FieldEdit::Status(ReadingStatus::Done)
        );
        assert_eq!(
            parse_edit(Field::Status, "Want to read").unwrap(),
            FieldEdit::Status(ReadingStatus::Wish)
        );
        assert_eq!(
            parse_edit(Field::Status, "4").unwrap(),
            FieldEdit::Status(ReadingStatus::Pause)
        );
        assert!(parse_edit(Field::Status, "5").is_err());
        assert!(parse_edit(Field::Status, "0").is_err());
    }

    #[test]
    fn test_page_count_rejects_letters() {
        assert_eq!(
            parse_edit(Field::TotalPages, "1,024").unwrap(),
            FieldEdit::TotalPages("1,024".to_string())
        );
        assert!(parse_edit(Field::TotalPages, "12a").is_err());
    }

    #[test]
    fn test_dash_clears_dates() {
        assert_eq!(parse_edit(Field::EndDate, "-").unwrap(), FieldEdit::EndDate(None));
        assert_eq!(
            parse_edit(Field::StartDate, "2024-01-05").unwrap(),
            FieldEdit::StartDate(Some("2024-01-05".to_string()))
        );
    }

    #[test]
    fn test_quotes_split_on_semicolons() {
        assert_eq!(
            parse_edit(Field::Quotes, "First; ; second ").unwrap(),
            FieldEdit::Quotes(vec!["First".to_string(), "second".to_string()])
        );
    }

    #[test]
    fn test_booleans() {
        assert_eq!(parse_edit(Field::IsPublic, "Y").unwrap(), FieldEdit::IsPublic(true));
        assert_eq!(parse_edit(Field::Recommend, "no").unwrap(), FieldEdit::Recommend(false));
        assert!(parse_edit(Field::Recommend, "maybe").is_err());
    }

    #[test]
    fn test_display_value() {
        let draft = BookDraft {
            total_pages: "1234".to_string(),
            review: "r".repeat(50),
            ..BookDraft::default()
        };
        assert_eq!(display_value(Field::TotalPages, &draft), "1,234");
        assert_eq!(display_value(Field::Status, &draft), "Want to read");
        assert_eq!(display_value(Field::Rating, &draft), "");
        assert_eq!(display_value(Field::Review, &draft).chars().count(), 43);
    }
}
