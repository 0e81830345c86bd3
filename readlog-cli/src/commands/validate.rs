//! Validate command implementation

use super::load_draft;
use anyhow::{bail, Result};
use readlog_core::{BookEntrySchema, StepRegistry, ValidationErrors};

/// Validate a draft file, optionally only the fields of one step (1-based)
pub fn validate(input: &str, step: Option<usize>, json: bool) -> Result<()> {
    let draft = load_draft(input)?;
    let schema = BookEntrySchema::for_today();

    let issues = match step {
        Some(number) => {
            let registry = StepRegistry::book_form();
            let Some(definition) = number.checked_sub(1).and_then(|i| registry.get(i)) else {
                bail!("Step must be between 1 and {}", registry.len());
            };
            schema.validate_fields(&draft, definition.fields)
        }
        None => schema.issues(&draft),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else {
        print_issues(&issues);
    }

    if !issues.is_empty() {
        bail!("Validation failed for {}", input);
    }
    Ok(())
}

fn print_issues(issues: &ValidationErrors) {
    if issues.is_empty() {
        println!("Valid entry");
        return;
    }
    for issue in issues.iter() {
        println!("  {}: {}", issue.field.label(), issue.message);
    }
}
