//! Steps command implementation

use anyhow::Result;
use readlog_core::StepRegistry;

/// List the form's steps and the fields each one owns
pub fn steps() -> Result<()> {
    for (i, step) in StepRegistry::book_form().ordered_steps().iter().enumerate() {
        let fields: Vec<&str> = step.fields.iter().map(|field| field.label()).collect();
        println!("{}. {:<24} {}", i + 1, step.label, fields.join(", "));
    }
    Ok(())
}
