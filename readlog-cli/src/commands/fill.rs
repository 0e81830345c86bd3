//! Interactive fill command
//!
//! Walks the book form one step at a time on a line-based terminal. Answers
//! go through the same controller a graphical host would use, so drafts are
//! persisted between runs and resumed on the next `readlog fill`.

use super::open_store;
use crate::archive::EntryArchive;
use crate::input::{display_value, parse_edit, status_choices};
use anyhow::{bail, Context, Result};
use readlog_core::steps::{is_enabled, is_required};
use readlog_core::storage::StorageBackend;
use readlog_core::{
    AdvanceOutcome, BookDraft, BookEntry, Field, FieldEdit, MemoryNavigator, Navigator, Preview,
    StepForm, Submitter,
};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

/// How an interactive session finished
#[derive(Debug)]
pub enum SessionEnd {
    Submitted(BookEntry),
    /// Quit or end of input; the draft was kept
    Saved,
}

enum Answer {
    Edit(FieldEdit),
    Keep,
    Back,
    Reset,
    Quit,
}

/// Fill in a book entry interactively
pub async fn fill(data_dir: &Path, url: Option<&str>) -> Result<()> {
    let mut form = StepForm::new(
        MemoryNavigator::new(url.unwrap_or_default()),
        Arc::new(open_store(data_dir)),
        EntryArchive::new(data_dir.join("entries")),
    );

    let stdin = std::io::stdin();
    let result = run_session(&mut form, stdin.lock(), std::io::stdout()).await;
    form.teardown();
    result.map(|_| ())
}

/// Drive `form` from line input until it is submitted or the user stops
pub async fn run_session<B, N, S, R, W>(
    form: &mut StepForm<B, N, S>,
    mut input: R,
    mut out: W,
) -> Result<SessionEnd>
where
    B: StorageBackend + 'static,
    N: Navigator,
    S: Submitter,
    R: BufRead,
    W: Write,
{
    form.mount().await;
    if form.values() != &BookDraft::default() {
        writeln!(out, "Resuming your saved draft.")?;
    }
    writeln!(out, "Commands: :back  :reset  :quit")?;

    'steps: loop {
        let index = form.current_index();
        let Some(step) = form.current_step().copied() else {
            bail!("The form has no steps");
        };

        writeln!(out)?;
        writeln!(
            out,
            "Step {}/{}: {}  ({})",
            index + 1,
            form.steps().len(),
            step.label,
            form.navigator().query()
        )?;
        if form.step_has_errors() {
            writeln!(out, "Some answers on this step need fixing.")?;
        }

        for &field in step.fields {
            if !is_enabled(field, form.values()) {
                clear_locked_date(form, field);
                continue;
            }
            match ask(field, form.values(), &mut input, &mut out)? {
                Answer::Keep => {}
                Answer::Edit(edit) => {
                    form.set_value(edit);
                    form.blur(field);
                    if let Some(message) = form.error(field) {
                        writeln!(out, "  ! {}", message)?;
                    }
                }
                Answer::Back => {
                    if !form.go_back() {
                        writeln!(out, "Already on the first step.")?;
                    }
                    continue 'steps;
                }
                Answer::Reset => {
                    form.reset().await;
                    writeln!(out, "Form cleared.")?;
                    continue 'steps;
                }
                Answer::Quit => {
                    form.flush().await;
                    writeln!(out)?;
                    writeln!(out, "Draft saved. Run `readlog fill` to continue.")?;
                    return Ok(SessionEnd::Saved);
                }
            }
        }

        match form.advance().await {
            Ok(AdvanceOutcome::Moved { .. }) => {}
            Ok(AdvanceOutcome::Blocked { focus, errors }) => {
                for issue in errors.iter() {
                    writeln!(out, "  ! {}: {}", issue.field.label(), issue.message)?;
                }
                // The last step re-checks every step; send the user to the first bad one
                let owner = focus.and_then(|field| {
                    form.steps().iter().position(|step| step.owns(field))
                });
                if let Some(owner) = owner.filter(|owner| *owner != index) {
                    form.go_to_step(owner);
                }
            }
            Ok(AdvanceOutcome::Submitted(entry)) => {
                writeln!(out)?;
                writeln!(out, "{}", Preview::from_draft(&BookDraft::from(&entry)))?;
                writeln!(out)?;
                writeln!(out, "Entry saved.")?;
                return Ok(SessionEnd::Submitted(entry));
            }
            Ok(AdvanceOutcome::AlreadySubmitted) => return Ok(SessionEnd::Saved),
            Err(e) => {
                return Err(e).context("Could not save the entry; your answers were kept")
            }
        }
    }
}

/// Prompt for one field until the answer parses or is a command
fn ask<R: BufRead, W: Write>(
    field: Field,
    draft: &BookDraft,
    input: &mut R,
    out: &mut W,
) -> Result<Answer> {
    let marker = if is_required(field, draft) { "*" } else { "" };
    let current = display_value(field, draft);
    if let Some(hint) = hint(field) {
        writeln!(out, "  {}", hint)?;
    }

    loop {
        if current.is_empty() {
            write!(out, "{}{}: ", field.label(), marker)?;
        } else {
            write!(out, "{}{} [{}]: ", field.label(), marker, current)?;
        }
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Answer::Quit);
        }
        let answer = match line.trim() {
            "" => Answer::Keep,
            ":back" => Answer::Back,
            ":reset" => Answer::Reset,
            ":quit" => Answer::Quit,
            text => match parse_edit(field, text) {
                Ok(edit) => Answer::Edit(edit),
                Err(message) => {
                    writeln!(out, "  ! {}", message)?;
                    continue;
                }
            },
        };
        return Ok(answer);
    }
}

fn hint(field: Field) -> Option<String> {
    match field {
        Field::Status => Some(status_choices()),
        Field::PublishedDate => Some("YYYY-MM-DD".to_string()),
        Field::StartDate | Field::EndDate => Some("YYYY-MM-DD, or - to clear".to_string()),
        Field::Rating => Some("0.5 to 5 in half steps".to_string()),
        Field::Quotes => Some("Separate quotes with ;".to_string()),
        _ => None,
    }
}

/// Drop a date the current status no longer allows
fn clear_locked_date<B, N, S>(form: &mut StepForm<B, N, S>, field: Field)
where
    B: StorageBackend + 'static,
    N: Navigator,
    S: Submitter,
{
    let values = form.values();
    match field {
        Field::StartDate if values.start_date.is_some() => {
            form.set_value(FieldEdit::StartDate(None))
        }
        Field::EndDate if values.end_date.is_some() => form.set_value(FieldEdit::EndDate(None)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use readlog_core::{MemoryStore, Persistence, SubmitError};
    use std::sync::Mutex;

    const KEY: &str = "multi-step-form-data";

    #[derive(Default)]
    struct Inbox(Mutex<Vec<BookEntry>>);

    #[async_trait]
    impl Submitter for Inbox {
        async fn submit(&self, entry: &BookEntry) -> std::result::Result<(), SubmitError> {
            self.0.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    fn form(query: &str) -> StepForm<MemoryStore, MemoryNavigator, Arc<Inbox>> {
        StepForm::new(
            MemoryNavigator::new(query),
            Arc::new(Persistence::new(MemoryStore::new())),
            Arc::new(Inbox::default()),
        )
    }

    async fn run(
        form: &mut StepForm<MemoryStore, MemoryNavigator, Arc<Inbox>>,
        lines: &[&str],
    ) -> (SessionEnd, String) {
        let input = lines.join("\n") + "\n";
        let mut out = Vec::new();
        let end = run_session(form, input.as_bytes(), &mut out).await.unwrap();
        (end, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_wish_list_walk_submits() {
        let mut form = form("");
        let (end, out) = run(
            &mut form,
            &[
                "Dune",
                "Frank Herbert",
                "1965-08-01",
                "412",
                "",
                "y",
                "4",
                "",
                "Fear is the mind-killer.; I must not fear.",
                "n",
            ],
        )
        .await;

        let SessionEnd::Submitted(entry) = end else {
            panic!("expected submission, got:\n{}", out);
        };
        assert_eq!(entry.title, "Dune");
        assert_eq!(entry.quotes.len(), 2);
        assert!(entry.start_date.is_none());
        assert!(out.contains("Step 5/5: Privacy  (?step=5)"));
        assert!(out.contains("Entry saved."));
        assert_eq!(form.storage().backend().raw(KEY), None);
    }

    #[tokio::test]
    async fn test_blocked_step_lists_issues() {
        let mut form = form("");
        let (end, out) = run(&mut form, &["", "", "", "", ""]).await;

        assert!(matches!(end, SessionEnd::Saved));
        assert!(out.contains("Title: Enter the book title."));
        assert!(out.contains("Some answers on this step need fixing."));
        assert_eq!(form.current_index(), 0);
    }

    #[tokio::test]
    async fn test_bad_answer_is_asked_again() {
        let mut form = form("");
        let (_, out) = run(&mut form, &["Dune", "Frank Herbert", "1965-08-01", "abc", "412"]).await;

        assert!(out.contains("Use digits only"));
        assert_eq!(form.values().total_pages, "412");
    }

    #[tokio::test]
    async fn test_back_command() {
        let mut form = form("?step=2");
        let (_, out) = run(&mut form, &[":back"]).await;
        assert!(out.contains("Step 1/5: Book info"));
        assert_eq!(form.current_index(), 0);
    }

    #[tokio::test]
    async fn test_quit_keeps_draft() {
        let mut form = form("");
        let (end, out) = run(&mut form, &["Dune", ":quit"]).await;

        assert!(matches!(end, SessionEnd::Saved));
        assert!(out.contains("Draft saved."));
        assert!(form.storage().backend().raw(KEY).unwrap().contains("Dune"));
    }

    #[tokio::test]
    async fn test_resume_and_reset() {
        let store = MemoryStore::new();
        store
            .insert_raw(KEY, r#"{"title":"Piranesi","status":"WISH"}"#)
            .unwrap();
        let mut form = StepForm::new(
            MemoryNavigator::new(""),
            Arc::new(Persistence::new(store)),
            Arc::new(Inbox::default()),
        );

        let (_, out) = run(&mut form, &[":reset"]).await;
        assert!(out.contains("Resuming your saved draft."));
        assert!(out.contains("Title* [Piranesi]: "));
        assert!(out.contains("Form cleared."));
        assert_eq!(form.values().title, "");
        assert_eq!(form.storage().backend().raw(KEY), None);
    }

    #[tokio::test]
    async fn test_switching_to_wish_drops_reading_dates() {
        let mut form = form("");
        form.mount().await;
        form.set_value(FieldEdit::Status(readlog_core::ReadingStatus::Reading));
        form.set_value(FieldEdit::StartDate(Some("2024-01-02".to_string())));

        let (_, _) = run(&mut form, &["", "", "", "", "1"]).await;
        assert_eq!(form.values().start_date, None);
    }
}
