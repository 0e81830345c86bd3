//! Step controller
//!
//! [`StepForm`] is the single authority for which step is active, whether the
//! user may advance, when form state is persisted and how the form resets.
//!
//! - The active index is read from the navigator on every call; it is never
//!   stored here.
//! - `advance` validates only the active step's fields. On failure it focuses
//!   the first failing field and stays put; on the last step it submits.
//! - Every change re-arms a debounced snapshot write, but only while the form
//!   is dirty. Writes carry the generation they were scheduled in. Submit,
//!   reset and flush start a new generation under the write lock, so a write
//!   that is already running finishes first and an older one never lands.

use crate::config::FormConfig;
use crate::debounce::{Debounced, Debouncer};
use crate::error::{Result, SubmitError};
use crate::preview::Preview;
use crate::schema::{BookEntrySchema, ValidationErrors};
use crate::steps::{self, StepDefinition, StepRegistry};
use crate::storage::{Persistence, StorageBackend};
use crate::types::{BookDraft, BookEntry, Field, FieldEdit, FieldMap};
use crate::url::{NavigationMode, Navigator, UrlStep};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{watch, Mutex, OwnedMutexGuard};

/// Receives the validated entry from the last step
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, entry: &BookEntry) -> std::result::Result<(), SubmitError>;
}

#[async_trait]
impl<S: Submitter + ?Sized> Submitter for Arc<S> {
    async fn submit(&self, entry: &BookEntry) -> std::result::Result<(), SubmitError> {
        (**self).submit(entry).await
    }
}

/// Result of [`StepForm::advance`]
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// Validation failed; nothing moved and `focus` received focus
    Blocked {
        focus: Option<Field>,
        errors: ValidationErrors,
    },

    /// Navigated forward one step
    Moved { from: usize, to: usize },

    /// The last step was valid and the entry was delivered
    Submitted(BookEntry),

    /// The entry was already delivered and nothing changed since
    AlreadySubmitted,
}

/// Where the final submission stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Editing,
    Submitted,
    /// The last attempt failed; the snapshot is kept so it can be retried
    Failed(SubmitError),
}

/// Values, inline errors and focus for one form instance
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    values: BookDraft,
    baseline: BookDraft,
    errors: FieldMap<String>,
    focused: Option<Field>,
}

impl FormState {
    pub fn new(initial: BookDraft) -> Self {
        Self {
            values: initial.clone(),
            baseline: initial,
            errors: FieldMap::new(),
            focused: None,
        }
    }

    pub fn values(&self) -> &BookDraft {
        &self.values
    }

    pub fn errors(&self) -> &FieldMap<String> {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn focused(&self) -> Option<Field> {
        self.focused
    }

    /// Values differ from the last restored, reset or submitted state
    pub fn is_dirty(&self) -> bool {
        self.values != self.baseline
    }

    fn reset_to(&mut self, values: BookDraft) {
        *self = Self::new(values);
    }

    fn mark_clean(&mut self) {
        self.baseline = self.values.clone();
    }

    /// Replace the shown errors of `fields` with the first issue of each
    fn apply_errors(&mut self, fields: &[Field], issues: &ValidationErrors) {
        for &field in fields {
            match issues.first_for(field) {
                Some(issue) => self.errors.insert(field, issue.message.clone()),
                None => self.errors.remove(field),
            };
        }
    }
}

/// What a renderer needs to draw the active step
#[derive(Debug, Clone, Copy)]
pub struct StepView<'a> {
    pub index: usize,
    pub total: usize,
    pub step: &'a StepDefinition,
    pub values: &'a BookDraft,
    pub errors: &'a FieldMap<String>,
    pub focused: Option<Field>,
}

impl StepView<'_> {
    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_required(&self, field: Field) -> bool {
        steps::is_required(field, self.values)
    }

    pub fn is_enabled(&self, field: Field) -> bool {
        steps::is_enabled(field, self.values)
    }

    /// Any owned field shows an error (drives the step-level banner)
    pub fn has_errors(&self) -> bool {
        self.step.fields.iter().any(|field| self.errors.contains(*field))
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }
}

/// Multi-step form orchestrator
pub struct StepForm<B, N, S>
where
    B: StorageBackend + 'static,
{
    registry: StepRegistry,
    schema: BookEntrySchema,
    config: FormConfig,
    url: UrlStep,
    navigator: N,
    storage: Arc<Persistence<B>>,
    submitter: S,
    defaults: BookDraft,
    state: FormState,
    submit_state: SubmitState,
    persist_timer: Debouncer,
    /// Generation of the snapshot writes that may still land
    persist_gate: Arc<Mutex<u64>>,
    persist_generation: u64,
    preview: Debounced<BookDraft>,
}

impl<B, N, S> StepForm<B, N, S>
where
    B: StorageBackend + 'static,
    N: Navigator,
    S: Submitter,
{
    /// A book form with default steps, schema and configuration
    pub fn new(navigator: N, storage: Arc<Persistence<B>>, submitter: S) -> Self {
        let config = FormConfig::default();
        let registry = StepRegistry::book_form();
        let defaults = BookDraft::default();
        Self {
            url: UrlStep::with_param(config.step_param.clone(), registry.len()),
            persist_timer: Debouncer::new(config.debounce),
            persist_gate: Arc::new(Mutex::new(0)),
            persist_generation: 0,
            preview: Debounced::new(defaults.clone(), config.debounce),
            state: FormState::new(defaults.clone()),
            registry,
            schema: BookEntrySchema::for_today(),
            config,
            navigator,
            storage,
            submitter,
            defaults,
            submit_state: SubmitState::Editing,
        }
    }

    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.url = UrlStep::with_param(config.step_param.clone(), self.registry.len());
        self.persist_timer = Debouncer::new(config.debounce);
        self.preview = Debounced::new(self.state.values.clone(), config.debounce);
        self.config = config;
        self
    }

    pub fn with_schema(mut self, schema: BookEntrySchema) -> Self {
        self.schema = schema;
        self
    }

    /// Values the form starts from and returns to on reset
    pub fn with_defaults(mut self, defaults: BookDraft) -> Self {
        self.state = FormState::new(defaults.clone());
        self.preview.set_now(defaults.clone());
        self.defaults = defaults;
        self
    }

    /// Restore any saved snapshot and correct the step token.
    ///
    /// Returns the active step index.
    pub async fn mount(&mut self) -> usize {
        if let Some(saved) = self
            .storage
            .get::<BookDraft>(self.config.persistence_key)
            .await
        {
            tracing::debug!("Restored saved draft \"{}\"", saved.title);
            self.state.reset_to(saved);
            self.preview.set_now(self.state.values.clone());
        }
        self.sync_url()
    }

    /// Re-read the step token, replacing it with step 1 when invalid
    pub fn sync_url(&mut self) -> usize {
        self.url.sync(&mut self.navigator)
    }

    pub fn current_index(&self) -> usize {
        self.url.current_index(&self.navigator)
    }

    pub fn current_step(&self) -> Option<&StepDefinition> {
        self.registry.get(self.current_index())
    }

    pub fn steps(&self) -> &[StepDefinition] {
        self.registry.ordered_steps()
    }

    pub fn is_first_step(&self) -> bool {
        self.url.is_first(self.current_index())
    }

    pub fn is_last_step(&self) -> bool {
        self.url.is_last(self.current_index())
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn values(&self) -> &BookDraft {
        &self.state.values
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.state.error(field)
    }

    pub fn focused(&self) -> Option<Field> {
        self.state.focused
    }

    pub fn is_dirty(&self) -> bool {
        self.state.is_dirty()
    }

    pub fn submit_state(&self) -> &SubmitState {
        &self.submit_state
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Host-driven navigation (e.g. the back button); follow with [`Self::sync_url`]
    pub fn navigator_mut(&mut self) -> &mut N {
        &mut self.navigator
    }

    pub fn storage(&self) -> &Persistence<B> {
        &self.storage
    }

    pub fn current_view(&self) -> Option<StepView<'_>> {
        let index = self.current_index();
        self.registry.get(index).map(|step| StepView {
            index,
            total: self.registry.len(),
            step,
            values: &self.state.values,
            errors: &self.state.errors,
            focused: self.state.focused,
        })
    }

    /// Whether the active step shows any field error
    pub fn step_has_errors(&self) -> bool {
        self.current_view().is_some_and(|view| view.has_errors())
    }

    /// Preview from the last settled (debounced) values
    pub fn preview(&self) -> Preview {
        Preview::from_draft(&self.preview.settled())
    }

    /// Receives values once edits pause for the debounce window
    pub fn subscribe_preview(&self) -> watch::Receiver<BookDraft> {
        self.preview.subscribe()
    }

    /// Write one field.
    ///
    /// Fields already showing an error are re-validated so fixes clear
    /// immediately. Then a snapshot write and a preview refresh are scheduled.
    pub fn set_value(&mut self, edit: FieldEdit) {
        let before = self.state.values.clone();
        self.state.values.apply(edit);
        if self.state.values == before {
            return;
        }
        self.submit_state = SubmitState::Editing;

        let shown: Vec<Field> = self.state.errors.iter().map(|(field, _)| field).collect();
        if !shown.is_empty() {
            self.revalidate(&shown);
        }

        self.schedule_persist();
        self.preview.set(self.state.values.clone());
    }

    /// Validate a field when it loses focus
    pub fn blur(&mut self, field: Field) {
        self.revalidate(&[field]);
    }

    fn revalidate(&mut self, fields: &[Field]) {
        let issues = self.schema.validate_fields(&self.state.values, fields);
        self.state.apply_errors(fields, &issues);
    }

    /// Validate the active step and move forward, or submit on the last step
    pub async fn advance(&mut self) -> Result<AdvanceOutcome> {
        let index = self.current_index();
        let Some(step) = self.registry.get(index).copied() else {
            return Ok(AdvanceOutcome::Blocked {
                focus: None,
                errors: ValidationErrors::default(),
            });
        };

        let issues = self.schema.validate_fields(&self.state.values, step.fields);
        self.state.apply_errors(step.fields, &issues);
        if !issues.is_empty() {
            let focus = issues.first_field_in(step.fields);
            self.state.focused = focus;
            tracing::debug!("Step \"{}\" blocked on {:?}", step.label, focus);
            return Ok(AdvanceOutcome::Blocked {
                focus,
                errors: issues,
            });
        }

        if !self.url.is_last(index) {
            self.url
                .navigate_to_step(&mut self.navigator, index + 2, NavigationMode::Push);
            tracing::debug!("Advanced to step {}", index + 2);
            return Ok(AdvanceOutcome::Moved {
                from: index,
                to: index + 1,
            });
        }

        self.submit().await
    }

    async fn submit(&mut self) -> Result<AdvanceOutcome> {
        if self.submit_state == SubmitState::Submitted {
            return Ok(AdvanceOutcome::AlreadySubmitted);
        }

        // Earlier steps may have been skipped through the address bar
        let entry = match self.schema.validate(&self.state.values) {
            Ok(entry) => entry,
            Err(errors) => {
                let order = self.registry.field_order();
                self.state.apply_errors(&order, &errors);
                let focus = errors.first_field_in(&order);
                self.state.focused = focus;
                return Ok(AdvanceOutcome::Blocked { focus, errors });
            }
        };

        match self.submitter.submit(&entry).await {
            Ok(()) => {
                let _gate = self.fence_persist().await;
                self.storage.remove(self.config.persistence_key).await;
                self.state.mark_clean();
                self.submit_state = SubmitState::Submitted;
                tracing::info!("Submitted \"{}\"", entry.title);
                Ok(AdvanceOutcome::Submitted(entry))
            }
            Err(e) => {
                tracing::warn!("Submission of \"{}\" failed: {}", entry.title, e);
                self.submit_state = SubmitState::Failed(e.clone());
                self.flush().await;
                Err(e.into())
            }
        }
    }

    /// Step back one page without validating. Returns false on the first step.
    pub fn go_back(&mut self) -> bool {
        let index = self.current_index();
        if self.url.is_first(index) {
            return false;
        }
        // The 1-based number of the previous step equals the current index
        self.url
            .navigate_to_step(&mut self.navigator, index, NavigationMode::Push);
        true
    }

    /// Jump straight to a step, as a step indicator would.
    ///
    /// No validation runs. Returns false when `index` is out of range.
    pub fn go_to_step(&mut self, index: usize) -> bool {
        if index >= self.registry.len() {
            return false;
        }
        if index != self.current_index() {
            self.url
                .navigate_to_step(&mut self.navigator, index + 1, NavigationMode::Push);
        }
        true
    }

    /// Drop the snapshot, restore defaults and return to the first step
    pub async fn reset(&mut self) {
        {
            let _gate = self.fence_persist().await;
            self.storage.remove(self.config.persistence_key).await;
        }
        self.state.reset_to(self.defaults.clone());
        self.submit_state = SubmitState::Editing;
        self.preview.set_now(self.defaults.clone());
        if self.current_index() == 0 {
            // Already on step 1; only a bad token needs rewriting
            self.sync_url();
        } else {
            self.url
                .navigate_to_step(&mut self.navigator, 1, NavigationMode::Push);
        }
        tracing::debug!("Form reset");
    }

    /// Write any pending snapshot now instead of waiting for the timer
    pub async fn flush(&mut self) {
        let _gate = self.fence_persist().await;
        if self.state.is_dirty() {
            self.storage
                .set(self.config.persistence_key, &self.state.values)
                .await;
        }
    }

    /// Cancel pending timers; called when the host tears the form down
    pub fn teardown(&mut self) {
        self.persist_timer.cancel();
        self.preview.cancel();
    }

    /// Cancel the timer and retire every scheduled write.
    ///
    /// Waits for a write that is already running. Holding the guard keeps
    /// newer writes out until the caller is done with storage.
    async fn fence_persist(&mut self) -> OwnedMutexGuard<u64> {
        self.persist_timer.cancel();
        let mut current = Arc::clone(&self.persist_gate).lock_owned().await;
        self.persist_generation += 1;
        *current = self.persist_generation;
        current
    }

    fn schedule_persist(&mut self) {
        if !self.state.is_dirty() {
            self.persist_timer.cancel();
            return;
        }
        let storage = Arc::clone(&self.storage);
        let gate = Arc::clone(&self.persist_gate);
        let generation = self.persist_generation;
        let key = self.config.persistence_key;
        let snapshot = self.state.values.clone();
        self.persist_timer.arm(async move {
            // Detached: cancelling the timer must not cut a write in half
            tokio::spawn(async move {
                let current = gate.lock().await;
                if *current == generation {
                    storage.set(key, &snapshot).await;
                } else {
                    tracing::debug!("Dropped a snapshot write from generation {}", generation);
                }
            });
        });
    }
}
