//! Readlog Core Library
//!
//! This crate provides the reading-log entry model, its validation schema and
//! the multi-step form controller that walks a user through filling one in.
//! In-progress answers are persisted through a pluggable storage backend and
//! the active step is mirrored into a `?step=N` query token.

pub mod config;
pub mod controller;
pub mod date;
pub mod debounce;
pub mod error;
pub mod number;
pub mod preview;
pub mod schema;
pub mod steps;
pub mod storage;
pub mod types;
pub mod url;

pub use config::FormConfig;
pub use controller::{AdvanceOutcome, FormState, StepForm, StepView, SubmitState, Submitter};
pub use error::{ReadlogError, Result, StorageError, SubmitError};
pub use preview::Preview;
pub use schema::{BookEntrySchema, FieldIssue, ValidationErrors};
pub use steps::{StepDefinition, StepKind, StepRegistry};
pub use storage::{ExecutionContext, FileStore, MemoryStore, Persistence, StorageKey};
pub use types::{
    BookDraft, BookEntry, DatePolicy, Field, FieldEdit, FieldMap, Rating, ReadingStatus,
};
pub use url::{MemoryNavigator, NavigationMode, Navigator, QueryParams, UrlStep};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form_shape() {
        let registry = StepRegistry::default();
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.field_order().len(), Field::ALL.len());
        assert_eq!(FormConfig::default().persistence_key.as_str(), "multi-step-form-data");
    }
}
