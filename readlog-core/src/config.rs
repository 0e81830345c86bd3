//! Form configuration

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::storage::StorageKey;
use crate::url::DEFAULT_STEP_PARAM;
use std::time::Duration;

/// Settings for one multi-step form instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    /// Slot the in-progress snapshot is written to
    pub persistence_key: StorageKey,

    /// Quiet period before a change is persisted or previewed
    pub debounce: Duration,

    /// Name of the query token carrying the 1-based step number
    pub step_param: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            persistence_key: StorageKey::MultiStepFormData,
            debounce: DEFAULT_DEBOUNCE,
            step_param: DEFAULT_STEP_PARAM.to_string(),
        }
    }
}
