//! Reading status and the date rules attached to each status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Where the reader is with a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReadingStatus {
    /// On the wish list, not started
    #[default]
    Wish,

    /// Currently being read
    Reading,

    /// Finished
    Done,

    /// Started, then put aside
    Pause,
}

impl ReadingStatus {
    /// All statuses in display order
    pub const ALL: [ReadingStatus; 4] = [
        ReadingStatus::Wish,
        ReadingStatus::Reading,
        ReadingStatus::Done,
        ReadingStatus::Pause,
    ];

    /// Wire name, as stored in snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Wish => "WISH",
            ReadingStatus::Reading => "READING",
            ReadingStatus::Done => "DONE",
            ReadingStatus::Pause => "PAUSE",
        }
    }

    /// Human-readable label for pickers and badges
    pub fn label(&self) -> &'static str {
        match self {
            ReadingStatus::Wish => "Want to read",
            ReadingStatus::Reading => "Reading",
            ReadingStatus::Done => "Finished",
            ReadingStatus::Pause => "Paused",
        }
    }

    /// Which reading dates this status allows and requires
    pub fn date_policy(&self) -> DatePolicy {
        match self {
            ReadingStatus::Wish => DatePolicy {
                start_allowed: false,
                start_required: false,
                end_allowed: false,
                end_required: false,
            },
            ReadingStatus::Reading | ReadingStatus::Pause => DatePolicy {
                start_allowed: true,
                start_required: true,
                end_allowed: true,
                end_required: false,
            },
            ReadingStatus::Done => DatePolicy {
                start_allowed: true,
                start_required: true,
                end_allowed: true,
                end_required: true,
            },
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown status name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown reading status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ReadingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ReadingStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus(trimmed.to_string()))
    }
}

/// Start/end date presence rules for one status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePolicy {
    pub start_allowed: bool,
    pub start_required: bool,
    pub end_allowed: bool,
    pub end_required: bool,
}
