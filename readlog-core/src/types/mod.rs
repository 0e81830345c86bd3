//! Core types for the reading-log form

mod entry;
mod field;
mod rating;
mod status;

pub use entry::{BookDraft, BookEntry, FieldEdit};
pub use field::{Field, FieldMap};
pub use rating::{InvalidRating, Rating};
pub use status::{DatePolicy, ReadingStatus, UnknownStatus};
