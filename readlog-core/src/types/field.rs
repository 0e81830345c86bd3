//! Closed set of form field names and a typed per-field map

use serde::{Deserialize, Serialize};
use std::fmt;

const FIELD_COUNT: usize = 12;

/// Every field of a book entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    Author,
    PublishedDate,
    TotalPages,
    Status,
    StartDate,
    EndDate,
    Recommend,
    Rating,
    Review,
    Quotes,
    IsPublic,
}

impl Field {
    /// All fields in declaration order
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Title,
        Field::Author,
        Field::PublishedDate,
        Field::TotalPages,
        Field::Status,
        Field::StartDate,
        Field::EndDate,
        Field::Recommend,
        Field::Rating,
        Field::Review,
        Field::Quotes,
        Field::IsPublic,
    ];

    /// Key used in serialized snapshots
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::PublishedDate => "publishedDate",
            Field::TotalPages => "totalPages",
            Field::Status => "status",
            Field::StartDate => "startDate",
            Field::EndDate => "endDate",
            Field::Recommend => "recommend",
            Field::Rating => "rating",
            Field::Review => "review",
            Field::Quotes => "quotes",
            Field::IsPublic => "isPublic",
        }
    }

    /// Label shown next to the input
    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Author => "Author",
            Field::PublishedDate => "Published date",
            Field::TotalPages => "Total pages",
            Field::Status => "Reading status",
            Field::StartDate => "Start date",
            Field::EndDate => "End date",
            Field::Recommend => "Recommend",
            Field::Rating => "Rating",
            Field::Review => "Review",
            Field::Quotes => "Quotes",
            Field::IsPublic => "Public",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A map with one optional slot per [`Field`]
///
/// Iteration always follows [`Field::ALL`] order, independent of insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap<T> {
    slots: [Option<T>; FIELD_COUNT],
}

impl<T> FieldMap<T> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub fn get(&self, field: Field) -> Option<&T> {
        self.slots[field.index()].as_ref()
    }

    /// Insert a value, returning the previous one
    pub fn insert(&mut self, field: Field, value: T) -> Option<T> {
        self.slots[field.index()].replace(value)
    }

    pub fn remove(&mut self, field: Field) -> Option<T> {
        self.slots[field.index()].take()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.slots[field.index()].is_some()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Occupied slots in field order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &T)> {
        Field::ALL
            .into_iter()
            .zip(self.slots.iter())
            .filter_map(|(field, slot)| slot.as_ref().map(|value| (field, value)))
    }
}

impl<T> Default for FieldMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_match_snapshot_keys() {
        for field in Field::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field.as_str()));
        }
    }

    #[test]
    fn test_field_map_iterates_in_field_order() {
        let mut map = FieldMap::new();
        map.insert(Field::Review, "short");
        map.insert(Field::Title, "empty");
        assert_eq!(map.len(), 2);

        let fields: Vec<Field> = map.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec![Field::Title, Field::Review]);

        assert_eq!(map.remove(Field::Title), Some("empty"));
        assert!(!map.contains(Field::Title));
        map.clear();
        assert!(map.is_empty());
    }
}
