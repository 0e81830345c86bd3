//! Step registry for the multi-step book form

use crate::types::{BookDraft, Field, Rating, ReadingStatus};
use serde::Serialize;

/// Which renderer draws a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    BookInfo,
    Rating,
    Review,
    Quotes,
    Privacy,
}

/// One page of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepDefinition {
    pub order: u32,
    pub kind: StepKind,
    pub label: &'static str,
    /// Fields owned by this step, in focus order
    pub fields: &'static [Field],
}

impl StepDefinition {
    pub fn owns(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }
}

/// Definitions for the reading-log form, declared by order
pub const BOOK_FORM_STEPS: [StepDefinition; 5] = [
    StepDefinition {
        order: 1,
        kind: StepKind::BookInfo,
        label: "Book info",
        fields: &[
            Field::Title,
            Field::Author,
            Field::PublishedDate,
            Field::TotalPages,
            Field::Status,
            Field::StartDate,
            Field::EndDate,
        ],
    },
    StepDefinition {
        order: 2,
        kind: StepKind::Rating,
        label: "Recommendation & rating",
        fields: &[Field::Recommend, Field::Rating],
    },
    StepDefinition {
        order: 3,
        kind: StepKind::Review,
        label: "Review",
        fields: &[Field::Review],
    },
    StepDefinition {
        order: 4,
        kind: StepKind::Quotes,
        label: "Quotes",
        fields: &[Field::Quotes],
    },
    StepDefinition {
        order: 5,
        kind: StepKind::Privacy,
        label: "Privacy",
        fields: &[Field::IsPublic],
    },
];

/// Ordered, immutable list of steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRegistry {
    steps: Vec<StepDefinition>,
}

impl StepRegistry {
    /// Build a registry; steps are stably sorted by `order`
    pub fn new(definitions: impl IntoIterator<Item = StepDefinition>) -> Self {
        let mut steps: Vec<StepDefinition> = definitions.into_iter().collect();
        steps.sort_by_key(|step| step.order);
        Self { steps }
    }

    pub fn book_form() -> Self {
        Self::new(BOOK_FORM_STEPS)
    }

    pub fn ordered_steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Index and definition of the step that owns `field`
    pub fn step_for_field(&self, field: Field) -> Option<(usize, &StepDefinition)> {
        self.steps.iter().enumerate().find(|(_, step)| step.owns(field))
    }

    /// Every field, in step order then field order
    pub fn field_order(&self) -> Vec<Field> {
        self.steps
            .iter()
            .flat_map(|step| step.fields.iter().copied())
            .collect()
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::book_form()
    }
}

/// Whether a field must be filled in, given the rest of the draft.
///
/// Renderers use this to mark inputs; the schema enforces the same rules.
pub fn is_required(field: Field, draft: &BookDraft) -> bool {
    let policy = draft.status.map(|status| status.date_policy());
    match field {
        Field::Title
        | Field::Author
        | Field::PublishedDate
        | Field::TotalPages
        | Field::Status
        | Field::Rating => true,
        Field::StartDate => policy.is_some_and(|p| p.start_required),
        Field::EndDate => policy.is_some_and(|p| p.end_required),
        Field::Review => Rating::new(draft.rating).is_ok_and(|rating| rating.is_extreme()),
        Field::Recommend | Field::Quotes | Field::IsPublic => false,
    }
}

/// Whether the field may be filled at all (dates are locked for wish-list books)
pub fn is_enabled(field: Field, draft: &BookDraft) -> bool {
    let status = draft.status.unwrap_or(ReadingStatus::Wish);
    match field {
        Field::StartDate => status.date_policy().start_allowed,
        Field::EndDate => status.date_policy().end_allowed,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_sorts_by_order() {
        let mut shuffled = BOOK_FORM_STEPS;
        shuffled.reverse();
        let registry = StepRegistry::new(shuffled);
        let orders: Vec<u32> = registry.ordered_steps().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4, 5]);
        assert_eq!(registry, StepRegistry::book_form());
    }

    #[test]
    fn test_sort_is_stable_for_equal_orders() {
        let mut first = BOOK_FORM_STEPS[2];
        let mut second = BOOK_FORM_STEPS[3];
        first.order = 7;
        second.order = 7;
        let registry = StepRegistry::new([first, second]);
        assert_eq!(registry.get(0).unwrap().kind, StepKind::Review);
        assert_eq!(registry.get(1).unwrap().kind, StepKind::Quotes);
    }

    #[test]
    fn test_every_field_has_exactly_one_owner() {
        let registry = StepRegistry::book_form();
        let mut order = registry.field_order();
        assert_eq!(order.len(), Field::ALL.len());
        order.sort();
        assert_eq!(order, Field::ALL.to_vec());
    }

    #[test]
    fn test_step_for_field() {
        let registry = StepRegistry::book_form();
        let (index, step) = registry.step_for_field(Field::Rating).unwrap();
        assert_eq!(index, 1);
        assert_eq!(step.kind, StepKind::Rating);
    }

    #[test]
    fn test_required_follows_status_and_rating() {
        let mut draft = BookDraft::new();
        assert!(!is_required(Field::StartDate, &draft));
        assert!(!is_enabled(Field::StartDate, &draft));

        draft.status = Some(ReadingStatus::Done);
        assert!(is_required(Field::StartDate, &draft));
        assert!(is_required(Field::EndDate, &draft));
        assert!(is_enabled(Field::EndDate, &draft));

        assert!(!is_required(Field::Review, &draft));
        draft.rating = 1.0;
        assert!(is_required(Field::Review, &draft));
    }
}
