//! Rules for filling the description field from the selected category.
//!
//! The field starts as a convenience default and must never clobber text the
//! user typed on purpose. Text counts as derived, and may be replaced, when it
//! is empty, when it equals the most recently computed label, or when it
//! equals the display name of any known category or subcategory.

use std::collections::HashSet;

use crate::domain::transaction::Transaction;
use crate::domain::types::CategoryId;
use crate::dto::categories::CategoryNode;

use super::categories::find_label;

/// Decides whether `current_text` may be replaced by the newly computed
/// label. The label itself does not take part in the decision.
///
/// `prior_label` is the label most recently computed for the record being
/// edited: the original category label at first, then whatever was last
/// auto-filled.
pub fn should_auto_fill_description(
    current_text: &str,
    _new_label: &str,
    prior_label: Option<&str>,
    is_editing_existing: bool,
) -> bool {
    let current = current_text.trim();
    if current.is_empty() {
        return true;
    }
    is_editing_existing && prior_label.is_some_and(|prior| prior.trim() == current)
}

/// Description field state of the form being filled in.
///
/// Re-evaluates the auto-fill policy on every category or subcategory change.
#[derive(Debug, Clone)]
pub struct DescriptionDraft {
    text: String,
    prior_label: Option<String>,
    editing_existing: bool,
    auto_filled: bool,
    hierarchy: Vec<CategoryNode>,
    known_labels: HashSet<String>,
}

impl DescriptionDraft {
    /// Draft for a new record.
    pub fn new(hierarchy: &[CategoryNode]) -> Self {
        Self {
            text: String::new(),
            prior_label: None,
            editing_existing: false,
            auto_filled: false,
            hierarchy: hierarchy.to_vec(),
            known_labels: known_labels(hierarchy),
        }
    }

    /// Draft for editing `record`; its original category label is the
    /// starting point for divergence checks.
    pub fn for_existing(hierarchy: &[CategoryNode], record: &Transaction) -> Self {
        Self {
            text: record.description.clone(),
            prior_label: find_label(
                hierarchy,
                &record.category_id,
                record.subcategory_id.as_ref(),
            ),
            editing_existing: true,
            auto_filled: false,
            hierarchy: hierarchy.to_vec(),
            known_labels: known_labels(hierarchy),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Records text typed by the user.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Applies a category selection. Returns `true` when the text was
    /// replaced by the derived label.
    pub fn select_category(
        &mut self,
        category_id: &CategoryId,
        subcategory_id: Option<&CategoryId>,
    ) -> bool {
        let Some(label) = find_label(&self.hierarchy, category_id, subcategory_id) else {
            return false;
        };

        if self.text.trim() == label {
            // Already showing the label; keep tracking it as derived.
            self.prior_label = Some(label);
            self.auto_filled = true;
            return false;
        }

        let replace = should_auto_fill_description(
            &self.text,
            &label,
            self.prior_label.as_deref(),
            self.editing_existing || self.auto_filled,
        ) || self.known_labels.contains(self.text.trim());

        if replace {
            self.text = label.clone();
            self.prior_label = Some(label);
            self.auto_filled = true;
        }
        replace
    }
}

fn known_labels(hierarchy: &[CategoryNode]) -> HashSet<String> {
    hierarchy
        .iter()
        .flat_map(|node| {
            std::iter::once(node.name.clone())
                .chain(node.subcategories.iter().map(|s| s.name.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::CategoryRecord;
    use crate::domain::types::{CategoryName, Recurrence, TransactionId};
    use crate::services::categories::build_hierarchy;
    use chrono::DateTime;

    fn id(value: &str) -> CategoryId {
        CategoryId::new(value).unwrap()
    }

    fn tree() -> Vec<CategoryNode> {
        let record = |i: &str, name: &str, parent: Option<&str>| CategoryRecord {
            id: id(i),
            name: CategoryName::new(name).unwrap(),
            icon: None,
            color: None,
            parent_id: parent.map(id),
            is_custom: false,
        };
        build_hierarchy(&[
            record("food", "Food", None),
            record("bakery", "Bakery", Some("food")),
            record("transport", "Transport", None),
            record("taxi", "Taxi", Some("transport")),
        ])
    }

    fn existing(description: &str) -> Transaction {
        let epoch = DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Transaction {
            id: TransactionId::new("t-1").unwrap(),
            amount: "10".parse().unwrap(),
            description: description.to_string(),
            category_id: id("food"),
            subcategory_id: None,
            date: epoch,
            recurrence: Recurrence::None,
            created_at: epoch,
            updated_at: None,
            client_reference: None,
        }
    }

    #[test]
    fn empty_text_is_always_filled() {
        assert!(should_auto_fill_description("   ", "Food", None, false));
        assert!(should_auto_fill_description("", "Food", Some("Rent"), true));
    }

    #[test]
    fn text_matching_the_prior_label_is_filled_when_editing() {
        assert!(should_auto_fill_description("Food", "Transport", Some("Food"), true));
        assert!(!should_auto_fill_description("Food", "Transport", Some("Food"), false));
    }

    #[test]
    fn prior_label_is_filled_even_when_it_equals_the_new_label() {
        assert!(should_auto_fill_description("Food", "Food", Some("Food"), true));
        assert!(!should_auto_fill_description("Food", "Food", None, false));
    }

    #[test]
    fn custom_text_is_preserved() {
        assert!(!should_auto_fill_description(
            "Dinner with Sam",
            "Transport",
            Some("Food"),
            true
        ));
    }

    #[test]
    fn empty_draft_takes_the_category_name() {
        let mut draft = DescriptionDraft::new(&tree());

        assert!(draft.select_category(&id("food"), None));
        assert_eq!(draft.text(), "Food");
    }

    #[test]
    fn custom_text_survives_category_switches() {
        let mut draft = DescriptionDraft::new(&tree());
        draft.select_category(&id("food"), None);
        draft.set_text("Birthday cake");

        assert!(!draft.select_category(&id("transport"), None));
        assert!(!draft.select_category(&id("food"), Some(&id("bakery"))));
        assert_eq!(draft.text(), "Birthday cake");
    }

    #[test]
    fn accepted_labels_follow_repeated_switches() {
        let mut draft = DescriptionDraft::new(&tree());
        draft.select_category(&id("food"), None);

        assert!(draft.select_category(&id("transport"), None));
        assert!(draft.select_category(&id("transport"), Some(&id("taxi"))));
        assert!(draft.select_category(&id("food"), Some(&id("bakery"))));
        assert_eq!(draft.text(), "Bakery");
    }

    #[test]
    fn editing_replaces_the_original_label_but_not_custom_text() {
        let mut derived = DescriptionDraft::for_existing(&tree(), &existing("Food"));
        assert!(derived.select_category(&id("transport"), None));
        assert_eq!(derived.text(), "Transport");

        let mut custom = DescriptionDraft::for_existing(&tree(), &existing("Groceries for the week"));
        assert!(!custom.select_category(&id("transport"), None));
        assert_eq!(custom.text(), "Groceries for the week");
    }

    #[test]
    fn any_known_category_name_counts_as_derived() {
        let mut draft = DescriptionDraft::new(&tree());
        draft.set_text("Taxi");

        assert!(draft.select_category(&id("food"), None));
        assert_eq!(draft.text(), "Food");
    }
}
