//! Draft state for adding and editing tasks.
//!
//! The form is `Idle` or `Editing(task)`. It remembers which task it began
//! editing and only counts as editing while the store still holds that same
//! edit reference. If the store drops the edit on its own (a direct delete),
//! the next submit discards the stale draft instead of creating a task from it.

use serde::Serialize;

use crate::categories::default_category_id;
use crate::model::{Category, Task};
use crate::store::TaskStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub category: String,
}

impl Draft {
    pub fn blank(categories: &[Category]) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: default_category_id(categories),
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category.clone(),
        }
    }

    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState<'a> {
    Idle,
    Editing(&'a Task),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank title. Nothing changed.
    Rejected,
    Created(Task),
    Updated(Task),
}

#[derive(Debug, Clone)]
pub struct FormController {
    draft: Draft,
    categories: Vec<Category>,
    editing_id: Option<String>,
}

impl FormController {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            draft: Draft::blank(&categories),
            categories,
            editing_id: None,
        }
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn state<'a>(&self, store: &'a TaskStore) -> FormState<'a> {
        match (self.editing_id.as_deref(), store.editing()) {
            (Some(id), Some(task)) if task.id == id => FormState::Editing(task),
            _ => FormState::Idle,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.draft.category = category.into();
    }

    /// Step the draft category through the known categories, wrapping at either end.
    pub fn cycle_category(&mut self, forward: bool) {
        let len = self.categories.len();
        if len == 0 {
            return;
        }
        let current = self
            .categories
            .iter()
            .position(|category| category.id == self.draft.category);
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(idx), true) => (idx + 1) % len,
            (Some(0), false) => len - 1,
            (Some(idx), false) => idx - 1,
        };
        self.draft.category = self.categories[next].id.clone();
    }

    /// Enter editing for `id`, copying its fields into the draft.
    pub fn edit(&mut self, store: &mut TaskStore, id: &str) -> bool {
        match store.begin_edit(id) {
            Some(task) => {
                self.draft = Draft::from_task(task);
                self.editing_id = Some(task.id.clone());
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self, store: &mut TaskStore) {
        store.cancel_edit();
        self.reset();
    }

    pub fn reset(&mut self) {
        self.draft = Draft::blank(&self.categories);
        self.editing_id = None;
    }

    pub fn submit(&mut self, store: &mut TaskStore) -> SubmitOutcome {
        if !self.draft.is_submittable() {
            return SubmitOutcome::Rejected;
        }

        let Some(editing_id) = self.editing_id.clone() else {
            let created = store.create(
                &self.draft.title,
                &self.draft.description,
                &self.draft.category,
            );
            return match created {
                Some(task) => {
                    self.reset();
                    SubmitOutcome::Created(task)
                }
                None => SubmitOutcome::Rejected,
            };
        };

        if !store.is_editing(&editing_id) {
            tracing::debug!(task_id = editing_id.as_str(), "edit target gone, draft discarded");
            self.reset();
            return SubmitOutcome::Rejected;
        }

        // Completion may have been toggled since the edit began; keep the stored flag.
        let Some(current) = store.get(&editing_id).cloned() else {
            self.cancel(store);
            return SubmitOutcome::Rejected;
        };

        let updated = Task {
            title: self.draft.title.trim().to_string(),
            description: self.draft.description.trim().to_string(),
            category: self.draft.category.trim().to_string(),
            updated_at: store.now().max(current.updated_at),
            ..current
        };
        store.update(updated.clone());
        store.cancel_edit();
        self.reset();
        SubmitOutcome::Updated(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::default_categories;
    use crate::clock::{Clock, ManualClock};
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn setup() -> (FormController, TaskStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        ));
        let store = TaskStore::new(clock.clone());
        (FormController::new(default_categories()), store, clock)
    }

    #[test]
    fn blank_draft_defaults_to_first_category() {
        let (form, store, _clock) = setup();
        assert_eq!(
            form.draft(),
            &Draft {
                title: String::new(),
                description: String::new(),
                category: "1".into()
            }
        );
        assert_eq!(form.state(&store), FormState::Idle);

        let empty = FormController::new(Vec::new());
        assert_eq!(empty.draft().category, "");
    }

    #[test]
    fn submit_while_idle_creates_and_resets() {
        let (mut form, mut store, _clock) = setup();
        form.set_title("Buy milk");
        form.set_category("2");

        let outcome = form.submit(&mut store);
        let SubmitOutcome::Created(task) = outcome else {
            panic!("expected a created task, got {outcome:?}");
        };
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.category, "2");
        assert_eq!(store.len(), 1);
        assert_eq!(form.draft(), &Draft::blank(&default_categories()));
    }

    #[test]
    fn whitespace_title_is_rejected_in_any_state() {
        let (mut form, mut store, _clock) = setup();
        form.set_title("   ");
        form.set_description("kept");
        assert_eq!(form.submit(&mut store), SubmitOutcome::Rejected);
        assert_eq!(store.len(), 0);
        assert_eq!(form.draft().description, "kept");

        let task = store.create("Original", "", "1").unwrap();
        form.edit(&mut store, &task.id);
        form.set_title(" ");
        assert_eq!(form.submit(&mut store), SubmitOutcome::Rejected);
        assert!(matches!(form.state(&store), FormState::Editing(t) if t.id == task.id));
        assert_eq!(store.get(&task.id).unwrap().title, "Original");
    }

    #[test]
    fn edit_copies_fields_and_cancel_resets() {
        let (mut form, mut store, _clock) = setup();
        let task = store.create("Plan trip", "book hotel", "2").unwrap();
        let before = store.tasks().to_vec();

        assert!(form.edit(&mut store, &task.id));
        assert_eq!(form.draft(), &Draft::from_task(&task));

        form.cancel(&mut store);
        assert_eq!(form.state(&store), FormState::Idle);
        assert!(store.editing().is_none());
        assert_eq!(form.draft(), &Draft::blank(&default_categories()));
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn edit_unknown_id_stays_idle() {
        let (mut form, mut store, _clock) = setup();
        assert!(!form.edit(&mut store, "missing"));
        assert_eq!(form.state(&store), FormState::Idle);
    }

    #[test]
    fn submit_while_editing_updates_in_place() {
        let (mut form, mut store, clock) = setup();
        let a = store.create("A", "", "1").unwrap();
        let b = store.create("B", "", "1").unwrap();

        form.edit(&mut store, &a.id);
        clock.advance(Duration::minutes(2));
        store.toggle_complete(&a.id);
        clock.advance(Duration::minutes(2));
        form.set_title("  A revised ");
        form.set_description("more detail");
        form.set_category("5");

        let SubmitOutcome::Updated(updated) = form.submit(&mut store) else {
            panic!("expected update");
        };
        assert_eq!(updated.id, a.id);
        assert_eq!(updated.created_at, a.created_at);
        assert!(updated.completed);
        assert_eq!(updated.updated_at, clock.now());
        assert_eq!(updated.title, "A revised");

        assert_eq!(store.len(), 2);
        assert_eq!(store.tasks()[0].id, b.id);
        assert_eq!(store.tasks()[1], updated);
        assert_eq!(form.state(&store), FormState::Idle);
    }

    #[test]
    fn deleting_through_the_store_discards_the_edit_draft() {
        let (mut form, mut store, _clock) = setup();
        let a = store.create("A", "", "1").unwrap();
        form.edit(&mut store, &a.id);
        form.set_title("half typed edit");

        store.delete(&a.id);
        assert_eq!(form.state(&store), FormState::Idle);

        assert_eq!(form.submit(&mut store), SubmitOutcome::Rejected);
        assert!(store.is_empty());
        assert_eq!(form.draft(), &Draft::blank(&default_categories()));

        form.set_title("fresh");
        assert!(matches!(form.submit(&mut store), SubmitOutcome::Created(t) if t.title == "fresh"));
    }

    #[test]
    fn edit_replaced_on_the_store_is_not_claimed_by_the_form() {
        let (mut form, mut store, _clock) = setup();
        let a = store.create("A", "", "1").unwrap();
        let b = store.create("B", "", "1").unwrap();
        form.edit(&mut store, &a.id);
        form.set_title("A edited");

        store.begin_edit(&b.id);
        assert_eq!(form.state(&store), FormState::Idle);
        assert_eq!(form.submit(&mut store), SubmitOutcome::Rejected);
        assert_eq!(store.get(&a.id).unwrap().title, "A");
        assert_eq!(store.get(&b.id).unwrap().title, "B");
    }

    #[test]
    fn cycle_category_wraps() {
        let (mut form, _store, _clock) = setup();
        form.cycle_category(false);
        assert_eq!(form.draft().category, "5");
        form.cycle_category(true);
        assert_eq!(form.draft().category, "1");

        form.set_category("gone");
        form.cycle_category(true);
        assert_eq!(form.draft().category, "1");
    }
}
