use std::sync::Arc;

use serde::Serialize;

use crate::categories::default_categories;
use crate::clock::{Clock, SystemClock};
use crate::form::{Draft, FormController, SubmitOutcome};
use crate::model::{Category, Task};
use crate::storage::{load_tasks, save_tasks, KeyValueStore};
use crate::store::TaskStore;
use crate::view::{filter_tasks, EmptyState, TaskStats, ViewQuery};

/// Events a presentation layer feeds into the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Submit,
    Toggle(String),
    Edit(String),
    Delete(String),
    SetFilter(String),
    SetSearch(String),
    CancelEdit,
}

/// What happened in response to a [`SessionEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    Submitted(SubmitOutcome),
    Toggled(Option<Task>),
    EditStarted(bool),
    Deleted(Option<Task>),
    QueryChanged,
    EditCancelled,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub tasks: Vec<Task>,
    pub stats: TaskStats,
    pub empty_state: Option<EmptyState>,
    pub query: ViewQuery,
    pub editing: Option<Task>,
    pub draft: Draft,
}

impl ViewSnapshot {
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }
}

pub struct Session {
    store: TaskStore,
    form: FormController,
    query: ViewQuery,
    categories: Vec<Category>,
}

impl Session {
    /// In-memory session with the default categories and no persistence.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_parts(TaskStore::new(clock), default_categories())
    }

    pub fn with_parts(store: TaskStore, categories: Vec<Category>) -> Self {
        Self {
            store,
            form: FormController::new(categories.clone()),
            query: ViewQuery::default(),
            categories,
        }
    }

    /// Load tasks from `backend` and write the collection back after every change.
    pub fn persistent<S>(backend: S, clock: Arc<dyn Clock>) -> Self
    where
        S: KeyValueStore + 'static,
    {
        let mut backend = backend;
        let tasks = load_tasks(&backend);
        tracing::info!(count = tasks.len(), "session started");
        let mut store = TaskStore::with_tasks(tasks, clock);
        store.subscribe(move |event, tasks| {
            if event.touches_tasks() {
                save_tasks(&mut backend, tasks);
            }
        });
        Self::with_parts(store, default_categories())
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TaskStore {
        &mut self.store
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn handle(&mut self, event: SessionEvent) -> EventOutcome {
        match event {
            SessionEvent::Submit => EventOutcome::Submitted(self.form.submit(&mut self.store)),
            SessionEvent::Toggle(id) => {
                EventOutcome::Toggled(self.store.toggle_complete(&id).cloned())
            }
            SessionEvent::Edit(id) => EventOutcome::EditStarted(self.form.edit(&mut self.store, &id)),
            SessionEvent::Delete(id) => {
                let was_editing = self.store.is_editing(&id);
                let removed = self.store.delete(&id);
                if was_editing && removed.is_some() {
                    self.form.reset();
                }
                EventOutcome::Deleted(removed)
            }
            SessionEvent::SetFilter(category) => {
                self.query.category = category;
                EventOutcome::QueryChanged
            }
            SessionEvent::SetSearch(search) => {
                self.query.search = search;
                EventOutcome::QueryChanged
            }
            SessionEvent::CancelEdit => {
                self.form.cancel(&mut self.store);
                EventOutcome::EditCancelled
            }
        }
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        filter_tasks(self.store.tasks(), &self.query)
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(self.store.tasks())
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let tasks: Vec<Task> = self.visible_tasks().into_iter().cloned().collect();
        let empty_state = EmptyState::classify(&self.query, tasks.len());
        ViewSnapshot {
            tasks,
            stats: self.stats(),
            empty_state,
            query: self.query.clone(),
            editing: self.store.editing().cloned(),
            draft: self.form.draft().clone(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
