use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::model::Task;

/// What changed in the store. Sent to subscribers after the change is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Created(String),
    Updated(String),
    Toggled(String),
    Deleted(String),
    EditStarted(String),
    EditCancelled(String),
}

impl StoreEvent {
    pub fn task_id(&self) -> &str {
        match self {
            StoreEvent::Created(id)
            | StoreEvent::Updated(id)
            | StoreEvent::Toggled(id)
            | StoreEvent::Deleted(id)
            | StoreEvent::EditStarted(id)
            | StoreEvent::EditCancelled(id) => id,
        }
    }

    /// Whether the task collection itself changed (as opposed to the edit reference).
    pub fn touches_tasks(&self) -> bool {
        matches!(
            self,
            StoreEvent::Created(_)
                | StoreEvent::Updated(_)
                | StoreEvent::Toggled(_)
                | StoreEvent::Deleted(_)
        )
    }
}

pub type Listener = Box<dyn FnMut(&StoreEvent, &[Task])>;

/// Ordered task collection (newest first) plus the single task under edit.
pub struct TaskStore {
    tasks: Vec<Task>,
    editing: Option<Task>,
    clock: Arc<dyn Clock>,
    listeners: Vec<Listener>,
}

impl TaskStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_tasks(Vec::new(), clock)
    }

    pub fn with_tasks(tasks: Vec<Task>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks,
            editing: None,
            clock,
            listeners: Vec::new(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&StoreEvent, &[Task]) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Create a task at the head of the list. Returns `None` when the title is blank.
    pub fn create(&mut self, title: &str, description: &str, category: &str) -> Option<Task> {
        if title.trim().is_empty() {
            return None;
        }
        let task = Task::new(title, description, category, self.clock.now());
        self.tasks.insert(0, task.clone());
        tracing::debug!(task_id = task.id.as_str(), "task created");
        self.notify(StoreEvent::Created(task.id.clone()));
        Some(task)
    }

    /// Replace the stored task with the same id. The caller stamps `updated_at`.
    pub fn update(&mut self, task: Task) -> bool {
        let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) else {
            return false;
        };
        *slot = task.clone();
        if self.editing.as_ref().is_some_and(|e| e.id == task.id) {
            self.editing = Some(task.clone());
        }
        tracing::debug!(task_id = task.id.as_str(), "task updated");
        self.notify(StoreEvent::Updated(task.id));
        true
    }

    pub fn toggle_complete(&mut self, id: &str) -> Option<&Task> {
        let now = self.clock.now();
        let idx = self.tasks.iter().position(|task| task.id == id)?;
        {
            let task = &mut self.tasks[idx];
            task.completed = !task.completed;
            // Never step backwards even if the clock does.
            task.updated_at = now.max(task.updated_at);
        }
        if self.editing.as_ref().is_some_and(|e| e.id == id) {
            self.editing = Some(self.tasks[idx].clone());
        }
        tracing::debug!(
            task_id = id,
            completed = self.tasks[idx].completed,
            "task toggled"
        );
        self.notify(StoreEvent::Toggled(id.to_string()));
        self.tasks.get(idx)
    }

    /// Remove a task. Cancels the edit session when it targets the same id.
    pub fn delete(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|task| task.id == id)?;
        let removed = self.tasks.remove(idx);
        tracing::debug!(task_id = id, "task deleted");
        self.notify(StoreEvent::Deleted(removed.id.clone()));
        if self.editing.as_ref().is_some_and(|e| e.id == id) {
            self.cancel_edit();
        }
        Some(removed)
    }

    pub fn editing(&self) -> Option<&Task> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.editing.as_ref().is_some_and(|task| task.id == id)
    }

    /// Start editing `id`, replacing any other edit session.
    pub fn begin_edit(&mut self, id: &str) -> Option<&Task> {
        let task = self.get(id)?.clone();
        if let Some(previous) = self.editing.replace(task) {
            if previous.id != id {
                self.notify(StoreEvent::EditCancelled(previous.id));
            }
        }
        self.notify(StoreEvent::EditStarted(id.to_string()));
        self.editing.as_ref()
    }

    pub fn cancel_edit(&mut self) -> Option<Task> {
        let previous = self.editing.take()?;
        self.notify(StoreEvent::EditCancelled(previous.id.clone()));
        Some(previous)
    }

    fn notify(&mut self, event: StoreEvent) {
        let tasks = &self.tasks;
        for listener in self.listeners.iter_mut() {
            listener(&event, tasks);
        }
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl fmt::Debug for TaskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskStore")
            .field("tasks", &self.tasks)
            .field("editing", &self.editing.as_ref().map(|t| t.id.as_str()))
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, TimeZone};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn manual_store() -> (TaskStore, Arc<ManualClock>) {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let clock = Arc::new(ManualClock::new(start));
        (TaskStore::new(clock.clone()), clock)
    }

    #[test]
    fn create_inserts_at_head() {
        let (mut store, clock) = manual_store();
        let a = store.create("A", "", "1").unwrap();
        clock.advance(Duration::seconds(1));
        let b = store.create("B", "", "1").unwrap();

        let ids: Vec<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![b.id.as_str(), a.id.as_str()]);
    }

    #[test]
    fn create_grows_collection_by_one() {
        let (mut store, _clock) = manual_store();
        for n in 0..5 {
            let before = store.len();
            let task = store.create(&format!("Task {n}"), "", "").unwrap();
            assert_eq!(store.len(), before + 1);
            assert_eq!(store.tasks()[0], task);
        }
    }

    #[test]
    fn blank_title_is_rejected() {
        let (mut store, _clock) = manual_store();
        assert!(store.create("   ", "desc", "1").is_none());
        assert!(store.create("", "", "").is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn buy_milk_scenario() {
        let (mut store, clock) = manual_store();
        let task = store.create("Buy milk", "", "2").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.category, "2");
        assert!(!task.completed);
        assert_eq!(task.created_at, clock.now());
        assert_eq!(task.updated_at, task.created_at);
    }

    #[test]
    fn toggle_is_an_involution_with_monotone_updated_at() {
        let (mut store, clock) = manual_store();
        let task = store.create("Stretch", "", "4").unwrap();

        clock.advance(Duration::minutes(1));
        let first = store.toggle_complete(&task.id).unwrap().clone();
        assert!(first.completed);
        assert!(first.updated_at >= task.updated_at);
        assert!(first.is_edited());

        clock.advance(Duration::minutes(1));
        let second = store.toggle_complete(&task.id).unwrap().clone();
        assert!(!second.completed);
        assert!(second.updated_at >= first.updated_at);
        assert_eq!(second.created_at, task.created_at);
    }

    #[test]
    fn toggle_never_moves_updated_at_backwards() {
        let (mut store, clock) = manual_store();
        let task = store.create("Read", "", "5").unwrap();
        clock.advance(Duration::minutes(-10));

        let toggled = store.toggle_complete(&task.id).unwrap();
        assert_eq!(toggled.updated_at, task.updated_at);
    }

    #[test]
    fn toggle_unknown_id_is_noop() {
        let (mut store, _clock) = manual_store();
        store.create("Keep", "", "").unwrap();
        let before = store.tasks().to_vec();
        assert!(store.toggle_complete("missing").is_none());
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn toggle_refreshes_the_task_under_edit() {
        let (mut store, clock) = manual_store();
        let a = store.create("A", "", "1").unwrap();
        let b = store.create("B", "", "1").unwrap();
        store.begin_edit(&a.id).unwrap();

        clock.advance(Duration::minutes(5));
        store.toggle_complete(&b.id);
        assert_eq!(store.editing(), Some(&a));

        store.toggle_complete(&a.id);
        let editing = store.editing().unwrap();
        assert!(editing.completed);
        assert_eq!(editing.updated_at, clock.now());
        assert_eq!(Some(editing), store.get(&a.id));
    }

    #[test]
    fn update_replaces_in_place() {
        let (mut store, clock) = manual_store();
        let a = store.create("A", "", "1").unwrap();
        let b = store.create("B", "", "1").unwrap();

        clock.advance(Duration::minutes(3));
        let mut changed = a.clone();
        changed.title = "A2".into();
        changed.updated_at = clock.now();
        assert!(store.update(changed));

        assert_eq!(store.tasks()[0].id, b.id);
        assert_eq!(store.tasks()[1].title, "A2");
        assert_eq!(store.tasks()[1].created_at, a.created_at);
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let (mut store, clock) = manual_store();
        store.create("A", "", "1").unwrap();
        let ghost = Task::new("Ghost", "", "", clock.now());
        assert!(!store.update(ghost));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_removes_and_then_get_is_none() {
        let (mut store, _clock) = manual_store();
        let a = store.create("A", "", "").unwrap();
        assert_eq!(store.delete(&a.id).map(|t| t.id), Some(a.id.clone()));
        assert!(store.get(&a.id).is_none());
        assert!(store.delete(&a.id).is_none());
    }

    #[test]
    fn delete_unknown_leaves_collection() {
        let (mut store, _clock) = manual_store();
        store.create("A", "", "").unwrap();
        let before = store.tasks().to_vec();
        assert!(store.delete("nope").is_none());
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn delete_cancels_matching_edit_session() {
        let (mut store, _clock) = manual_store();
        let a = store.create("A", "", "").unwrap();
        let b = store.create("B", "", "").unwrap();

        store.begin_edit(&a.id).unwrap();
        store.delete(&b.id);
        assert!(store.is_editing(&a.id));

        store.delete(&a.id);
        assert!(store.editing().is_none());
    }

    #[test]
    fn only_one_task_is_edited_at_a_time() {
        let (mut store, _clock) = manual_store();
        let a = store.create("A", "", "").unwrap();
        let b = store.create("B", "", "").unwrap();

        store.begin_edit(&a.id);
        store.begin_edit(&b.id);
        assert!(store.is_editing(&b.id));
        assert!(!store.is_editing(&a.id));
        assert!(store.begin_edit("missing").is_none());
        assert!(store.is_editing(&b.id));
    }

    #[test]
    fn subscribers_see_each_change() {
        let (mut store, _clock) = manual_store();
        let seen: Rc<RefCell<Vec<(StoreEvent, usize)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        store.subscribe(move |event, tasks| sink.borrow_mut().push((event.clone(), tasks.len())));

        let a = store.create("A", "", "").unwrap();
        store.toggle_complete(&a.id);
        store.begin_edit(&a.id);
        store.delete(&a.id);
        store.delete(&a.id);
        assert!(store.create(" ", "", "").is_none());

        let events = seen.borrow();
        assert_eq!(
            *events,
            vec![
                (StoreEvent::Created(a.id.clone()), 1),
                (StoreEvent::Toggled(a.id.clone()), 1),
                (StoreEvent::EditStarted(a.id.clone()), 1),
                (StoreEvent::Deleted(a.id.clone()), 0),
                (StoreEvent::EditCancelled(a.id.clone()), 0),
            ]
        );
    }
}
