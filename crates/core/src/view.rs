//! Derived view over the task collection: category filter, text search and counts.
//!
//! Everything here is a pure function of its inputs and is recomputed on demand.

use serde::Serialize;

use crate::model::Task;

/// The user's current filter selection. Empty strings mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewQuery {
    pub category: String,
    pub search: String,
}

impl ViewQuery {
    pub fn new(category: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            search: search.into(),
        }
    }

    /// True when either the category filter or the search term is set.
    pub fn is_active(&self) -> bool {
        !self.category.is_empty() || !self.search.is_empty()
    }

    pub fn matches_category(&self, task: &Task) -> bool {
        self.category.is_empty() || task.category == self.category
    }

    pub fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.matches_category(task) && self.matches_search(task)
    }
}

/// Ordered subsequence of `tasks` passing both filters.
pub fn filter_tasks<'a>(tasks: &'a [Task], query: &ViewQuery) -> Vec<&'a Task> {
    tasks.iter().filter(|task| query.matches(task)).collect()
}

/// Aggregate counts over the full, unfiltered collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total,
            completed,
            remaining: total - completed,
        }
    }
}

/// Why the visible list is empty, so the two cases can be messaged differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    NoTasks,
    NoMatches,
}

impl EmptyState {
    pub fn classify(query: &ViewQuery, visible: usize) -> Option<Self> {
        if visible > 0 {
            None
        } else if query.is_active() {
            Some(EmptyState::NoMatches)
        } else {
            Some(EmptyState::NoTasks)
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            EmptyState::NoTasks => "No tasks yet",
            EmptyState::NoMatches => "No matching tasks",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            EmptyState::NoTasks => "Add your first task to get started!",
            EmptyState::NoMatches => "Try adjusting your search or filters",
        }
    }
}
