use std::time::Instant;

use ratatui::style::{Color, Style};
use ratatui::widgets::TableState;

use super::buffer::TextBuffer;
use super::constants::*;
use crate::config::AppConfig;
use crate::core::{EventOutcome, FormState, Session, SessionEvent, SubmitOutcome, ViewSnapshot};
use crate::model::Task;

mod input;
mod render;

#[derive(Debug, Clone)]
struct CategoryTab {
    label: String,
    /// Empty for the "All" tab.
    category: String,
    color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Form,
    Search,
    Inspect,
    Help,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Title,
    Description,
    Category,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Category,
            FormField::Category => FormField::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Category,
            FormField::Description => FormField::Title,
            FormField::Category => FormField::Description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmChoice {
    Yes,
    No,
}

impl ConfirmChoice {
    fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        }
    }
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn style(&self) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(Color::Cyan),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Info,
    Error,
}

pub(crate) struct App {
    config: AppConfig,
    session: Session,
    first_run: bool,
    tabs: Vec<CategoryTab>,
    tab_index: usize,
    snapshot: ViewSnapshot,
    selected: usize,
    table_state: TableState,
    input_mode: InputMode,
    form_field: FormField,
    title_input: TextBuffer,
    description_input: TextBuffer,
    search_input: TextBuffer,
    search_before: String,
    status: Option<StatusMessage>,
    inspect_task: Option<Task>,
    confirm_choice: ConfirmChoice,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(config: AppConfig, session: Session, first_run: bool) -> Self {
        let mut tabs = vec![CategoryTab {
            label: String::from("All"),
            category: String::new(),
            color: String::new(),
        }];
        tabs.extend(session.categories().iter().map(|category| CategoryTab {
            label: category.name.clone(),
            category: category.id.clone(),
            color: category.color.clone(),
        }));

        let snapshot = session.snapshot();
        let mut app = Self {
            config,
            session,
            first_run,
            tabs,
            tab_index: 0,
            snapshot,
            selected: 0,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            form_field: FormField::Title,
            title_input: TextBuffer::new(),
            description_input: TextBuffer::new(),
            search_input: TextBuffer::new(),
            search_before: String::new(),
            status: None,
            inspect_task: None,
            confirm_choice: ConfirmChoice::No,
            should_quit: false,
        };
        app.refresh();
        app
    }

    /// Rebuild the snapshot and keep the selection inside the visible rows.
    pub(crate) fn refresh(&mut self) {
        self.snapshot = self.session.snapshot();

        if self.first_run && self.snapshot.stats.total > 0 {
            self.first_run = false;
        }

        let visible = self.snapshot.tasks.len();
        if visible == 0 {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            if self.selected >= visible {
                self.selected = visible - 1;
            }
            self.table_state.select(Some(self.selected));
        }
    }

    pub(crate) fn on_tick(&mut self) {
        if let Some(status) = &self.status {
            if status.created_at.elapsed() > STATUS_TTL {
                self.status = None;
            }
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn visible_tasks(&self) -> &[Task] {
        &self.snapshot.tasks
    }

    fn selected_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.selected)
    }

    fn selected_id(&self) -> Option<String> {
        self.selected_task().map(|task| task.id.clone())
    }

    fn select_next(&mut self) {
        let visible = self.visible_tasks().len();
        if visible == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(visible - 1);
        self.table_state.select(Some(self.selected));
    }

    fn select_prev(&mut self) {
        if self.visible_tasks().is_empty() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        }
        self.table_state.select(Some(self.selected));
    }

    fn select_first(&mut self) {
        if !self.visible_tasks().is_empty() {
            self.selected = 0;
            self.table_state.select(Some(self.selected));
        }
    }

    fn select_last(&mut self) {
        let visible = self.visible_tasks().len();
        if visible > 0 {
            self.selected = visible - 1;
            self.table_state.select(Some(self.selected));
        }
    }

    fn select_task_by_id(&mut self, id: &str) {
        if let Some(idx) = self.visible_tasks().iter().position(|task| task.id == id) {
            self.selected = idx;
            self.table_state.select(Some(idx));
        }
    }

    fn next_tab(&mut self) {
        self.set_tab((self.tab_index + 1) % self.tabs.len());
    }

    fn prev_tab(&mut self) {
        let idx = if self.tab_index == 0 {
            self.tabs.len() - 1
        } else {
            self.tab_index - 1
        };
        self.set_tab(idx);
    }

    fn set_tab(&mut self, idx: usize) {
        let Some(tab) = self.tabs.get(idx) else {
            return;
        };
        let category = tab.category.clone();
        self.tab_index = idx;
        self.session.handle(SessionEvent::SetFilter(category));
        self.selected = 0;
        self.refresh();
    }

    fn clear_filters(&mut self) {
        self.search_input.clear();
        self.session.handle(SessionEvent::SetSearch(String::new()));
        self.set_tab(0);
        self.set_status_info(STATUS_FILTERS_CLEARED);
    }

    fn open_add_form(&mut self) {
        // A stale edit would turn the submit into an update.
        self.session.handle(SessionEvent::CancelEdit);
        self.load_form_from_draft();
        self.input_mode = InputMode::Form;
        self.set_status_info(STATUS_ENTER_ADD);
    }

    fn start_edit_current(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status_info("Nothing to edit");
            return;
        };
        match self.session.handle(SessionEvent::Edit(id)) {
            EventOutcome::EditStarted(true) => {
                self.load_form_from_draft();
                self.input_mode = InputMode::Form;
                self.set_status_info(STATUS_ENTER_EDIT);
            }
            _ => self.set_status_error("Task not found"),
        }
    }

    fn load_form_from_draft(&mut self) {
        let draft = self.session.form().draft().clone();
        self.title_input.set(draft.title);
        self.description_input.set(draft.description);
        self.form_field = FormField::Title;
    }

    fn sync_draft(&mut self) {
        let form = self.session.form_mut();
        form.set_title(self.title_input.as_str());
        form.set_description(self.description_input.as_str());
    }

    fn cycle_form_category(&mut self, forward: bool) {
        self.session.form_mut().cycle_category(forward);
    }

    fn is_editing(&self) -> bool {
        let session = &self.session;
        matches!(session.form().state(session.store()), FormState::Editing(_))
    }

    fn submit_form(&mut self) {
        self.sync_draft();
        match self.session.handle(SessionEvent::Submit) {
            EventOutcome::Submitted(SubmitOutcome::Created(task)) => {
                self.close_form();
                self.refresh();
                self.select_task_by_id(&task.id);
                self.set_status_info(format!("Added '{}'", task.title));
            }
            EventOutcome::Submitted(SubmitOutcome::Updated(task)) => {
                self.close_form();
                self.refresh();
                self.select_task_by_id(&task.id);
                self.set_status_info(format!("Updated '{}'", task.title));
            }
            _ => {
                self.form_field = FormField::Title;
                self.set_status_error(STATUS_TITLE_REQUIRED);
            }
        }
    }

    fn cancel_form(&mut self) {
        self.session.handle(SessionEvent::CancelEdit);
        self.close_form();
        self.status = None;
    }

    fn close_form(&mut self) {
        self.title_input.clear();
        self.description_input.clear();
        self.form_field = FormField::Title;
        self.input_mode = InputMode::Normal;
    }

    fn open_search(&mut self) {
        self.search_before = self.search_input.as_str().to_string();
        self.input_mode = InputMode::Search;
        self.set_status_info(STATUS_SEARCH);
    }

    fn apply_search(&mut self) {
        let search = self.search_input.as_str().to_string();
        self.session.handle(SessionEvent::SetSearch(search));
        self.selected = 0;
        self.refresh();
    }

    fn restore_search(&mut self) {
        let previous = std::mem::take(&mut self.search_before);
        self.search_input.set(previous);
        self.apply_search();
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status_info("Nothing to toggle");
            return;
        };
        match self.session.handle(SessionEvent::Toggle(id.clone())) {
            EventOutcome::Toggled(Some(task)) => {
                self.refresh();
                self.select_task_by_id(&id);
                if task.completed {
                    self.set_status_info(format!("Completed '{}'", task.title));
                } else {
                    self.set_status_info(format!("Reopened '{}'", task.title));
                }
            }
            _ => self.set_status_error("Task not found"),
        }
    }

    fn show_selected_details(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            self.set_status_info("Nothing to inspect");
            return;
        };
        self.inspect_task = Some(task);
        self.input_mode = InputMode::Inspect;
        self.set_status_info(STATUS_VIEW_DETAILS);
    }

    fn show_help_overlay(&mut self) {
        self.inspect_task = None;
        self.input_mode = InputMode::Help;
        self.set_status_info(STATUS_HELP);
    }

    fn prompt_delete(&mut self) {
        if self.visible_tasks().is_empty() {
            self.set_status_info("Nothing to delete");
            return;
        }
        self.confirm_choice = ConfirmChoice::No;
        self.input_mode = InputMode::ConfirmDelete;
        self.set_status_info(STATUS_CONFIRM_DELETE);
    }

    fn perform_delete(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status_info("Nothing to delete");
            return;
        };
        match self.session.handle(SessionEvent::Delete(id)) {
            EventOutcome::Deleted(Some(task)) => {
                self.set_status_info(format!("Deleted '{}'", task.title));
            }
            _ => self.set_status_info("Task not found"),
        }
        self.refresh();
    }

    pub(crate) fn announce_first_run(&mut self) {
        self.set_status_info(format!(
            "Initialized taskorp data store\n  database file: {}",
            self.config.db_path().display()
        ));
    }

    pub(crate) fn set_status_info<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("ℹ️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Info));
    }

    pub(crate) fn set_status_error<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("⚠️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Error));
    }
}
