use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{App, ConfirmChoice, FormField, InputMode};
use crate::tui::buffer::TextBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NormalAction {
    Quit,
    EnterAdd,
    EnterEdit,
    ToggleComplete,
    Delete,
    Search,
    ClearFilters,
    ShowDetails,
    ShowHelp,
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    NextTab,
    PrevTab,
}

impl NormalAction {
    pub(crate) fn from_event(key: &KeyEvent) -> Option<Self> {
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Self::Quit);
        }

        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('a') => Some(Self::EnterAdd),
            KeyCode::Char('e') => Some(Self::EnterEdit),
            KeyCode::Char(' ') | KeyCode::Char('d') => Some(Self::ToggleComplete),
            KeyCode::Char('x') | KeyCode::Delete => Some(Self::Delete),
            KeyCode::Char('/') => Some(Self::Search),
            KeyCode::Char('c') => Some(Self::ClearFilters),
            KeyCode::Char('h') | KeyCode::Char('?') => Some(Self::ShowHelp),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::Home => Some(Self::SelectFirst),
            KeyCode::End => Some(Self::SelectLast),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => Some(Self::NextTab),
            KeyCode::Left | KeyCode::BackTab => Some(Self::PrevTab),
            KeyCode::Enter => Some(Self::ShowDetails),
            _ => None,
        }
    }
}

/// Shared single-line editing keys. Returns false when the key was not consumed.
fn edit_buffer(buffer: &mut TextBuffer, key: &KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('w') => {
                buffer.delete_word();
                true
            }
            KeyCode::Char('u') => {
                buffer.clear();
                true
            }
            _ => false,
        };
    }

    match key.code {
        KeyCode::Char(c) => buffer.insert_char(c),
        KeyCode::Backspace => buffer.backspace(),
        KeyCode::Delete => buffer.delete_char(),
        KeyCode::Left => buffer.move_left(),
        KeyCode::Right => buffer.move_right(),
        KeyCode::Home => buffer.move_home(),
        KeyCode::End => buffer.move_end(),
        _ => return false,
    }
    true
}

impl App {
    pub(crate) fn on_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode(key),
            InputMode::Form => self.handle_form_mode(key),
            InputMode::Search => self.handle_search_mode(key),
            InputMode::Inspect => self.handle_inspect_mode(key),
            InputMode::Help => self.handle_help_mode(key),
            InputMode::ConfirmDelete => self.handle_confirm_delete_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) {
        if let Some(action) = NormalAction::from_event(&key) {
            self.execute_normal_action(action);
        }
    }

    fn execute_normal_action(&mut self, action: NormalAction) {
        match action {
            NormalAction::Quit => self.should_quit = true,
            NormalAction::EnterAdd => self.open_add_form(),
            NormalAction::EnterEdit => self.start_edit_current(),
            NormalAction::ToggleComplete => self.toggle_selected(),
            NormalAction::Delete => self.prompt_delete(),
            NormalAction::Search => self.open_search(),
            NormalAction::ClearFilters => self.clear_filters(),
            NormalAction::ShowDetails => self.show_selected_details(),
            NormalAction::ShowHelp => self.show_help_overlay(),
            NormalAction::SelectNext => self.select_next(),
            NormalAction::SelectPrev => self.select_prev(),
            NormalAction::SelectFirst => self.select_first(),
            NormalAction::SelectLast => self.select_last(),
            NormalAction::NextTab => self.next_tab(),
            NormalAction::PrevTab => self.prev_tab(),
        }
    }

    fn handle_form_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => return self.submit_form(),
            KeyCode::Esc => return self.cancel_form(),
            KeyCode::Tab | KeyCode::Down => {
                self.form_field = self.form_field.next();
                return;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form_field = self.form_field.prev();
                return;
            }
            _ => {}
        }

        let consumed = match self.form_field {
            FormField::Title => edit_buffer(&mut self.title_input, &key),
            FormField::Description => edit_buffer(&mut self.description_input, &key),
            FormField::Category => match key.code {
                KeyCode::Left => {
                    self.cycle_form_category(false);
                    false
                }
                KeyCode::Right | KeyCode::Char(' ') => {
                    self.cycle_form_category(true);
                    false
                }
                _ => false,
            },
        };
        if consumed {
            self.sync_draft();
        }
    }

    fn handle_search_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.status = None;
            }
            KeyCode::Esc => {
                self.restore_search();
                self.input_mode = InputMode::Normal;
                self.status = None;
            }
            _ => {
                if edit_buffer(&mut self.search_input, &key) {
                    self.apply_search();
                }
            }
        }
    }

    fn handle_inspect_mode(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            self.inspect_task = None;
            self.input_mode = InputMode::Normal;
            self.status = None;
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('h') | KeyCode::Char('?')
        ) {
            self.input_mode = InputMode::Normal;
            self.status = None;
        }
    }

    fn handle_confirm_delete_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.set_status_info("Deletion cancelled");
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') | KeyCode::Tab => {
                self.confirm_choice = self.confirm_choice.toggle();
            }
            KeyCode::Char('y') => {
                self.input_mode = InputMode::Normal;
                self.perform_delete();
            }
            KeyCode::Char('n') => {
                self.input_mode = InputMode::Normal;
                self.set_status_info("Deletion cancelled");
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                if self.confirm_choice == ConfirmChoice::Yes {
                    self.perform_delete();
                } else {
                    self.set_status_info("Deletion cancelled");
                }
            }
            _ => {}
        }
    }
}
