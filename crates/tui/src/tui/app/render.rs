use std::cmp::min;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::Frame;

use crate::core::categories::find_category;
use crate::tui::buffer::TextBuffer;
use crate::tui::constants::APP_VERSION;
use crate::tui::helpers::{
    accent_title, build_help_lines, category_badge, category_color, centered_rect,
    format_task_detail_entries, format_task_timestamps, inset_rect, short_id, BG_ACCENT, BG_BASE,
    BG_PANEL, FG_ACCENT,
};

use super::{App, ConfirmChoice, FormField, InputMode};

impl App {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>) {
        let size = f.size();
        f.render_widget(Clear, size);
        f.render_widget(Block::default().style(Style::default().bg(BG_BASE)), size);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_tabs(f, chunks[1]);
        self.draw_tasks(f, chunks[2]);
        self.draw_footer(f, chunks[3]);

        match self.input_mode {
            InputMode::Form => self.draw_form_overlay(f, size),
            InputMode::Search => self.draw_search_overlay(f, size),
            InputMode::Inspect => self.draw_detail_overlay(f, size),
            InputMode::Help => self.draw_help_overlay(f, size),
            InputMode::ConfirmDelete => self.draw_confirm_overlay(f, size),
            InputMode::Normal => {}
        }
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);

        let stats = self.snapshot.stats;
        let mut left_spans = vec![
            Span::styled(
                format!(" taskorp v{} ", APP_VERSION),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{} total", stats.total)),
            Span::raw(" · "),
            Span::styled(
                format!("{} completed", stats.completed),
                Style::default().fg(Color::Green),
            ),
            Span::raw(" · "),
            Span::styled(
                format!("{} remaining", stats.remaining),
                Style::default().fg(Color::Yellow),
            ),
        ];

        if !self.snapshot.query.search.is_empty() {
            left_spans.push(Span::raw("  "));
            left_spans.push(Span::styled(
                format!("🔍 {}", self.snapshot.query.search),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        f.render_widget(
            Paragraph::new(Line::from(left_spans)).style(Style::default().bg(BG_BASE)),
            cols[0],
        );

        let right_line = Line::from(vec![Span::styled(
            format!("💾 {} ", self.config.db_path().display()),
            Style::default().fg(Color::DarkGray),
        )]);
        let right_para = Paragraph::new(right_line)
            .alignment(Alignment::Right)
            .style(Style::default().bg(BG_BASE));
        f.render_widget(right_para, cols[1]);
    }

    fn draw_tabs(&self, f: &mut Frame<'_>, area: Rect) {
        let titles: Vec<Line> = self
            .tabs
            .iter()
            .map(|tab| {
                if tab.category.is_empty() {
                    Line::from(tab.label.clone())
                } else {
                    Line::from(vec![
                        Span::styled("● ", Style::default().fg(category_color(&tab.color))),
                        Span::raw(tab.label.clone()),
                    ])
                }
            })
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tab_index)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(accent_title("Categories"))
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, area);
    }

    fn draw_tasks(&mut self, f: &mut Frame<'_>, area: Rect) {
        if self.snapshot.tasks.is_empty() {
            let lines = self.empty_task_state();
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .style(Style::default().bg(BG_PANEL));
            let inner = block.inner(area);
            f.render_widget(Clear, area);
            f.render_widget(block, area);

            if inner.width == 0 || inner.height == 0 {
                return;
            }

            let width = inner.width.min(80).max(1);
            let mut height = (lines.len() as u16).saturating_add(2).min(inner.height);
            if height < 3 && inner.height >= 3 {
                height = 3;
            }
            let content_area = centered_rect(width, height, inner);
            f.render_widget(Clear, content_area);

            let paragraph = Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .style(Style::default().bg(BG_PANEL));
            f.render_widget(paragraph, content_area);
            return;
        }

        let header = Row::new(vec![
            Cell::from(" "),
            Cell::from("Title"),
            Cell::from("Category"),
            Cell::from("Description"),
            Cell::from("Created"),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let categories = self.session.categories();
        let rows: Vec<Row> = self
            .snapshot
            .tasks
            .iter()
            .map(|task| {
                let (mark, title_style) = if task.completed {
                    (
                        Span::styled("✓", Style::default().fg(Color::Green)),
                        Style::default()
                            .fg(Color::DarkGray)
                            .add_modifier(Modifier::CROSSED_OUT),
                    )
                } else {
                    (Span::styled("○", Style::default().fg(Color::Gray)), Style::default())
                };
                let badge = find_category(categories, &task.category)
                    .map(|category| Line::from(category_badge(category)))
                    .unwrap_or_default();
                Row::new(vec![
                    Cell::from(Line::from(mark)),
                    Cell::from(task.title.clone()).style(title_style),
                    Cell::from(badge),
                    Cell::from(task.description.clone())
                        .style(Style::default().fg(Color::Gray)),
                    Cell::from(format_task_timestamps(task))
                        .style(Style::default().fg(Color::DarkGray)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(2),
            Constraint::Percentage(30),
            Constraint::Length(12),
            Constraint::Percentage(30),
            Constraint::Length(31),
        ];

        let title = if self.snapshot.query.is_active() {
            format!(
                "Tasks ({} of {})",
                self.snapshot.tasks.len(),
                self.snapshot.stats.total
            )
        } else {
            String::from("Tasks")
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(accent_title(&title))
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    pub(super) fn empty_task_state(&self) -> Vec<Line<'static>> {
        let Some(empty) = self.snapshot.empty_state else {
            return Vec::new();
        };

        let mut lines: Vec<Line<'static>> = Vec::new();
        lines.push(Line::from(vec![Span::styled(
            empty.headline(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )]));
        lines.push(Line::from(vec![Span::styled(
            empty.hint(),
            Style::default().fg(Color::Gray),
        )]));
        lines.push(Line::default());

        let key_hint = if self.snapshot.query.is_active() {
            "Press 'c' to clear the category filter and search."
        } else {
            "Press 'a' to add a task, 'h' for all keys."
        };
        lines.push(Line::from(vec![Span::styled(
            key_hint,
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        )]));

        if self.first_run {
            lines.push(Line::default());
            lines.push(Line::from(vec![Span::styled(
                format!(
                    "Your tasks live in `{}` (adjust with `--data-dir` or `TASKORP_DATA_DIR`).",
                    self.config.data_dir().display()
                ),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )]));
        }

        lines
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.style())])
        } else {
            Line::from(vec![Span::raw("Ready")])
        };

        f.render_widget(Paragraph::new(status_line), lines[0]);

        let help = match self.input_mode {
            InputMode::Normal => {
                "tab/shift+tab category | j/k move | a add | e edit | space done | x delete | / search | c clear | enter details | h help | q quit"
            }
            InputMode::Form => "tab next field | ←/→ category | enter save | esc cancel",
            InputMode::Search => "enter keep | esc restore",
            InputMode::Inspect | InputMode::Help => "enter/esc close",
            InputMode::ConfirmDelete => "←/→ choose | y/n | enter confirm | esc cancel",
        };

        let help_line = Line::from(vec![Span::styled(
            help,
            Style::default().fg(Color::DarkGray),
        )]);
        f.render_widget(Paragraph::new(help_line), lines[1]);
    }

    fn draw_form_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(10), 80);
        let popup_area = centered_rect(width, 11, area);
        f.render_widget(Clear, popup_area);

        let title = if self.is_editing() {
            "✏️ Edit Task"
        } else {
            "➕ Add Task"
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title(title))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(inner);

        self.draw_text_field(f, rows[0], "Title", &self.title_input, FormField::Title);
        self.draw_text_field(
            f,
            rows[1],
            "Description",
            &self.description_input,
            FormField::Description,
        );

        let focused = self.form_field == FormField::Category;
        let draft = self.session.form().draft();
        let selector = match find_category(self.session.categories(), &draft.category) {
            Some(category) => Line::from(vec![
                Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
                category_badge(category),
                Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
            ]),
            None => Line::from(Span::styled(
                "◀ none ▶",
                Style::default().fg(Color::DarkGray),
            )),
        };
        let block = field_block("Category", focused);
        let field_inner = block.inner(rows[2]);
        f.render_widget(block, rows[2]);
        f.render_widget(Paragraph::new(selector), field_inner);
    }

    fn draw_text_field(
        &self,
        f: &mut Frame<'_>,
        area: Rect,
        label: &str,
        buffer: &TextBuffer,
        field: FormField,
    ) {
        let focused = self.form_field == field;
        let block = field_block(label, focused);
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(Paragraph::new(buffer.as_str()), inner);
        if focused {
            place_cursor(f, inner, buffer);
        }
    }

    fn draw_search_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(10), 60);
        let popup_area = centered_rect(width, 3, area);
        f.render_widget(Clear, popup_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("🔍 Search"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);
        f.render_widget(Paragraph::new(self.search_input.as_str()), inner);
        place_cursor(f, inner, &self.search_input);
    }

    fn draw_detail_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let Some(task) = self.inspect_task.as_ref() else {
            return;
        };

        let detail_entries = format_task_detail_entries(task, self.session.categories());
        let width = min(area.width.saturating_sub(20), 90).max(40);
        let content_height = detail_entries.len() as u16 + 2;
        let popup_height = content_height
            .saturating_add(4)
            .min(area.height.saturating_sub(2))
            .max(6);
        let popup_area = centered_rect(width, popup_height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title(&format!("🗒 Task {}", short_id(&task.id))))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let detail_area = inset_rect(inner, 1);
        let rows: Vec<Row> = detail_entries
            .into_iter()
            .map(|(key, value)| {
                Row::new(vec![
                    Cell::from(key)
                        .style(Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD)),
                    Cell::from(value),
                ])
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(20)])
            .block(Block::default().style(Style::default().bg(BG_PANEL)))
            .column_spacing(2);
        f.render_widget(table, detail_area);
    }

    fn draw_help_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = build_help_lines();
        let width = min(area.width.saturating_sub(10), 80);
        let height = min(lines.len() as u16 + 4, area.height.saturating_sub(2)).max(10);
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("⌨️ Keyboard Reference"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        if inner.width < 3 || inner.height < 3 {
            return;
        }

        let rows: Vec<Row> = lines
            .into_iter()
            .map(|(combo, desc)| {
                Row::new(vec![
                    Cell::from(combo).style(Style::default().fg(Color::Cyan)),
                    Cell::from(desc),
                ])
            })
            .collect();
        let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(10)])
            .column_spacing(2);
        f.render_widget(table, inset_rect(inner, 1));
    }

    fn draw_confirm_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(20), 60).max(40);
        let popup_area = centered_rect(width, 8, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("🗑 Confirm Deletion"))
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let task_title = self
            .selected_task()
            .map(|t| t.title.as_str())
            .unwrap_or("selected task");

        let yes_style = if self.confirm_choice == ConfirmChoice::Yes {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };
        let no_style = if self.confirm_choice == ConfirmChoice::No {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let lines = vec![
            Line::from(vec![Span::styled(
                "This action cannot be undone.",
                Style::default().fg(Color::Red),
            )]),
            Line::from(vec![Span::styled(
                format!("Delete '{}'?", task_title),
                Style::default().fg(Color::White),
            )]),
            Line::default(),
            Line::from(vec![
                Span::styled("  Yes  ", yes_style),
                Span::raw("    "),
                Span::styled("  No  ", no_style),
            ]),
        ];

        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }
}

fn field_block(label: &str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .title(label.to_owned())
        .border_style(border)
        .style(Style::default().bg(BG_PANEL))
}

fn place_cursor(f: &mut Frame<'_>, area: Rect, buffer: &TextBuffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let col = (buffer.cursor_col() as u16).min(area.width - 1);
    f.set_cursor(area.x + col, area.y);
}
