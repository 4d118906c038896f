use std::cmp::min;

use chrono::{DateTime, Local, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::categories::find_category;
use crate::model::{Category, Task};

pub const BG_BASE: Color = Color::Rgb(14, 17, 23);
pub const BG_PANEL: Color = Color::Rgb(22, 26, 34);
pub const BG_ACCENT: Color = Color::Rgb(32, 37, 47);
pub const FG_ACCENT: Color = Color::Rgb(120, 161, 255);

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

/// Last six characters of an id. ULIDs share their timestamp prefix, so the tail is what differs.
pub fn short_id(id: &str) -> String {
    let start = id.len().saturating_sub(6);
    id.get(start..).unwrap_or(id).to_string()
}

/// Terminal colour for a category colour token such as `bg-emerald-500`.
///
/// Only the colour family is considered. Unknown tokens fall back to gray.
pub fn category_color(token: &str) -> Color {
    let family = token
        .trim()
        .trim_start_matches("bg-")
        .split('-')
        .next()
        .unwrap_or_default();
    match family {
        "red" => Color::Rgb(239, 68, 68),
        "orange" => Color::Rgb(249, 115, 22),
        "amber" | "yellow" => Color::Rgb(234, 179, 8),
        "green" => Color::Rgb(34, 197, 94),
        "emerald" => Color::Rgb(16, 185, 129),
        "teal" => Color::Rgb(20, 184, 166),
        "cyan" => Color::Rgb(6, 182, 212),
        "sky" => Color::Rgb(14, 165, 233),
        "blue" => Color::Rgb(59, 130, 246),
        "indigo" => Color::Rgb(99, 102, 241),
        "violet" => Color::Rgb(139, 92, 246),
        "purple" => Color::Rgb(168, 85, 247),
        "pink" => Color::Rgb(236, 72, 153),
        "rose" => Color::Rgb(244, 63, 94),
        _ => Color::Gray,
    }
}

/// Badge span for a category, white text on the category colour.
pub fn category_badge(category: &Category) -> Span<'static> {
    Span::styled(
        format!(" {} ", category.name),
        Style::default()
            .fg(Color::White)
            .bg(category_color(&category.color))
            .add_modifier(Modifier::BOLD),
    )
}

/// "Jan 5, 09:30" in local time.
pub fn format_task_date(value: &DateTime<Utc>) -> String {
    let local: DateTime<Local> = (*value).into();
    local.format("%b %-d, %H:%M").to_string()
}

/// Table cell text: the creation time, plus the last update once the task was edited.
pub fn format_task_timestamps(task: &Task) -> String {
    let created = format_task_date(&task.created_at);
    if task.is_edited() {
        format!("{created} · upd {}", format_task_date(&task.updated_at))
    } else {
        created
    }
}

pub fn format_task_detail_entries(task: &Task, categories: &[Category]) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    entries.push((String::from("Title"), task.title.clone()));
    entries.push((
        String::from("Status"),
        String::from(if task.completed { "Completed" } else { "Open" }),
    ));
    let category = find_category(categories, &task.category)
        .map(|category| category.name.clone())
        .unwrap_or_else(|| String::from("None"));
    entries.push((String::from("Category"), category));
    entries.push((String::from("ID"), task.id.clone()));
    entries.push((String::from("Created"), format_task_date(&task.created_at)));
    if task.is_edited() {
        entries.push((String::from("Updated"), format_task_date(&task.updated_at)));
    }
    if !task.description.trim().is_empty() {
        entries.push((String::from("Description"), task.description.clone()));
    }
    entries
}

pub fn build_help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Tab / Shift+Tab", "Cycle category filter"),
        ("j / k or ↓ / ↑", "Move selection"),
        ("Home / End", "Jump to first / last task"),
        ("a", "Add a task"),
        ("e", "Edit selected task"),
        ("Space / d", "Toggle complete"),
        ("x / Delete", "Delete task (with confirmation)"),
        ("/", "Search titles and descriptions"),
        ("c", "Clear category filter and search"),
        ("Enter", "Show task details"),
        ("h", "Toggle this help overlay"),
        ("Tab (in form)", "Next field"),
        ("←/→ (in form)", "Change category"),
        ("Ctrl+W (in form)", "Delete previous word"),
        ("Esc", "Cancel/close overlays"),
        ("q / Ctrl+C", "Quit"),
    ]
}

pub fn accent_title(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_owned(),
        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
    )])
}
