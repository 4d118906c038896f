use std::fmt;
use std::io::Write;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;

use crate::cli::{AddArgs, CliCommand, IdArgs, ListArgs};
use crate::config::AppConfig;
use crate::core::categories::find_category;
use crate::core::{
    EmptyState, EventOutcome, Session, SessionEvent, SqliteStore, SubmitOutcome, SystemClock,
    TaskStats,
};
use crate::model::{Category, Task};

pub const STATUS_TITLE_REQUIRED: &str = "Task title cannot be empty";

pub fn execute<W: Write>(config: &AppConfig, command: CliCommand, mut writer: W) -> Result<()> {
    match command {
        CliCommand::Add(args) => handle_add(config, &args, &mut writer),
        CliCommand::List(args) => handle_list(config, &args, &mut writer),
        CliCommand::Toggle(args) => handle_toggle(config, &args, &mut writer),
        CliCommand::Delete(args) => handle_delete(config, &args, &mut writer),
        CliCommand::Categories => handle_categories(config, &mut writer),
        CliCommand::Stats => handle_stats(config, &mut writer),
        CliCommand::Tui => Err(anyhow!("launch the terminal UI directly")),
    }
}

pub fn open_session(config: &AppConfig) -> Result<Session> {
    let backend = SqliteStore::initialize(config)
        .with_context(|| format!("failed to open {}", config.db_path().display()))?;
    Ok(Session::persistent(backend, Arc::new(SystemClock)))
}

fn handle_add<W: Write>(config: &AppConfig, args: &AddArgs, mut writer: W) -> Result<()> {
    let mut session = open_session(config)?;
    if let Some(category) = args.category.as_deref() {
        if find_category(session.categories(), category).is_none() {
            bail!("unknown category '{category}' (see `taskorp categories`)");
        }
        session.form_mut().set_category(category);
    }
    session.form_mut().set_title(args.title.join(" "));
    if let Some(description) = &args.description {
        session.form_mut().set_description(description.as_str());
    }

    match session.handle(SessionEvent::Submit) {
        EventOutcome::Submitted(SubmitOutcome::Created(task)) => {
            writeln!(
                writer,
                "Added {}",
                TaskLine::new(&task, session.categories())
            )?;
        }
        _ => writeln!(writer, "{STATUS_TITLE_REQUIRED}")?,
    }
    Ok(())
}

#[derive(Serialize)]
struct ListOutput<'a> {
    tasks: &'a [Task],
    stats: TaskStats,
}

fn handle_list<W: Write>(config: &AppConfig, args: &ListArgs, mut writer: W) -> Result<()> {
    let mut session = open_session(config)?;
    if let Some(category) = &args.category {
        session.handle(SessionEvent::SetFilter(category.clone()));
    }
    if let Some(search) = &args.search {
        session.handle(SessionEvent::SetSearch(search.clone()));
    }
    let snapshot = session.snapshot();

    if args.json {
        let output = ListOutput {
            tasks: &snapshot.tasks,
            stats: snapshot.stats,
        };
        serde_json::to_writer_pretty(&mut writer, &output)?;
        writeln!(writer)?;
        return Ok(());
    }

    match snapshot.empty_state {
        Some(empty) => write_empty_state(&mut writer, empty)?,
        None => {
            for task in &snapshot.tasks {
                writeln!(writer, "{}", TaskLine::new(task, session.categories()))?;
                if !task.description.is_empty() {
                    writeln!(writer, "    {}", task.description)?;
                }
            }
        }
    }
    writeln!(writer, "{}", StatsLine(snapshot.stats))?;
    Ok(())
}

fn write_empty_state<W: Write>(mut writer: W, empty: EmptyState) -> Result<()> {
    writeln!(writer, "{}", empty.headline())?;
    writeln!(writer, "{}", empty.hint())?;
    Ok(())
}

fn handle_toggle<W: Write>(config: &AppConfig, args: &IdArgs, mut writer: W) -> Result<()> {
    let mut session = open_session(config)?;
    let mut missing = Vec::new();
    for id in &args.ids {
        match session.handle(SessionEvent::Toggle(id.clone())) {
            EventOutcome::Toggled(Some(task)) => {
                let verb = if task.completed { "Completed" } else { "Reopened" };
                writeln!(writer, "{verb}: {}", task.title)?;
            }
            _ => missing.push(id.clone()),
        }
    }
    if !missing.is_empty() {
        writeln!(writer, "Not found: {}", missing.join(", "))?;
    }
    Ok(())
}

fn handle_delete<W: Write>(config: &AppConfig, args: &IdArgs, mut writer: W) -> Result<()> {
    let mut session = open_session(config)?;
    let mut summary = DeleteSummary::default();
    for id in &args.ids {
        match session.handle(SessionEvent::Delete(id.clone())) {
            EventOutcome::Deleted(Some(_)) => summary.deleted += 1,
            _ => summary.missing.push(id.clone()),
        }
    }
    summary.write_to(&mut writer)?;
    Ok(())
}

fn handle_categories<W: Write>(config: &AppConfig, mut writer: W) -> Result<()> {
    let session = open_session(config)?;
    for category in session.categories() {
        writeln!(
            writer,
            "{}  {:<10} {}",
            category.id, category.name, category.color
        )?;
    }
    Ok(())
}

fn handle_stats<W: Write>(config: &AppConfig, mut writer: W) -> Result<()> {
    let session = open_session(config)?;
    writeln!(writer, "{}", StatsLine(session.stats()))?;
    Ok(())
}

/// `[x] <id>  <title>  (<category>)`
struct TaskLine<'a> {
    task: &'a Task,
    category: Option<&'a Category>,
}

impl<'a> TaskLine<'a> {
    fn new(task: &'a Task, categories: &'a [Category]) -> Self {
        Self {
            task,
            category: find_category(categories, &task.category),
        }
    }
}

impl fmt::Display for TaskLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.task.completed { "[x]" } else { "[ ]" };
        write!(f, "{mark} {}  {}", self.task.id, self.task.title)?;
        if let Some(category) = self.category {
            write!(f, "  ({})", category.name)?;
        }
        Ok(())
    }
}

struct StatsLine(TaskStats);

impl fmt::Display for StatsLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} total, {} completed, {} remaining",
            self.0.total, self.0.completed, self.0.remaining
        )
    }
}

#[derive(Default)]
struct DeleteSummary {
    deleted: usize,
    missing: Vec<String>,
}

impl DeleteSummary {
    fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", SummaryLine::deleted(self.deleted))?;
        if !self.missing.is_empty() {
            writeln!(writer, "Not found: {}", self.missing.join(", "))?;
        }
        Ok(())
    }
}

enum SummaryLine {
    Deleted(usize),
    NoneDeleted,
}

impl SummaryLine {
    fn deleted(count: usize) -> Self {
        if count > 0 {
            SummaryLine::Deleted(count)
        } else {
            SummaryLine::NoneDeleted
        }
    }
}

impl fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryLine::Deleted(count) => {
                write!(
                    f,
                    "Deleted {} task{}",
                    count,
                    if *count == 1 { "" } else { "s" }
                )
            }
            SummaryLine::NoneDeleted => write!(f, "No tasks deleted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_config() -> (AppConfig, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
        (config, dir)
    }

    fn run(config: &AppConfig, command: CliCommand) -> String {
        let mut output = Vec::new();
        execute(config, command, &mut output).expect("execute");
        String::from_utf8(output).expect("utf8")
    }

    fn add(config: &AppConfig, title: &str, category: Option<&str>) -> String {
        let args = AddArgs {
            title: title.split(' ').map(String::from).collect(),
            description: None,
            category: category.map(String::from),
        };
        run(config, CliCommand::Add(args))
    }

    fn seeded_ids(config: &AppConfig) -> Vec<String> {
        open_session(config)
            .expect("session")
            .store()
            .tasks()
            .iter()
            .map(|task| task.id.clone())
            .collect()
    }

    #[test]
    fn add_then_list_shows_newest_first() {
        let (config, _dir) = temp_config();
        let first = add(&config, "Write report", Some("1"));
        assert!(first.starts_with("Added [ ] "));
        assert!(first.trim_end().ends_with("Write report  (Work)"));
        add(&config, "Buy milk", Some("3"));

        let output = run(&config, CliCommand::List(ListArgs::default()));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("Buy milk  (Shopping)"));
        assert!(lines[1].ends_with("Write report  (Work)"));
        assert_eq!(lines[2], "2 total, 0 completed, 2 remaining");
    }

    #[test]
    fn add_with_blank_title_creates_nothing() {
        let (config, _dir) = temp_config();
        let output = add(&config, "   ", None);
        assert_eq!(output.trim_end(), STATUS_TITLE_REQUIRED);
        assert!(seeded_ids(&config).is_empty());
    }

    #[test]
    fn add_rejects_unknown_category() {
        let (config, _dir) = temp_config();
        let args = AddArgs {
            title: vec!["Task".into()],
            description: None,
            category: Some("42".into()),
        };
        let mut output = Vec::new();
        assert!(execute(&config, CliCommand::Add(args), &mut output).is_err());
    }

    #[test]
    fn list_distinguishes_empty_from_no_matches() {
        let (config, _dir) = temp_config();
        let output = run(&config, CliCommand::List(ListArgs::default()));
        assert!(output.starts_with("No tasks yet\n"));

        add(&config, "Gym session", Some("4"));
        let args = ListArgs {
            search: Some("milk".into()),
            ..ListArgs::default()
        };
        let output = run(&config, CliCommand::List(args));
        assert!(output.starts_with("No matching tasks\n"));
        assert!(output.contains("1 total, 0 completed, 1 remaining"));
    }

    #[test]
    fn list_json_contains_visible_tasks_and_stats() {
        let (config, _dir) = temp_config();
        add(&config, "Read book", Some("5"));
        add(&config, "Stretch", Some("4"));
        let args = ListArgs {
            category: Some("5".into()),
            json: true,
            ..ListArgs::default()
        };
        let output = run(&config, CliCommand::List(args));
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["tasks"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["tasks"][0]["title"], "Read book");
        assert!(value["tasks"][0]["createdAt"].is_string());
        assert_eq!(value["stats"]["total"], 2);
    }

    #[test]
    fn toggle_reports_changes_and_missing() {
        let (config, _dir) = temp_config();
        add(&config, "Call mum", None);
        let id = seeded_ids(&config).remove(0);

        let args = IdArgs {
            ids: vec![id.clone(), "missing".into()],
        };
        let output = run(&config, CliCommand::Toggle(args));
        assert_eq!(output, "Completed: Call mum\nNot found: missing\n");

        let output = run(&config, CliCommand::Stats);
        assert_eq!(output, "1 total, 1 completed, 0 remaining\n");

        let output = run(&config, CliCommand::Toggle(IdArgs { ids: vec![id] }));
        assert_eq!(output, "Reopened: Call mum\n");
    }

    #[test]
    fn delete_command_reports_deleted_and_missing() {
        let (config, _dir) = temp_config();
        add(&config, "Test", None);
        let task_id = seeded_ids(&config).remove(0);

        let args = IdArgs {
            ids: vec![task_id, "missing".into()],
        };
        let output = run(&config, CliCommand::Delete(args));
        assert!(output.contains("Deleted 1 task\n"));
        assert!(output.contains("Not found: missing"));
        assert!(seeded_ids(&config).is_empty());
    }

    #[test]
    fn delete_command_handles_no_matches() {
        let (config, _dir) = temp_config();
        let args = IdArgs {
            ids: vec!["missing".into()],
        };
        let output = run(&config, CliCommand::Delete(args));
        assert!(output.contains("No tasks deleted"));
    }

    #[test]
    fn categories_lists_the_fixed_table() {
        let (config, _dir) = temp_config();
        let output = run(&config, CliCommand::Categories);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("1  Work"));
        assert!(lines[0].ends_with("bg-blue-500"));
        assert!(lines[4].starts_with("5  Learning"));
    }

    #[test]
    fn tui_is_not_a_batch_command() {
        let (config, _dir) = temp_config();
        let mut output = Vec::new();
        assert!(execute(&config, CliCommand::Tui, &mut output).is_err());
    }
}
