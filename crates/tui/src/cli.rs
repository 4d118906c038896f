use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskorp",
    version,
    about = "A keyboard-first todo list with categories, search and local storage.",
    after_help = "Examples:\n  taskorp                      Launch the TUI (same as `taskorp tui`)\n  taskorp add Buy milk -c 3\n  taskorp list --search milk\n  taskorp toggle 01HXYZ...\n  taskorp delete 01HXYZ..."
)]
pub struct Cli {
    /// Override the data directory (defaults to platform-specific app dir)
    #[arg(long, value_name = "PATH", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Tracing filter directive (e.g. "info", "taskorp_core=debug")
    #[arg(long = "log", value_name = "DIRECTIVE", global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CliCommand {
    /// Launch the keyboard-first terminal UI (default command)
    Tui,
    /// Add a task
    Add(AddArgs),
    /// List tasks, optionally filtered by category and search text
    List(ListArgs),
    /// Flip the completion flag of one or more tasks
    Toggle(IdArgs),
    /// Delete one or more tasks by id
    Delete(IdArgs),
    /// Show the available categories
    Categories,
    /// Show total, completed and remaining counts
    Stats,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Task title; multiple words are joined with spaces
    #[arg(value_name = "TITLE", required = true)]
    pub title: Vec<String>,

    /// Optional longer description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Category id (see `taskorp categories`); defaults to the first category
    #[arg(long, short = 'c', value_name = "ID")]
    pub category: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only show tasks in this category
    #[arg(long, short = 'c', value_name = "ID")]
    pub category: Option<String>,

    /// Case-insensitive match against title and description
    #[arg(long, short = 's', value_name = "TEXT")]
    pub search: Option<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct IdArgs {
    /// One or more task ids (shown by `taskorp list` and the TUI detail view)
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}
