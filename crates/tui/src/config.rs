pub use taskorp_core::config::*;

use crate::cli::{Cli, CliCommand};

/// Filter used by the terminal UI, which logs to a file.
pub const DEFAULT_TUI_LOG_FILTER: &str = "info";
/// Filter used by one-shot commands, which log to stderr next to their output.
pub const DEFAULT_COMMAND_LOG_FILTER: &str = "warn";

pub fn from_cli(cli: &Cli) -> anyhow::Result<AppConfig> {
    AppConfig::discover(cli.data_dir.clone())
}

/// `--log` wins, otherwise the default for the surface being launched.
pub fn log_filter(cli: &Cli) -> String {
    if let Some(filter) = cli.log.as_deref().filter(|f| !f.trim().is_empty()) {
        return filter.to_string();
    }
    match cli.command {
        Some(CliCommand::Tui) | None => DEFAULT_TUI_LOG_FILTER.to_string(),
        Some(_) => DEFAULT_COMMAND_LOG_FILTER.to_string(),
    }
}
