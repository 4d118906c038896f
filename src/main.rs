use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = taskorp::cli::Cli::parse();
    let config = taskorp::config::from_cli(&cli)?;
    let log_filter = taskorp::config::log_filter(&cli);

    match cli.command.clone() {
        Some(taskorp::cli::CliCommand::Tui) | None => {
            taskorp::logging::init_file(config.log_path(), &log_filter)?;
            taskorp::tui::run(config)?;
        }
        Some(command) => {
            taskorp::logging::init_stderr(&log_filter)?;
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            taskorp::commands::execute(&config, command, &mut handle)?;
        }
    }

    Ok(())
}
