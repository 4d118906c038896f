use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

fn env_filter(filter: &str) -> Result<EnvFilter> {
    let directive: Directive = filter
        .parse()
        .with_context(|| format!("invalid log directive '{filter}'"))?;
    Ok(EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy())
}

/// Log to stderr. Used by one-shot commands so stdout stays clean.
pub fn init_stderr(filter: &str) -> Result<()> {
    let env_filter = env_filter(filter)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}

/// Append to `path`. The terminal UI owns the screen, so it cannot log to stderr.
pub fn init_file(path: &Path, filter: &str) -> Result<()> {
    let env_filter = env_filter(filter)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file at {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_directive() {
        assert!(env_filter("taskorp_core=notalevel").is_err());
        assert!(env_filter("debug").is_ok());
    }
}
