// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub const LOG_FILE_NAME: &str = "jokebox.log";
const CRATE_TARGETS: [&str; 4] = ["jokebox", "jokebox_app", "jokebox_source", "jokebox_tui"];

pub fn filter_directives(level: &str) -> String {
    let mut directives = vec!["warn".to_owned()];
    directives.extend(CRATE_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

/// Installs a file-backed subscriber. The terminal belongs to the UI, so
/// nothing is logged when file logging is disabled. Keep the returned guard
/// alive until exit or buffered lines are lost.
pub fn init(config: &Config) -> Result<Option<WorkerGuard>> {
    if !config.log_to_file() {
        return Ok(None);
    }

    let dir = config.log_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("create log directory {}", dir.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config.log_level())));
    let appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::filter_directives;

    #[test]
    fn directives_scope_level_to_workspace_crates() {
        let directives = filter_directives("debug");
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("jokebox=debug"));
        assert!(directives.contains("jokebox_source=debug"));
        assert!(directives.contains("jokebox_tui=debug"));
    }
}
