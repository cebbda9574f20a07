use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simple_logger::SimpleLogger;

pub const DEFAULT_LOG_FILE: &str = "y_shader.log";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
    /// Log file, truncated on start. `None` or an empty path logs to
    /// stderr instead.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "trace".to_string(),
            file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.level)
            .with_context(|| format!("Invalid log level '{}'", self.level))
    }

    /// The file to log into, if any.
    pub fn log_file(&self) -> Option<&Path> {
        self.file.as_deref().filter(|p| !p.as_os_str().is_empty())
    }

    /// Installs the global logger. Fails if one is already installed or the
    /// log file cannot be created.
    pub fn init(&self) -> Result<()> {
        let level = self.level_filter()?;

        let Some(path) = self.log_file() else {
            return SimpleLogger::new()
                .with_level(level)
                .init()
                .context("Failed to install logger");
        };

        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        Builder::new()
            .filter_level(level)
            .write_style(WriteStyle::Never)
            .target(Target::Pipe(Box::new(file)))
            .try_init()
            .context("Failed to install logger")
    }
}
