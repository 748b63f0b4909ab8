//! Logging setup built on `log` and `fern`.
//!
//! Every record goes to an in-memory buffer the UI can show; when file
//! logging is enabled the same records are also appended to
//! `<data dir>/modalist/modalist.log`.

use crate::config::LoggingConfig;
use crate::constants::MAX_LOG_ENTRIES;
use anyhow::{Context, Result};
use chrono::Local;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// One buffered record
#[derive(Debug, Clone)]
struct LogEntry {
    level: log::Level,
    line: String,
}

/// Shared logger that can be used across the application
#[derive(Clone)]
pub struct Logger {
    logs: Arc<Mutex<VecDeque<LogEntry>>>,
    level: log::LevelFilter,
    file_path: Option<PathBuf>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(VecDeque::new())),
            level: log::LevelFilter::Info,
            file_path: None,
        }
    }

    /// Build a logger from configuration without installing it
    pub fn from_config(config: &LoggingConfig) -> Result<Self> {
        let level = log::LevelFilter::from_str(&config.level)
            .with_context(|| format!("Invalid logging level '{}'", config.level))?;
        let file_path = if config.enabled {
            Some(Self::get_log_file_path()?)
        } else {
            None
        };

        Ok(Self {
            logs: Arc::new(Mutex::new(VecDeque::new())),
            level,
            file_path,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.file_path.is_some()
    }

    pub fn level(&self) -> log::LevelFilter {
        self.level
    }

    /// Install as the global `log` backend. Can only succeed once per process.
    pub fn install(&self) -> Result<()> {
        let memory = self.clone();
        let mut dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!("[{}] {} {}", record.level(), record.target(), message))
            })
            .level(self.level)
            .chain(fern::Output::call(move |record| {
                memory.push(record.level(), record.args().to_string());
            }));

        if let Some(path) = &self.file_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
            }
            let file = fern::log_file(path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
            dispatch = dispatch.chain(
                fern::Dispatch::new()
                    .format(|out, message, _record| {
                        out.finish(format_args!("{} {}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"), message))
                    })
                    .chain(file),
            );
        }

        dispatch.apply().context("A global logger is already installed")?;
        Ok(())
    }

    /// Add an info-level entry
    pub fn log(&self, message: String) {
        self.push(log::Level::Info, message);
    }

    /// Buffer an entry, dropping the oldest once the buffer is full
    fn push(&self, level: log::Level, message: String) {
        let timestamp = Local::now().format("%H:%M:%S%.3f").to_string();
        let line = format!("[{}] {}", timestamp, message);

        if let Ok(mut logs) = self.logs.lock() {
            if logs.len() >= MAX_LOG_ENTRIES {
                logs.pop_front();
            }
            logs.push_back(LogEntry { level, line });
        }
    }

    /// Get all logs sorted by date (newest first)
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            logs.iter().rev().map(|entry| entry.line.clone()).collect()
        } else {
            Vec::new()
        }
    }

    /// Newest entry at `level` or more severe
    pub fn latest_at(&self, level: log::Level) -> Option<String> {
        let logs = self.logs.lock().ok()?;
        logs.iter().rev().find(|entry| entry.level <= level).map(|entry| entry.line.clone())
    }

    /// Location of the log file used when file logging is enabled
    pub fn get_log_file_path() -> Result<PathBuf> {
        dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
            .map(|dir| dir.join("modalist").join("modalist.log"))
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
