//! In-memory message log for a single pipeline run.
//!
//! Every entry is also forwarded to the `log` facade, so a process-wide logger
//! sees the same messages the caller later retrieves with [`RunLog::text`].

use chrono::{DateTime, Local};
use std::fmt;

/// Severity of a run log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Progress information
    Info,
    /// A per-item problem; the run continues
    Warning,
    /// A failure; the item (or the run) is abandoned
    Error,
}

impl LogLevel {
    /// Label used in rendered entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Info => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// A single timestamped message.
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// When the entry was recorded
    pub timestamp: DateTime<Local>,
    /// Severity
    pub level: LogLevel,
    /// Message text
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] [{}] {}",
            self.timestamp.format("%H:%M:%S"),
            self.level.as_str(),
            self.message
        )
    }
}

/// Ordered log of everything that happened during one run.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message at the given level.
    pub fn record(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        log::log!(log::Level::from(level), "{}", message);
        self.entries.push(LogEntry {
            timestamp: Local::now(),
            level,
            message,
        });
    }

    /// Record an INFO message.
    pub fn info(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Info, message);
    }

    /// Record a WARNING message.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Warning, message);
    }

    /// Record an ERROR message.
    pub fn error(&mut self, message: impl Into<String>) {
        self.record(LogLevel::Error, message);
    }

    /// All entries in recording order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries at `level`.
    pub fn count(&self, level: LogLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }

    /// The whole log rendered one entry per line.
    pub fn text(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
